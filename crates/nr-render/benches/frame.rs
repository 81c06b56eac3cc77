use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nr_core::color::{ColorDepth, Gradient, Rgb};
use nr_core::glyph::GlyphGrid;
use nr_render::compose::{EffectSpec, build_composite};
use nr_render::effects::{EffectParams, Intensity};
use nr_render::frame::{RenderOptions, render_frame};

fn banner() -> GlyphGrid {
    let row = "██╗  ██╗███████╗██╗     ██╗      ██████╗ ".repeat(3);
    GlyphGrid::from_lines(std::iter::repeat_n(row, 6))
}

fn bench_frames(c: &mut Criterion) {
    let grid = banner();
    let gradient = Gradient::new(Rgb::new(255, 0, 255), Rgb::new(0, 255, 255));
    let params = EffectParams::new(grid.width(), grid.height());

    for (name, spec) in [("shimmer", "shimmer"), ("glow", "glow"), ("all", "wave+ripple+sparkle")] {
        let fx = build_composite(&EffectSpec::parse(spec), params);
        for depth in [ColorDepth::TrueColor, ColorDepth::Ansi16] {
            let opts = RenderOptions::with_depth(depth);
            c.bench_function(&format!("render_frame/{name}/{}bit", depth.bits()), |b| {
                b.iter(|| {
                    render_frame(
                        black_box(&grid),
                        &gradient,
                        |x, y| fx.sample(1.25, x, y),
                        opts,
                    )
                });
            });
        }
    }
}

criterion_group!(benches, bench_frames);
criterion_main!(benches);
