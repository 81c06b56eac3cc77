use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use clap::Parser;
use nr_core::color::ColorDepth;
use nr_core::config::NeonConfig;
use nr_export::{ExportKind, ExportTarget, RasterOptions, write_ansi_file, write_png};
use nr_render::frame::{RenderOptions, render_static_frame};
use nr_render::term::detect_color_depth;

pub mod animate;
pub mod cli;
pub mod hotreload;
pub mod interactive;
pub mod scene;
pub mod session;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    if cli.list {
        print_catalog();
        return Ok(());
    }

    // 3. Charger la config puis appliquer les overrides CLI
    let overrides = cli.overrides();
    let mut config = resolve_config(&cli)?;
    overrides.apply(&mut config);
    let text = cli.text();

    // 4. Export : toujours une frame statique true color
    if !cli.interactive
        && let Some(ref arg) = cli.export
    {
        return run_export(&cli, &config, &text, arg);
    }

    let probed_depth = detect_color_depth();
    let scene = scene::Scene::new(&text, &config, probed_depth);

    // 5. Frame statique
    if !cli.interactive && (cli.no_anim || scene.is_static()) {
        println!("{}", scene.static_frame());
        return Ok(());
    }

    // 6. Hot-reload de la config pendant l'animation
    let config = Arc::new(ArcSwap::from_pointee(config));
    let _watcher = if cli.config.exists() {
        match hotreload::spawn_config_watcher(&cli.config, &config, overrides) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                log::warn!("Hot-reload indisponible : {e}");
                None
            }
        }
    } else {
        None
    };

    // 7. Boucle d'animation
    if cli.interactive {
        interactive::run(&text, &config, probed_depth)
    } else {
        animate::run(scene, &config)
    }
}

/// Config du fichier `--config`, ou défauts si le fichier n'existe pas.
fn resolve_config(cli: &cli::Cli) -> Result<NeonConfig> {
    if cli.config.exists() {
        nr_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(NeonConfig::default())
    }
}

fn run_export(cli: &cli::Cli, config: &NeonConfig, text: &str, arg: &str) -> Result<()> {
    let target = ExportTarget::parse(arg, cli.out.as_deref(), text)?;
    let grid = nr_font::render_text(text, &config.font);
    let gradient = scene::gradient_for(&config.palette);

    match target.kind {
        ExportKind::Ansi => {
            let options = RenderOptions {
                keep_spaces_colorless: config.keep_spaces_colorless,
                depth: ColorDepth::TrueColor,
            };
            write_ansi_file(&render_static_frame(&grid, &gradient, options), &target.path)?;
        }
        ExportKind::Png => {
            let mut options = RasterOptions::default();
            if let Some(ref font) = cli.raster_font {
                options = options.with_font_file(font)?;
            }
            write_png(&grid, &gradient, &target.path, &options)?;
        }
    }
    println!("Export {} enregistré : {}", target.kind, target.path.display());
    Ok(())
}

fn print_catalog() {
    println!("Palettes : {}", nr_core::palette::list_palettes().join(", "));
    println!("Effets   : {}", nr_render::effects::list_effects().join(", "));
    let presets: Vec<String> = nr_render::compose::PRESETS
        .iter()
        .map(|(name, parts)| format!("{name} ({})", parts.join("+")))
        .collect();
    println!("Presets  : {}", presets.join(", "));
    println!("Polices  : {}", nr_font::list_fonts().join(", "));
}
