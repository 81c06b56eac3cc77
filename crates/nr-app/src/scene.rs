use nr_core::color::{ColorDepth, Gradient};
use nr_core::config::NeonConfig;
use nr_core::glyph::GlyphGrid;
use nr_core::palette::{DEFAULT_PALETTE, lookup, resolve_palette};
use nr_font::render_text;
use nr_render::compose::{CompositeEffect, EffectSpec, build_composite};
use nr_render::effects::{EffectKind, EffectParams, Intensity};
use nr_render::frame::{RenderOptions, frame_width, render_frame, render_static_frame};

/// Dégradé d'une palette, avec avertissement si le nom est inconnu.
#[must_use]
pub fn gradient_for(name: &str) -> Gradient {
    lookup(name).unwrap_or_else(|| {
        log::warn!("Palette inconnue '{name}', utilisation de {DEFAULT_PALETTE}.");
        resolve_palette(DEFAULT_PALETTE)
    })
}

/// Tout ce qu'il faut pour rendre une frame : grille, dégradé, effet composé,
/// options. Reconstruit par morceaux quand un paramètre change, jamais muté
/// pendant un rendu.
pub struct Scene {
    text: String,
    font: String,
    grid: GlyphGrid,
    gradient: Gradient,
    spec: EffectSpec,
    effect: CompositeEffect,
    probed_depth: ColorDepth,
    options: RenderOptions,
}

impl Scene {
    /// Construit la scène pour `text` selon la config. `probed_depth` sert
    /// quand la config ne force pas de profondeur.
    #[must_use]
    pub fn new(text: &str, config: &NeonConfig, probed_depth: ColorDepth) -> Self {
        let grid = render_text(text, &config.font);
        let spec = EffectSpec::parse(&config.effect);
        let effect = build_composite(&spec, params_for(&grid, config.speed, config.intensity));
        Self {
            text: text.to_string(),
            font: config.font.clone(),
            grid,
            gradient: gradient_for(&config.palette),
            spec,
            effect,
            probed_depth,
            options: RenderOptions {
                keep_spaces_colorless: config.keep_spaces_colorless,
                depth: config.depth_override().unwrap_or(probed_depth),
            },
        }
    }

    /// Grille de glyphes rendue.
    #[must_use]
    pub fn grid(&self) -> &GlyphGrid {
        &self.grid
    }

    /// Spécification d'effets courante.
    #[must_use]
    pub fn spec(&self) -> &EffectSpec {
        &self.spec
    }

    /// Options de rendu courantes.
    #[must_use]
    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// `true` si l'effet demandé est `none` : une frame statique suffit.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.spec.kinds() == [EffectKind::None]
    }

    /// Change de palette.
    pub fn set_palette(&mut self, name: &str) {
        self.gradient = gradient_for(name);
    }

    /// Reconstruit l'effet composé.
    pub fn set_effect(&mut self, spec: EffectSpec, speed: f64, intensity: f64) {
        self.effect = build_composite(&spec, params_for(&self.grid, speed, intensity));
        self.spec = spec;
    }

    /// Applique une config rechargée : police, palette, effet, options.
    pub fn apply_config(&mut self, config: &NeonConfig) {
        if config.font != self.font {
            self.grid = render_text(&self.text, &config.font);
            self.font.clone_from(&config.font);
        }
        self.set_palette(&config.palette);
        self.set_effect(EffectSpec::parse(&config.effect), config.speed, config.intensity);
        self.options = RenderOptions {
            keep_spaces_colorless: config.keep_spaces_colorless,
            depth: config.depth_override().unwrap_or(self.probed_depth),
        };
    }

    /// Frame animée à l'instant `t` (secondes).
    #[must_use]
    pub fn frame(&self, t: f64) -> String {
        render_frame(
            &self.grid,
            &self.gradient,
            |x, y| self.effect.sample(t, x, y),
            self.options,
        )
    }

    /// Frame statique (intensité 1).
    #[must_use]
    pub fn static_frame(&self) -> String {
        render_static_frame(&self.grid, &self.gradient, self.options)
    }
}

fn params_for(grid: &GlyphGrid, speed: f64, intensity: f64) -> EffectParams {
    EffectParams::new(frame_width(grid), grid.height())
        .with_speed(speed)
        .with_intensity(intensity)
}
