use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::ColorDepth;
use crate::error::CoreError;

/// Configuration d'une session de rendu, hot-rechargeable.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use nr_core::config::NeonConfig;
/// let config = NeonConfig::default();
/// assert_eq!(config.fps, 24);
/// assert_eq!(config.palette, "neon-violet");
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct NeonConfig {
    /// Nom (ou alias) de palette.
    pub palette: String,
    /// Effet, combinaison (`shimmer+flicker`) ou preset (`glow`).
    pub effect: String,
    /// Vitesse des effets [0.0, 10.0].
    pub speed: f64,
    /// Amplitude des effets [0.0, 1.0].
    pub intensity: f64,
    /// FPS cible de l'animation [1, 120].
    pub fps: u32,
    /// Police de glyphes.
    pub font: String,
    /// Ne pas colorer les espaces.
    pub keep_spaces_colorless: bool,
    /// Profondeur forcée en bits (24, 8, 4). `None` = détection terminal.
    pub color_depth: Option<u32>,
}

impl Default for NeonConfig {
    fn default() -> Self {
        Self {
            palette: crate::palette::DEFAULT_PALETTE.to_string(),
            effect: "shimmer".to_string(),
            speed: 1.0,
            intensity: 1.0,
            fps: 24,
            font: "block".to_string(),
            keep_spaces_colorless: true,
            color_depth: None,
        }
    }
}

impl NeonConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization and CLI overrides.
    pub fn clamp_all(&mut self) {
        self.speed = if self.speed.is_finite() {
            self.speed.clamp(0.0, 10.0)
        } else {
            1.0
        };
        self.intensity = if self.intensity.is_finite() {
            self.intensity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.fps = self.fps.clamp(1, 120);
        self.color_depth = self.color_depth.map(|b| ColorDepth::from_bits(b).bits());
    }

    /// Profondeur forcée par la config, si présente.
    #[must_use]
    pub fn depth_override(&self) -> Option<ColorDepth> {
        self.color_depth.map(ColorDepth::from_bits)
    }

    /// Applique une section TOML partielle par-dessus cette config.
    fn merge(&mut self, r: RenderSection) {
        if let Some(v) = r.palette {
            self.palette = v;
        }
        if let Some(v) = r.effect {
            self.effect = v;
        }
        if let Some(v) = r.speed {
            self.speed = v;
        }
        if let Some(v) = r.intensity {
            self.intensity = v;
        }
        if let Some(v) = r.fps {
            self.fps = v;
        }
        if let Some(v) = r.font {
            self.font = v;
        }
        if let Some(v) = r.keep_spaces_colorless {
            self.keep_spaces_colorless = v;
        }
        if r.color_depth.is_some() {
            self.color_depth = r.color_depth;
        }
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    render: Option<RenderSection>,
}

/// Render section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RenderSection {
    palette: Option<String>,
    effect: Option<String>,
    speed: Option<f64>,
    intensity: Option<f64>,
    fps: Option<u32>,
    font: Option<String>,
    keep_spaces_colorless: Option<bool>,
    color_depth: Option<u32>,
}

/// Parse une config TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns [`CoreError::Config`] if the TOML is malformed or contains unknown keys.
///
/// # Example
/// ```
/// use nr_core::config::parse_config;
/// let config = parse_config("[render]\nintensity = 4.0\neffect = \"glow\"").unwrap();
/// assert_eq!(config.intensity, 1.0);
/// assert_eq!(config.effect, "glow");
/// ```
pub fn parse_config(content: &str) -> Result<NeonConfig, CoreError> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| CoreError::Config(e.message().to_string()))?;
    let mut config = NeonConfig::default();
    if let Some(r) = file.render {
        config.merge(r);
    }
    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use nr_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<NeonConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))
}
