use std::path::PathBuf;

use clap::Parser;
use nr_core::config::NeonConfig;

/// Texte rendu quand aucun n'est fourni.
pub const DEFAULT_TEXT: &str = "Hello, Neon";

/// neonrender : bannières néon en dégradé, animées dans le terminal.
#[derive(Parser, Debug)]
#[command(name = "neonrender", version, about, long_about = None)]
pub struct Cli {
    /// Texte à rendre (les mots sont joints par des espaces).
    #[arg(value_name = "TEXT")]
    pub words: Vec<String>,

    /// Texte à rendre (prioritaire sur les arguments positionnels).
    #[arg(short, long)]
    pub text: Option<String>,

    /// Police de glyphes : block, plain.
    #[arg(long)]
    pub font: Option<String>,

    /// Palette ou alias : neon-violet, cyberpunk, matrix, amber...
    #[arg(long)]
    pub palette: Option<String>,

    /// Effet, combinaison ou preset (shimmer, pulse+sparkle, glow...).
    #[arg(long)]
    pub effect: Option<String>,

    /// Vitesse des effets [0, 10].
    #[arg(long, allow_negative_numbers = true)]
    pub speed: Option<f64>,

    /// Amplitude des effets [0, 1].
    #[arg(long, allow_negative_numbers = true)]
    pub intensity: Option<f64>,

    /// FPS de l'animation [1, 120].
    #[arg(long)]
    pub fps: Option<u32>,

    /// Profondeur couleur forcée : 24, 8 ou 4 bits. Défaut : détection terminal.
    #[arg(long)]
    pub depth: Option<u32>,

    /// Rendre une seule frame statique.
    #[arg(long, default_value_t = false)]
    pub no_anim: bool,

    /// Mode interactif : flèches pour palette/effet, q pour quitter.
    #[arg(short, long, default_value_t = false)]
    pub interactive: bool,

    /// Export : "ansi", "png" ou chemin du fichier de sortie.
    #[arg(long, value_name = "TYPE_OR_PATH")]
    pub export: Option<String>,

    /// Fichier de sortie de l'export.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Police TTF/OTF pour les glyphes de l'export PNG.
    #[arg(long)]
    pub raster_font: Option<PathBuf>,

    /// Lister palettes, effets, presets et polices.
    #[arg(long, default_value_t = false)]
    pub list: bool,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Texte effectif : `--text`, sinon les mots positionnels, sinon [`DEFAULT_TEXT`].
    #[must_use]
    pub fn text(&self) -> String {
        if let Some(ref text) = self.text {
            return text.clone();
        }
        if self.words.is_empty() {
            DEFAULT_TEXT.to_string()
        } else {
            self.words.join(" ")
        }
    }

    /// Surcharges de configuration portées par la ligne de commande.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            palette: self.palette.clone(),
            effect: self.effect.clone(),
            speed: self.speed,
            intensity: self.intensity,
            fps: self.fps,
            font: self.font.clone(),
            color_depth: self.depth,
        }
    }
}

/// Valeurs de la ligne de commande qui priment sur le fichier de config,
/// y compris après un rechargement à chaud.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigOverrides {
    pub palette: Option<String>,
    pub effect: Option<String>,
    pub speed: Option<f64>,
    pub intensity: Option<f64>,
    pub fps: Option<u32>,
    pub font: Option<String>,
    pub color_depth: Option<u32>,
}

impl ConfigOverrides {
    /// Applique les surcharges puis re-clampe la config.
    pub fn apply(&self, config: &mut NeonConfig) {
        if let Some(ref v) = self.palette {
            config.palette.clone_from(v);
        }
        if let Some(ref v) = self.effect {
            config.effect.clone_from(v);
        }
        if let Some(v) = self.speed {
            config.speed = v;
        }
        if let Some(v) = self.intensity {
            config.intensity = v;
        }
        if let Some(v) = self.fps {
            config.fps = v;
        }
        if let Some(ref v) = self.font {
            config.font.clone_from(v);
        }
        if self.color_depth.is_some() {
            config.color_depth = self.color_depth;
        }
        config.clamp_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        match Cli::try_parse_from(std::iter::once("neonrender").chain(args.iter().copied())) {
            Ok(cli) => cli,
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn text_precedence() {
        assert_eq!(parse(&[]).text(), DEFAULT_TEXT);
        assert_eq!(parse(&["Hello", "World"]).text(), "Hello World");
        assert_eq!(parse(&["Hello", "-t", "Neon"]).text(), "Neon");
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
        assert_eq!(cli.log_level, "warn");
        assert!(!cli.no_anim && !cli.interactive && !cli.list);
        assert_eq!(cli.overrides(), ConfigOverrides::default());
    }

    #[test]
    fn flags_map_to_overrides() {
        let cli = parse(&[
            "--palette",
            "matrix",
            "--effect",
            "glow",
            "--speed",
            "2.5",
            "--intensity",
            "-1",
            "--fps",
            "500",
            "--depth",
            "4",
            "--no-anim",
        ]);
        assert!(cli.no_anim);
        let mut config = NeonConfig::default();
        cli.overrides().apply(&mut config);
        assert_eq!(config.palette, "matrix");
        assert_eq!(config.effect, "glow");
        assert!((config.speed - 2.5).abs() < f64::EPSILON);
        assert!(config.intensity.abs() < f64::EPSILON);
        assert_eq!(config.fps, 120);
        assert_eq!(config.color_depth, Some(4));
        assert_eq!(config.font, "block");
    }

    #[test]
    fn export_flags() {
        let cli = parse(&["-i", "--export", "png", "--out", "a.png"]);
        assert!(cli.interactive);
        assert_eq!(cli.export.as_deref(), Some("png"));
        assert_eq!(cli.out, Some(PathBuf::from("a.png")));
    }
}
