use std::fmt;

use crate::effects::{Effect, EffectKind, EffectParams, Intensity};

/// Plancher de luminosité d'un effet composé.
pub const COMPOSITE_FLOOR: f64 = 0.5;

/// Presets nommés : combinaisons fixes d'effets.
pub const PRESETS: &[(&str, &[&str])] = &[
    ("glow", &["shimmer", "flicker"]),
    ("pulse-glow", &["pulse", "sparkle"]),
    ("scan-comet", &["scanline", "comet"]),
    ("ocean-wave", &["wave", "breathe"]),
];

/// Noms des presets.
#[must_use]
pub fn list_presets() -> Vec<&'static str> {
    PRESETS.iter().map(|(n, _)| *n).collect()
}

/// Liste ordonnée, jamais vide, de noms d'effets en minuscules.
///
/// Dérivée une fois d'une chaîne (`shimmer+flicker`, `pulse,wave`, `glow`)
/// puis réutilisée pour toute la session.
///
/// # Example
/// ```
/// use nr_render::compose::EffectSpec;
/// assert_eq!(EffectSpec::parse("Shimmer + flicker").names(), ["shimmer", "flicker"]);
/// assert_eq!(EffectSpec::parse("ocean-wave").names(), ["wave", "breathe"]);
/// assert_eq!(EffectSpec::parse(" ").names(), ["shimmer"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectSpec {
    names: Vec<String>,
}

impl EffectSpec {
    /// Parse une spécification textuelle d'effets.
    ///
    /// Un preset exact donne sa liste fixe ; sinon découpe sur `,` ou `+`,
    /// ignore les jetons vides. Une entrée vide donne `[shimmer]`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim().to_lowercase();
        if let Some((_, names)) = PRESETS.iter().find(|(n, _)| *n == text) {
            return Self::from_names(names.iter().copied());
        }
        Self::from_names(
            text.split([',', '+'])
                .map(str::trim)
                .filter(|tok| !tok.is_empty()),
        )
    }

    /// Construit une spécification à partir de noms déjà découpés.
    /// Une liste vide donne `[shimmer]`.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            names.push(EffectKind::Shimmer.name().to_string());
        }
        Self { names }
    }

    /// Noms dans l'ordre de la spécification.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Types d'effets résolus (nom inconnu → `shimmer`).
    #[must_use]
    pub fn kinds(&self) -> Vec<EffectKind> {
        self.names.iter().map(|n| EffectKind::from_name(n)).collect()
    }
}

impl From<&str> for EffectSpec {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl fmt::Display for EffectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names.join("+"))
    }
}

/// Raccourci pour [`EffectSpec::parse`].
#[must_use]
pub fn parse_spec(text: &str) -> EffectSpec {
    EffectSpec::parse(text)
}

/// Fonction d'intensité composée d'un ou plusieurs effets.
///
/// Un seul effet est évalué tel quel. Plusieurs couches prennent le maximum,
/// borné à [`COMPOSITE_FLOOR`, 1].
#[derive(Clone, Debug, PartialEq)]
pub enum CompositeEffect {
    /// Un seul effet, sans enveloppe.
    Single(Effect),
    /// Plusieurs effets combinés par maximum.
    Layered(Vec<Effect>),
}

impl CompositeEffect {
    /// Effets composants, dans l'ordre.
    #[must_use]
    pub fn layers(&self) -> &[Effect] {
        match self {
            Self::Single(fx) => std::slice::from_ref(fx),
            Self::Layered(layers) => layers,
        }
    }
}

impl Intensity for CompositeEffect {
    #[inline]
    fn sample(&self, t: f64, x: usize, y: usize) -> f64 {
        match self {
            Self::Single(fx) => fx.sample(t, x, y),
            Self::Layered(layers) => layers
                .iter()
                .map(|fx| fx.sample(t, x, y))
                .fold(f64::NEG_INFINITY, f64::max)
                .clamp(COMPOSITE_FLOOR, 1.0),
        }
    }
}

/// Construit la fonction d'intensité d'une spécification d'effets.
///
/// # Example
/// ```
/// use nr_render::compose::{build_composite, EffectSpec};
/// use nr_render::effects::{EffectParams, Intensity};
/// let fx = build_composite(&EffectSpec::parse("pulse+sparkle"), EffectParams::new(40, 6));
/// let v = fx.sample(0.5, 10, 2);
/// assert!((0.5..=1.0).contains(&v));
/// ```
#[must_use]
pub fn build_composite(spec: &EffectSpec, params: EffectParams) -> CompositeEffect {
    let mut layers: Vec<Effect> = spec
        .names()
        .iter()
        .map(|name| {
            let kind = EffectKind::lookup(name).unwrap_or_else(|| {
                log::warn!("Effet inconnu '{name}', utilisation de shimmer.");
                EffectKind::Shimmer
            });
            Effect::new(kind, params)
        })
        .collect();
    if layers.len() == 1 {
        CompositeEffect::Single(layers.remove(0))
    } else {
        CompositeEffect::Layered(layers)
    }
}
