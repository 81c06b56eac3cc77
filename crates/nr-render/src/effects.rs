use std::f64::consts::TAU;

/// Champ d'intensité par cellule : `(t secondes, colonne, ligne) → multiplicateur`.
///
/// Implémenté par [`Effect`], [`crate::compose::CompositeEffect`] et toute
/// closure `Fn(f64, usize, usize) -> f64`. Doit être déterministe.
///
/// # Example
/// ```
/// use nr_render::effects::Intensity;
/// let flat = |_t: f64, _x: usize, _y: usize| 0.75;
/// assert_eq!(flat.sample(3.0, 1, 2), 0.75);
/// ```
pub trait Intensity {
    /// Intensité de la cellule (x, y) au temps `t`.
    fn sample(&self, t: f64, x: usize, y: usize) -> f64;
}

impl<F> Intensity for F
where
    F: Fn(f64, usize, usize) -> f64,
{
    #[inline(always)]
    fn sample(&self, t: f64, x: usize, y: usize) -> f64 {
        self(t, x, y)
    }
}

/// Effets connus. Un nom inconnu se résout en [`EffectKind::Shimmer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Intensité constante 1.
    None,
    /// Sinus qui voyage le long des colonnes.
    Shimmer,
    /// Jitter pseudo-aléatoire par cellule, re-tiré à cadence quantifiée.
    Flicker,
    /// Pulsation sinusoïdale globale.
    Pulse,
    /// Respiration lente (cosinus), globale.
    Breathe,
    /// Bande lumineuse qui balaie de gauche à droite.
    Marquee,
    /// Tête lumineuse avec traînée à décroissance exponentielle.
    Comet,
    /// Sinus 2-D en colonne, ligne et temps.
    Wave,
    /// Ondes concentriques depuis le centre de la grille.
    Ripple,
    /// Bande horizontale qui descend.
    Scanline,
    /// Onde carrée, allumée sur les premiers 20 % du cycle.
    Strobe,
    /// Étincelles éparses par bloc 2×2.
    Sparkle,
}

/// Registre complet, dans l'ordre de cycle du mode interactif.
pub const EFFECT_KINDS: [EffectKind; 12] = [
    EffectKind::Shimmer,
    EffectKind::Flicker,
    EffectKind::Pulse,
    EffectKind::Breathe,
    EffectKind::Marquee,
    EffectKind::Comet,
    EffectKind::Wave,
    EffectKind::Ripple,
    EffectKind::Scanline,
    EffectKind::Strobe,
    EffectKind::Sparkle,
    EffectKind::None,
];

impl EffectKind {
    /// Nom canonique (minuscules).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Shimmer => "shimmer",
            Self::Flicker => "flicker",
            Self::Pulse => "pulse",
            Self::Breathe => "breathe",
            Self::Marquee => "marquee",
            Self::Comet => "comet",
            Self::Wave => "wave",
            Self::Ripple => "ripple",
            Self::Scanline => "scanline",
            Self::Strobe => "strobe",
            Self::Sparkle => "sparkle",
        }
    }

    /// Recherche exacte d'un nom (insensible à la casse et aux espaces).
    ///
    /// # Example
    /// ```
    /// use nr_render::effects::EffectKind;
    /// assert_eq!(EffectKind::lookup(" Comet "), Some(EffectKind::Comet));
    /// assert_eq!(EffectKind::lookup("laser"), None);
    /// ```
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        EFFECT_KINDS.iter().copied().find(|k| k.name() == name)
    }

    /// Comme [`EffectKind::lookup`], avec repli sur `Shimmer`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::lookup(name).unwrap_or(Self::Shimmer)
    }

    /// Plage de sortie garantie `(min, max)`.
    #[must_use]
    pub const fn range(self) -> (f64, f64) {
        match self {
            Self::None => (1.0, 1.0),
            Self::Shimmer
            | Self::Flicker
            | Self::Marquee
            | Self::Comet
            | Self::Wave
            | Self::Sparkle => (0.7, 1.0),
            Self::Pulse | Self::Breathe | Self::Ripple | Self::Scanline => (0.6, 1.0),
            Self::Strobe => (0.5, 1.0),
        }
    }
}

/// Noms de tous les effets du registre.
#[must_use]
pub fn list_effects() -> Vec<&'static str> {
    EFFECT_KINDS.iter().map(|k| k.name()).collect()
}

/// Paramètres figés à la construction d'un effet.
///
/// # Example
/// ```
/// use nr_render::effects::EffectParams;
/// let p = EffectParams::new(0, 0).with_intensity(3.0).with_speed(-1.0);
/// assert_eq!((p.width, p.height), (1, 1));
/// assert_eq!(p.intensity, 1.0);
/// assert_eq!(p.speed, 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectParams {
    /// Amplitude [0.0, 1.0].
    pub intensity: f64,
    /// Multiplicateur de fréquence, ≥ 0.
    pub speed: f64,
    /// Largeur de la grille en colonnes, ≥ 1.
    pub width: usize,
    /// Hauteur de la grille en lignes, ≥ 1.
    pub height: usize,
    /// Largeur de la bande du marquee en colonnes, ≥ 1.
    pub band: usize,
}

impl EffectParams {
    /// Paramètres par défaut (intensité 1, vitesse 1) pour une grille donnée.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        Self {
            intensity: 1.0,
            speed: 1.0,
            width,
            height: height.max(1),
            band: (width / 6).max(3),
        }
    }

    /// Fixe l'intensité, bornée à [0, 1] (NaN → 1).
    #[must_use]
    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = if intensity.is_nan() {
            1.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
        self
    }

    /// Fixe la vitesse, bornée à ≥ 0 (NaN → 1).
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = if speed.is_nan() { 1.0 } else { speed.max(0.0) };
        self
    }

    /// Fixe la largeur de bande du marquee (≥ 1).
    #[must_use]
    pub fn with_band(mut self, band: usize) -> Self {
        self.band = band.max(1);
        self
    }

    /// Remet chaque champ dans son domaine.
    fn sanitized(self) -> Self {
        Self {
            width: self.width.max(1),
            height: self.height.max(1),
            ..self
        }
        .with_intensity(self.intensity)
        .with_speed(self.speed)
        .with_band(self.band)
    }
}

/// Hash pseudo-aléatoire déterministe : `frac(sin(n) * 43758.5453)` ∈ [0, 1).
///
/// # Example
/// ```
/// use nr_render::effects::pseudo_rand;
/// let r = pseudo_rand(12.5);
/// assert!((0.0..1.0).contains(&r));
/// assert_eq!(r, pseudo_rand(12.5));
/// ```
#[inline(always)]
#[must_use]
pub fn pseudo_rand(n: f64) -> f64 {
    let s = n.sin() * 43_758.545_3;
    s - s.floor()
}

/// Un effet concret : un [`EffectKind`] et ses paramètres figés.
///
/// Reconstruit (jamais muté) quand l'utilisateur change d'effet, de vitesse
/// ou d'intensité.
///
/// # Example
/// ```
/// use nr_render::effects::{Effect, EffectKind, EffectParams, Intensity};
/// let fx = Effect::new(EffectKind::Pulse, EffectParams::new(40, 6));
/// let v = fx.sample(0.25, 3, 1);
/// assert!((0.6..=1.0).contains(&v));
/// assert_eq!(v, fx.sample(0.25, 39, 5));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Effect {
    kind: EffectKind,
    params: EffectParams,
}

impl Effect {
    /// Construit l'effet ; les paramètres hors domaine sont bornés.
    #[must_use]
    pub fn new(kind: EffectKind, params: EffectParams) -> Self {
        Self {
            kind,
            params: params.sanitized(),
        }
    }

    /// Construit l'effet à partir de son nom (repli sur `shimmer`).
    #[must_use]
    pub fn named(name: &str, params: EffectParams) -> Self {
        Self::new(EffectKind::from_name(name), params)
    }

    /// Type d'effet.
    #[must_use]
    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    /// Paramètres effectifs (après bornage).
    #[must_use]
    pub fn params(&self) -> &EffectParams {
        &self.params
    }

    fn raw(&self, t: f64, x: usize, y: usize) -> f64 {
        let EffectParams {
            intensity: i,
            speed: s,
            width,
            height,
            band,
        } = self.params;
        let xf = x as f64;
        let yf = y as f64;
        let w = width as f64;
        let h = height as f64;

        match self.kind {
            EffectKind::None => 1.0,
            EffectKind::Shimmer => {
                let phase = xf / width.saturating_sub(1).max(1) as f64 * TAU;
                let amp = 0.2 * i;
                let base = 1.0 - amp * 0.5;
                base + (phase + t * (1.5 + s * 2.0)).sin() * amp
            }
            EffectKind::Flicker => {
                let seed = (t * (6.0 + 24.0 * s)).floor();
                let r = pseudo_rand(seed * 13.37 + xf * 0.77 + yf * 1.01);
                let amp = 0.08 * i;
                0.9 + (r - 0.5) * 2.0 * amp
            }
            EffectKind::Pulse => 0.8 + 0.2 * i * (t * (2.0 + 3.0 * s)).sin(),
            EffectKind::Breathe => {
                let ease = 0.5 - 0.5 * (t * (0.8 + 1.2 * s)).cos();
                1.0 - 0.4 * i * (1.0 - ease)
            }
            EffectKind::Marquee => {
                let head = (t * (6.0 + 18.0 * s)).rem_euclid(w);
                let ahead = (xf - head).rem_euclid(w);
                if ahead < band as f64 {
                    1.0
                } else {
                    1.0 - 0.3 * i
                }
            }
            EffectKind::Comet => {
                let head = (t * (10.0 + 30.0 * s)).rem_euclid(w);
                let behind = (head - xf).rem_euclid(w);
                let tail = (w / 4.0).max(2.0);
                let glow = (-behind / tail).exp();
                1.0 - 0.3 * i * (1.0 - glow)
            }
            EffectKind::Wave => {
                0.85 + 0.15 * i * (xf * 0.45 + yf * 0.9 - t * (2.0 + 3.0 * s)).sin()
            }
            EffectKind::Ripple => {
                let dx = xf - (w - 1.0) / 2.0;
                // les cellules terminal sont ~2× plus hautes que larges
                let dy = (yf - (h - 1.0) / 2.0) * 2.0;
                let r = dx.hypot(dy);
                0.8 + 0.2 * i * (r * 0.5 - t * (3.0 + 4.0 * s)).sin()
            }
            EffectKind::Scanline => {
                let head = (t * (3.0 + 9.0 * s)).rem_euclid(h);
                let d = (yf - head).abs();
                let d = d.min(h - d);
                let glow = (1.0 - d / 1.5).max(0.0);
                1.0 - 0.4 * i * (1.0 - glow)
            }
            EffectKind::Strobe => {
                let phase = (t * (1.0 + 3.0 * s)).rem_euclid(1.0);
                if phase < 0.2 { 1.0 } else { 1.0 - 0.5 * i }
            }
            EffectKind::Sparkle => {
                let seed = (t * (4.0 + 12.0 * s)).floor();
                let bx = (x / 2) as f64;
                let by = (y / 2) as f64;
                let r = pseudo_rand(seed * 19.19 + bx * 97.97 + by * 7.31);
                if r > 0.92 {
                    1.0
                } else {
                    1.0 - 0.15 * i - 0.15 * i * (r / 0.92)
                }
            }
        }
    }
}

impl Intensity for Effect {
    #[inline]
    fn sample(&self, t: f64, x: usize, y: usize) -> f64 {
        let (lo, hi) = self.kind.range();
        self.raw(t, x, y).clamp(lo, hi)
    }
}
