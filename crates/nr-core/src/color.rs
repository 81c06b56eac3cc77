use std::fmt::Write;

/// Séquence de remise à zéro des attributs SGR.
pub const RESET: &str = "\x1b[0m";

/// Couleur RGB 8 bits par canal, sans alpha.
///
/// # Example
/// ```
/// use nr_core::color::Rgb;
/// let c = Rgb::new(255, 0, 255);
/// assert_eq!((c.r, c.g, c.b), (255, 0, 255));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Canal rouge.
    pub r: u8,
    /// Canal vert.
    pub g: u8,
    /// Canal bleu.
    pub b: u8,
}

impl Rgb {
    /// Construit une couleur à partir de ses trois canaux.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `true` si les trois canaux sont égaux (gris, noir ou blanc).
    #[inline]
    #[must_use]
    pub const fn is_achromatic(self) -> bool {
        self.r == self.g && self.g == self.b
    }
}

/// Dégradé horizontal à deux arrêts. `t = 0` donne `start`, `t = 1` donne `end`.
///
/// # Example
/// ```
/// use nr_core::color::{Gradient, Rgb};
/// let g = Gradient::new(Rgb::new(0, 0, 0), Rgb::new(200, 100, 50));
/// assert_eq!(g.at(0.5), Rgb::new(100, 50, 25));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gradient {
    /// Couleur de la colonne de gauche.
    pub start: Rgb,
    /// Couleur de la colonne de droite.
    pub end: Rgb,
}

impl Gradient {
    /// Construit un dégradé `start → end`.
    #[must_use]
    pub const fn new(start: Rgb, end: Rgb) -> Self {
        Self { start, end }
    }

    /// Couleur à la position `t` du dégradé.
    #[inline]
    #[must_use]
    pub fn at(&self, t: f64) -> Rgb {
        mix(self.start, self.end, t)
    }
}

/// Profondeur de couleur supportée par le terminal.
///
/// # Example
/// ```
/// use nr_core::color::ColorDepth;
/// assert_eq!(ColorDepth::from_bits(24), ColorDepth::TrueColor);
/// assert_eq!(ColorDepth::from_bits(16), ColorDepth::Ansi256);
/// assert_eq!(ColorDepth::from_bits(1), ColorDepth::Ansi16);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorDepth {
    /// 24 bits, `ESC[38;2;r;g;bm`.
    #[default]
    TrueColor,
    /// Palette xterm 256 couleurs, `ESC[38;5;nm`.
    Ansi256,
    /// 8 couleurs standard + 8 vives.
    Ansi16,
}

impl ColorDepth {
    /// Tier supporté le plus proche par le bas : `≥24` true color,
    /// `[8, 24)` 256 couleurs, le reste en 16 couleurs.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        if bits >= 24 {
            Self::TrueColor
        } else if bits >= 8 {
            Self::Ansi256
        } else {
            Self::Ansi16
        }
    }

    /// Nombre de bits nominal du tier (24, 8 ou 4).
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::TrueColor => 24,
            Self::Ansi256 => 8,
            Self::Ansi16 => 4,
        }
    }
}

/// Palette de référence des 16 couleurs ANSI (0–7 standard, 8–15 vives).
pub const ANSI16_PALETTE: [Rgb; 16] = [
    Rgb::new(0, 0, 0),
    Rgb::new(205, 49, 49),
    Rgb::new(13, 188, 121),
    Rgb::new(229, 229, 16),
    Rgb::new(36, 114, 200),
    Rgb::new(188, 63, 188),
    Rgb::new(17, 168, 205),
    Rgb::new(229, 229, 229),
    Rgb::new(102, 102, 102),
    Rgb::new(241, 76, 76),
    Rgb::new(35, 209, 139),
    Rgb::new(245, 245, 67),
    Rgb::new(59, 142, 234),
    Rgb::new(214, 112, 214),
    Rgb::new(41, 184, 219),
    Rgb::new(255, 255, 255),
];

/// Interpolation linéaire scalaire.
#[inline(always)]
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Arrondi puis saturation dans [0, 255]. NaN donne 0.
#[inline(always)]
fn to_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Interpolation linéaire par canal : `round(c1 + (c2 - c1) * t)`.
///
/// `t` n'est pas borné ; un `t` hors de [0, 1] extrapole et sature.
///
/// # Example
/// ```
/// use nr_core::color::{mix, Rgb};
/// let a = Rgb::new(255, 0, 255);
/// let b = Rgb::new(0, 255, 255);
/// assert_eq!(mix(a, b, 0.0), a);
/// assert_eq!(mix(a, b, 1.0), b);
/// ```
#[inline]
#[must_use]
pub fn mix(c1: Rgb, c2: Rgb, t: f64) -> Rgb {
    Rgb::new(
        to_channel(lerp(f64::from(c1.r), f64::from(c2.r), t)),
        to_channel(lerp(f64::from(c1.g), f64::from(c2.g), t)),
        to_channel(lerp(f64::from(c1.b), f64::from(c2.b), t)),
    )
}

/// Multiplie chaque canal par `s`, arrondit et sature dans [0, 255].
///
/// # Example
/// ```
/// use nr_core::color::{scale, Rgb};
/// assert_eq!(scale(Rgb::new(200, 100, 10), 0.5), Rgb::new(100, 50, 5));
/// assert_eq!(scale(Rgb::new(200, 100, 10), 2.0), Rgb::new(255, 200, 20));
/// ```
#[inline]
#[must_use]
pub fn scale(c: Rgb, s: f64) -> Rgb {
    Rgb::new(
        to_channel(f64::from(c.r) * s),
        to_channel(f64::from(c.g) * s),
        to_channel(f64::from(c.b) * s),
    )
}

/// Projette une couleur sur la palette xterm 256.
///
/// Les gris passent par la rampe 232–255 (16 pour le quasi-noir,
/// 231 pour le quasi-blanc), les autres par le cube 6×6×6.
///
/// # Example
/// ```
/// use nr_core::color::{rgb_to_ansi256, Rgb};
/// assert_eq!(rgb_to_ansi256(Rgb::new(0, 0, 0)), 16);
/// assert_eq!(rgb_to_ansi256(Rgb::new(255, 255, 255)), 231);
/// assert_eq!(rgb_to_ansi256(Rgb::new(255, 0, 0)), 196);
/// ```
#[must_use]
pub fn rgb_to_ansi256(c: Rgb) -> u8 {
    if c.is_achromatic() {
        if c.r < 8 {
            return 16;
        }
        if c.r > 248 {
            return 231;
        }
        return ((f64::from(c.r) - 8.0) / 247.0 * 24.0).round() as u8 + 232;
    }
    let level = |v: u8| (f64::from(v) / 255.0 * 5.0).round() as u8;
    16 + 36 * level(c.r) + 6 * level(c.g) + level(c.b)
}

/// Index (0–15) de la couleur ANSI la plus proche en distance euclidienne
/// RGB au carré. À distance égale, le premier index gagne.
///
/// # Example
/// ```
/// use nr_core::color::{rgb_to_ansi16, Rgb};
/// assert_eq!(rgb_to_ansi16(Rgb::new(0, 0, 0)), 0);
/// assert_eq!(rgb_to_ansi16(Rgb::new(250, 250, 250)), 15);
/// ```
#[must_use]
pub fn rgb_to_ansi16(c: Rgb) -> u8 {
    let mut best_idx = 0;
    let mut best = i32::MAX;
    for (i, p) in ANSI16_PALETTE.iter().enumerate() {
        let dr = i32::from(c.r) - i32::from(p.r);
        let dg = i32::from(c.g) - i32::from(p.g);
        let db = i32::from(c.b) - i32::from(p.b);
        let d = dr * dr + dg * dg + db * db;
        if d < best {
            best = d;
            best_idx = i;
        }
    }
    best_idx as u8
}

/// Code SGR de premier plan pour un index 16 couleurs : 30–37 puis 90–97.
#[inline]
#[must_use]
pub const fn ansi16_sgr(idx: u8) -> u8 {
    if idx < 8 { 30 + idx } else { 90 + (idx - 8) }
}

/// Ajoute à `out` la séquence de premier plan de `c` pour la profondeur donnée.
///
/// Ne fait aucune allocation si `out` a déjà la capacité nécessaire.
#[inline]
pub fn write_fg_code(out: &mut String, c: Rgb, depth: ColorDepth) {
    // fmt::Write sur String est infaillible
    match depth {
        ColorDepth::TrueColor => write!(out, "\x1b[38;2;{};{};{}m", c.r, c.g, c.b),
        ColorDepth::Ansi256 => write!(out, "\x1b[38;5;{}m", rgb_to_ansi256(c)),
        ColorDepth::Ansi16 => write!(out, "\x1b[{}m", ansi16_sgr(rgb_to_ansi16(c))),
    }
    .ok();
}

/// Séquence de premier plan de `c` pour la profondeur donnée.
///
/// # Example
/// ```
/// use nr_core::color::{fg_code, ColorDepth, Rgb};
/// let c = Rgb::new(255, 0, 255);
/// assert_eq!(fg_code(c, ColorDepth::TrueColor), "\x1b[38;2;255;0;255m");
/// assert_eq!(fg_code(c, ColorDepth::Ansi256), "\x1b[38;5;201m");
/// assert_eq!(fg_code(c, ColorDepth::Ansi16), "\x1b[35m");
/// ```
#[must_use]
pub fn fg_code(c: Rgb, depth: ColorDepth) -> String {
    let mut out = String::with_capacity(20);
    write_fg_code(&mut out, c, depth);
    out
}

/// Applique un dégradé sur une seule ligne, sur sa propre largeur.
///
/// Les espaces restent sans couleur si `keep_spaces_colorless`.
/// La ligne se termine toujours par [`RESET`].
///
/// # Example
/// ```
/// use nr_core::color::{gradient_line, ColorDepth, Gradient, Rgb, RESET};
/// let g = Gradient::new(Rgb::new(255, 0, 255), Rgb::new(0, 255, 255));
/// let s = gradient_line("Neon", &g, true, ColorDepth::TrueColor);
/// assert!(s.starts_with("\x1b[38;2;255;0;255mN"));
/// assert!(s.ends_with(RESET));
/// ```
#[must_use]
pub fn gradient_line(
    line: &str,
    gradient: &Gradient,
    keep_spaces_colorless: bool,
    depth: ColorDepth,
) -> String {
    let len = line.chars().count();
    let span = len.saturating_sub(1).max(1) as f64;
    let mut out = String::with_capacity(len * 20 + RESET.len());
    for (x, ch) in line.chars().enumerate() {
        if !(keep_spaces_colorless && ch == ' ') {
            write_fg_code(&mut out, gradient.at(x as f64 / span), depth);
        }
        out.push(ch);
    }
    out.push_str(RESET);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [Rgb; 6] = [
        Rgb::new(0, 0, 0),
        Rgb::new(255, 255, 255),
        Rgb::new(255, 0, 255),
        Rgb::new(0, 255, 255),
        Rgb::new(13, 200, 77),
        Rgb::new(250, 3, 128),
    ];

    #[test]
    fn mix_hits_endpoints_and_stays_between() {
        for &a in &SAMPLES {
            for &b in &SAMPLES {
                assert_eq!(mix(a, b, 0.0), a);
                assert_eq!(mix(a, b, 1.0), b);
                for step in 0..=20 {
                    let t = f64::from(step) / 20.0;
                    let m = mix(a, b, t);
                    for (v, lo, hi) in [(m.r, a.r, b.r), (m.g, a.g, b.g), (m.b, a.b, b.b)] {
                        assert!(v >= lo.min(hi) && v <= lo.max(hi), "t={t} {a:?}->{b:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn mix_out_of_range_saturates() {
        let a = Rgb::new(100, 100, 100);
        let b = Rgb::new(200, 0, 150);
        assert_eq!(mix(a, b, 5.0), Rgb::new(255, 0, 255));
        assert_eq!(mix(a, b, -5.0), Rgb::new(0, 255, 0));
        assert_eq!(mix(a, b, f64::NAN), Rgb::new(0, 0, 0));
    }

    #[test]
    fn scale_never_brightens_below_one() {
        for &c in &SAMPLES {
            for step in 0..=10 {
                let s = f64::from(step) / 10.0;
                let d = scale(c, s);
                assert!(d.r <= c.r && d.g <= c.g && d.b <= c.b, "{c:?} * {s}");
            }
        }
        assert_eq!(scale(Rgb::new(10, 20, 30), -1.0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn ansi256_gray_ramp_boundaries() {
        assert_eq!(rgb_to_ansi256(Rgb::new(7, 7, 7)), 16);
        assert_eq!(rgb_to_ansi256(Rgb::new(8, 8, 8)), 232);
        assert_eq!(rgb_to_ansi256(Rgb::new(248, 248, 248)), 255);
        assert_eq!(rgb_to_ansi256(Rgb::new(249, 249, 249)), 231);
        assert_eq!(rgb_to_ansi256(Rgb::new(128, 128, 128)), 244);
    }

    #[test]
    fn ansi256_cube() {
        assert_eq!(rgb_to_ansi256(Rgb::new(0, 255, 255)), 51);
        assert_eq!(rgb_to_ansi256(Rgb::new(255, 0, 255)), 201);
        assert_eq!(rgb_to_ansi256(Rgb::new(0, 0, 1)), 16);
        assert_eq!(rgb_to_ansi256(Rgb::new(255, 122, 0)), 16 + 36 * 5 + 6 * 2);
    }

    #[test]
    fn ansi16_exact_entries_and_first_wins() {
        for (i, &p) in ANSI16_PALETTE.iter().enumerate() {
            assert_eq!(usize::from(rgb_to_ansi16(p)), i);
        }
        assert_eq!(ansi16_sgr(0), 30);
        assert_eq!(ansi16_sgr(7), 37);
        assert_eq!(ansi16_sgr(8), 90);
        assert_eq!(ansi16_sgr(15), 97);
    }

    #[test]
    fn depth_fallback_tiers() {
        assert_eq!(ColorDepth::from_bits(32), ColorDepth::TrueColor);
        assert_eq!(ColorDepth::from_bits(8), ColorDepth::Ansi256);
        assert_eq!(ColorDepth::from_bits(23), ColorDepth::Ansi256);
        assert_eq!(ColorDepth::from_bits(4), ColorDepth::Ansi16);
        assert_eq!(ColorDepth::from_bits(0), ColorDepth::Ansi16);
        for d in [ColorDepth::TrueColor, ColorDepth::Ansi256, ColorDepth::Ansi16] {
            assert_eq!(ColorDepth::from_bits(d.bits()), d);
        }
    }

    #[test]
    fn gradient_line_depths() {
        let g = Gradient::new(Rgb::new(255, 0, 255), Rgb::new(0, 255, 255));
        let s8 = gradient_line("Neon", &g, true, ColorDepth::Ansi256);
        assert!(s8.contains("\x1b[38;5;"));
        assert!(!s8.contains("\x1b[38;2;"));
        let s4 = gradient_line("Neon", &g, true, ColorDepth::Ansi16);
        assert!(!s4.contains("\x1b[38;"));
        assert!(s4.contains("\x1b[35m") || s4.contains("\x1b[95m"));
    }

    #[test]
    fn gradient_line_keeps_spaces_plain() {
        let g = Gradient::new(Rgb::new(255, 0, 0), Rgb::new(0, 0, 255));
        let s = gradient_line("a b", &g, true, ColorDepth::TrueColor);
        assert_eq!(
            s,
            format!("\x1b[38;2;255;0;0ma \x1b[38;2;0;0;255mb{RESET}")
        );
        let colored = gradient_line("a b", &g, false, ColorDepth::TrueColor);
        assert_eq!(colored.matches("\x1b[38;2;").count(), 3);
    }
}
