use nr_core::color::{ColorDepth, Gradient, RESET, Rgb, scale, write_fg_code};
use nr_core::glyph::GlyphGrid;

/// Atténuation de la couche d'ombre.
pub const SHADOW_SCALE: f64 = 0.35;

/// Options de rendu d'une frame.
///
/// # Example
/// ```
/// use nr_render::frame::RenderOptions;
/// use nr_core::color::ColorDepth;
/// let opts = RenderOptions::default();
/// assert!(opts.keep_spaces_colorless);
/// assert_eq!(opts.depth, ColorDepth::TrueColor);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Émettre les espaces sans code couleur.
    pub keep_spaces_colorless: bool,
    /// Encodage couleur cible.
    pub depth: ColorDepth,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            keep_spaces_colorless: true,
            depth: ColorDepth::TrueColor,
        }
    }
}

impl RenderOptions {
    /// Options par défaut pour une profondeur donnée.
    #[must_use]
    pub fn with_depth(depth: ColorDepth) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }
}

/// Largeur de rendu : ligne la plus longue, au moins 1.
#[inline]
#[must_use]
pub fn frame_width(grid: &GlyphGrid) -> usize {
    grid.width().max(1)
}

/// Position dans le dégradé de la colonne `x` (0 si une seule colonne).
#[inline(always)]
fn gradient_t(x: usize, width: usize) -> f64 {
    if width <= 1 {
        0.0
    } else {
        x as f64 / (width - 1) as f64
    }
}

/// Couleur finale d'une cellule : dégradé puis luminosité.
#[inline(always)]
fn cell_color(gradient: &Gradient, x: usize, width: usize, brightness: f64) -> Rgb {
    scale(gradient.at(gradient_t(x, width)), brightness)
}

/// Écrit une couche (ombre ou cœur) ligne par ligne, chaque ligne précédée de `\n`.
fn push_layer<F>(
    out: &mut String,
    grid: &GlyphGrid,
    gradient: &Gradient,
    intensity: &F,
    layer_scale: f64,
    offset: bool,
    options: RenderOptions,
) where
    F: Fn(usize, usize) -> f64,
{
    let width = frame_width(grid);
    for y in 0..grid.height() {
        out.push('\n');
        if offset {
            out.push(' ');
        }
        for x in 0..width {
            let ch = grid.char_at(x, y);
            if !(options.keep_spaces_colorless && ch == ' ') {
                let color = cell_color(gradient, x, width, layer_scale * intensity(x, y));
                write_fg_code(out, color, options.depth);
            }
            out.push(ch);
        }
        out.push_str(RESET);
    }
}

/// Rend une frame complète : ligne vide, couche d'ombre décalée d'une
/// colonne et atténuée, puis couche de cœur, puis [`RESET`] final.
///
/// `intensity(x, y)` est le multiplicateur de luminosité de la cellule pour
/// l'instant rendu. Pur : mêmes entrées, mêmes octets.
///
/// # Example
/// ```
/// use nr_core::color::{Gradient, Rgb};
/// use nr_core::glyph::GlyphGrid;
/// use nr_render::frame::{render_frame, RenderOptions};
///
/// let grid = GlyphGrid::from_lines(["AB"]);
/// let g = Gradient::new(Rgb::new(255, 0, 255), Rgb::new(0, 255, 255));
/// let frame = render_frame(&grid, &g, |_, _| 1.0, RenderOptions::default());
/// assert!(frame.contains("\x1b[38;2;255;0;255mA\x1b[38;2;0;255;255mB\x1b[0m"));
/// ```
#[must_use]
pub fn render_frame<F>(
    grid: &GlyphGrid,
    gradient: &Gradient,
    intensity: F,
    options: RenderOptions,
) -> String
where
    F: Fn(usize, usize) -> f64,
{
    let width = frame_width(grid);
    let mut out = String::with_capacity(2 * grid.height() * (width * 20 + 8) + 8);
    push_layer(&mut out, grid, gradient, &intensity, SHADOW_SCALE, true, options);
    push_layer(&mut out, grid, gradient, &intensity, 1.0, false, options);
    out.push_str(RESET);
    out
}

/// Frame statique : intensité 1 partout.
#[must_use]
pub fn render_static_frame(
    grid: &GlyphGrid,
    gradient: &Gradient,
    options: RenderOptions,
) -> String {
    render_frame(grid, gradient, |_, _| 1.0, options)
}

/// Cellule peinte, pour les exporteurs raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaintedCell {
    /// Caractère du glyphe.
    pub ch: char,
    /// Couleur finale de la cellule.
    pub color: Rgb,
}

/// Les deux couches d'une frame sous forme de cellules colorées.
///
/// L'ombre n'inclut pas le décalage d'une colonne : c'est à l'exporteur
/// de le placer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaintedFrame {
    /// Largeur commune des lignes.
    pub width: usize,
    /// Couche d'ombre.
    pub shadow: Vec<Vec<PaintedCell>>,
    /// Couche de cœur.
    pub core: Vec<Vec<PaintedCell>>,
}

/// Calcule les couleurs de chaque cellule des deux couches, avec les mêmes
/// règles que [`render_frame`] (lignes complétées par des espaces).
///
/// # Example
/// ```
/// use nr_core::color::{Gradient, Rgb};
/// use nr_core::glyph::GlyphGrid;
/// use nr_render::frame::paint_layers;
///
/// let grid = GlyphGrid::from_lines(["X"]);
/// let g = Gradient::new(Rgb::new(200, 100, 0), Rgb::new(0, 0, 0));
/// let painted = paint_layers(&grid, &g, |_, _| 1.0);
/// assert_eq!(painted.core[0][0].color, Rgb::new(200, 100, 0));
/// assert_eq!(painted.shadow[0][0].color, Rgb::new(70, 35, 0));
/// ```
#[must_use]
pub fn paint_layers<F>(grid: &GlyphGrid, gradient: &Gradient, intensity: F) -> PaintedFrame
where
    F: Fn(usize, usize) -> f64,
{
    let width = frame_width(grid);
    let layer = |layer_scale: f64| -> Vec<Vec<PaintedCell>> {
        (0..grid.height())
            .map(|y| {
                (0..width)
                    .map(|x| PaintedCell {
                        ch: grid.char_at(x, y),
                        color: cell_color(gradient, x, width, layer_scale * intensity(x, y)),
                    })
                    .collect()
            })
            .collect()
    };
    PaintedFrame {
        width,
        shadow: layer(SHADOW_SCALE),
        core: layer(1.0),
    }
}
