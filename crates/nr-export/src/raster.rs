use std::collections::HashMap;
use std::path::Path;

use ab_glyph::{Font, FontRef, PxScale, point};
use anyhow::{Context, Result};
use image::{ImageFormat, RgbImage, RgbaImage, imageops};
use nr_core::color::{Gradient, Rgb};
use nr_core::glyph::GlyphGrid;
use nr_render::frame::{PaintedCell, paint_layers};
use rayon::prelude::*;

/// Côté maximal d'une image exportée, en pixels.
const MAX_SIDE: usize = 16_384;

/// Paramètres de rasterisation PNG.
///
/// Les tailles sont en pixels logiques, multipliées par `scale`.
///
/// # Example
/// ```
/// use nr_export::raster::RasterOptions;
/// let opts = RasterOptions::default();
/// assert_eq!(opts.scale, 2);
/// assert_eq!(opts.font_size, 14);
/// ```
#[derive(Clone, Debug)]
pub struct RasterOptions {
    /// Facteur d'échelle (pixels physiques par pixel logique).
    pub scale: u32,
    /// Taille de police logique ; fixe la taille des cellules.
    pub font_size: u32,
    /// Couleur de fond.
    pub background: Rgb,
    /// Rayon du halo autour du cœur, en pixels logiques. 0 désactive le halo.
    pub glow_radius: f32,
    /// Opacité du halo [0, 1].
    pub glow_strength: f32,
    /// Police TTF/OTF optionnelle ; sans elle, masques intégrés.
    pub font_data: Option<Vec<u8>>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 2,
            font_size: 14,
            background: Rgb::new(0x0b, 0x0b, 0x0e),
            glow_radius: 5.0,
            glow_strength: 0.9,
            font_data: None,
        }
    }
}

impl RasterOptions {
    /// Charge une police TTF/OTF depuis le disque.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn with_font_file(mut self, path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Impossible de lire la police {}", path.display()))?;
        self.font_data = Some(data);
        Ok(self)
    }

    fn metrics(&self) -> CellMetrics {
        let scale = self.scale.max(1) as usize;
        let font_size = f64::from(self.font_size.max(1));
        CellMetrics {
            cell_w: ((font_size * 0.6).round() as usize).max(1) * scale,
            cell_h: ((font_size * 1.2).round() as usize).max(1) * scale,
            pad: 2 * self.font_size.max(1) as usize * scale,
            shadow_offset: scale,
            font_px: (font_size * scale as f64) as f32,
        }
    }
}

/// Géométrie des cellules en pixels physiques.
#[derive(Clone, Copy, Debug)]
struct CellMetrics {
    cell_w: usize,
    cell_h: usize,
    pad: usize,
    shadow_offset: usize,
    font_px: f32,
}

/// Dimensions de l'image produite pour `grid`.
///
/// # Example
/// ```
/// use nr_core::glyph::GlyphGrid;
/// use nr_export::raster::{raster_dimensions, RasterOptions};
/// let dims = raster_dimensions(&GlyphGrid::from_lines(["AB"]), &RasterOptions::default());
/// assert_eq!(dims, (144, 146));
/// ```
#[must_use]
pub fn raster_dimensions(grid: &GlyphGrid, options: &RasterOptions) -> (usize, usize) {
    let m = options.metrics();
    (
        grid.width().max(1) * m.cell_w + 2 * m.pad,
        grid.height() * m.cell_h + 2 * m.pad,
    )
}

/// Masques alpha des glyphes, un buffer `cell_w * cell_h` par caractère.
struct GlyphAtlas {
    cell_w: usize,
    masks: HashMap<char, Vec<u8>>,
    empty: Vec<u8>,
}

impl GlyphAtlas {
    /// Pré-calcule les masques de tous les caractères visibles de la grille.
    fn build(grid: &GlyphGrid, m: CellMetrics, font_data: Option<&[u8]>) -> Result<Self> {
        let font = font_data
            .map(FontRef::try_from_slice)
            .transpose()
            .context("Police invalide")?;

        let mut masks = HashMap::new();
        for &ch in grid.rows().iter().flatten() {
            if ch == ' ' || masks.contains_key(&ch) {
                continue;
            }
            let outline = font
                .as_ref()
                .and_then(|f| outline_mask(f, ch, m.font_px, m.cell_w, m.cell_h));
            let mask = outline.unwrap_or_else(|| builtin_mask(ch, m.cell_w, m.cell_h));
            masks.insert(ch, mask);
        }

        Ok(Self {
            cell_w: m.cell_w,
            masks,
            empty: vec![0; m.cell_w * m.cell_h],
        })
    }

    /// Ligne `cy` du masque de `ch`.
    #[inline]
    fn mask_row(&self, ch: char, cy: usize) -> &[u8] {
        let mask = self.masks.get(&ch).unwrap_or(&self.empty);
        let start = cy * self.cell_w;
        mask.get(start..start + self.cell_w).unwrap_or(&[])
    }
}

/// Masque d'un glyphe tracé depuis la police, `None` si la police ne le contient pas.
fn outline_mask(
    font: &FontRef<'_>,
    ch: char,
    font_px: f32,
    cell_w: usize,
    cell_h: usize,
) -> Option<Vec<u8>> {
    let gid = font.glyph_id(ch);
    // glyph_id 0 = .notdef
    if gid.0 == 0 {
        return None;
    }
    let scale = PxScale::from(font_px);
    let ascent_px = font.ascent_unscaled() * scale.y / font.height_unscaled();
    let outline = font.outline_glyph(gid.with_scale_and_position(scale, point(0.0, ascent_px)))?;

    let mut buffer = vec![0u8; cell_w * cell_h];
    let bounds = outline.px_bounds();
    #[allow(clippy::cast_possible_wrap)]
    outline.draw(|x, y, v| {
        let px = (x as i32 + bounds.min.x as i32).max(0) as usize;
        let py = (y as i32 + bounds.min.y as i32).max(0) as usize;
        if px < cell_w && py < cell_h {
            buffer[py * cell_w + px] = (v * 255.0).round() as u8;
        }
    });
    Some(buffer)
}

const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const UP: u8 = 4;
const DOWN: u8 = 8;

/// Branches (gauche, droite, haut, bas) et trait double des caractères de boîte.
fn box_arms(ch: char) -> Option<(u8, bool)> {
    let arms = match ch {
        '─' => (LEFT | RIGHT, false),
        '│' => (UP | DOWN, false),
        '┌' => (RIGHT | DOWN, false),
        '┐' => (LEFT | DOWN, false),
        '└' => (RIGHT | UP, false),
        '┘' => (LEFT | UP, false),
        '├' => (UP | DOWN | RIGHT, false),
        '┤' => (UP | DOWN | LEFT, false),
        '┬' => (LEFT | RIGHT | DOWN, false),
        '┴' => (LEFT | RIGHT | UP, false),
        '┼' => (LEFT | RIGHT | UP | DOWN, false),
        '═' => (LEFT | RIGHT, true),
        '║' => (UP | DOWN, true),
        '╔' => (RIGHT | DOWN, true),
        '╗' => (LEFT | DOWN, true),
        '╚' => (RIGHT | UP, true),
        '╝' => (LEFT | UP, true),
        '╠' => (UP | DOWN | RIGHT, true),
        '╣' => (UP | DOWN | LEFT, true),
        '╦' => (LEFT | RIGHT | DOWN, true),
        '╩' => (LEFT | RIGHT | UP, true),
        '╬' => (LEFT | RIGHT | UP | DOWN, true),
        _ => return None,
    };
    Some(arms)
}

/// Buffer alpha d'une cellule avec remplissage de rectangles.
struct MaskCanvas {
    w: usize,
    h: usize,
    data: Vec<u8>,
}

impl MaskCanvas {
    fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    /// Remplit `[x0, x1) × [y0, y1)` (bornes clampées) avec `alpha`.
    fn fill(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, alpha: u8) {
        for y in y0.min(self.h)..y1.min(self.h) {
            for x in x0.min(self.w)..x1.min(self.w) {
                let px = &mut self.data[y * self.w + x];
                *px = (*px).max(alpha);
            }
        }
    }

    /// Trace les branches d'un caractère de boîte, trait d'épaisseur `t` centré.
    fn stroke_arms(&mut self, arms: u8, t: usize) {
        let (w, h) = (self.w, self.h);
        let x0 = (w / 2).saturating_sub(t / 2);
        let y0 = (h / 2).saturating_sub(t / 2);
        if arms & LEFT != 0 {
            self.fill(0, y0, x0 + t, y0 + t, 255);
        }
        if arms & RIGHT != 0 {
            self.fill(x0, y0, w, y0 + t, 255);
        }
        if arms & UP != 0 {
            self.fill(x0, 0, x0 + t, y0 + t, 255);
        }
        if arms & DOWN != 0 {
            self.fill(x0, y0, x0 + t, h, 255);
        }
    }
}

/// Masque intégré : blocs pleins, demi-blocs, ombrages, traits de boîte ;
/// tout autre caractère visible devient un bloc en retrait.
fn builtin_mask(ch: char, w: usize, h: usize) -> Vec<u8> {
    let mut canvas = MaskCanvas::new(w, h);
    match ch {
        '█' => canvas.fill(0, 0, w, h, 255),
        '▀' => canvas.fill(0, 0, w, h / 2, 255),
        '▄' => canvas.fill(0, h / 2, w, h, 255),
        '▌' => canvas.fill(0, 0, w / 2, h, 255),
        '▐' => canvas.fill(w / 2, 0, w, h, 255),
        '░' => canvas.fill(0, 0, w, h, 64),
        '▒' => canvas.fill(0, 0, w, h, 128),
        '▓' => canvas.fill(0, 0, w, h, 192),
        _ => match box_arms(ch) {
            Some((arms, double)) => {
                let t = (w / 8).max(1);
                if double {
                    // Trait double = contour d'un trait épais.
                    let gap = (w / 5).max(t);
                    canvas.stroke_arms(arms, 2 * gap + t);
                    let mut inner = MaskCanvas::new(w, h);
                    inner.stroke_arms(arms, 2 * gap - t);
                    for (px, hole) in canvas.data.iter_mut().zip(&inner.data) {
                        if *hole != 0 {
                            *px = 0;
                        }
                    }
                } else {
                    canvas.stroke_arms(arms, t);
                }
            }
            None if !ch.is_whitespace() => {
                let (mx, my) = (w / 6, h / 6);
                canvas.fill(mx, my, w - mx, h - my, 255);
            }
            None => {}
        },
    }
    canvas.data
}

#[inline(always)]
fn premultiply(c: u8, alpha: u8) -> u8 {
    ((u16::from(c) * u16::from(alpha) + 127) / 255) as u8
}

/// Peint une couche de cellules en RGBA prémultiplié, origine (`ox`, `oy`).
/// Parallélisé par ligne de pixels.
fn paint_layer(
    size: (usize, usize),
    cells: &[Vec<PaintedCell>],
    atlas: &GlyphAtlas,
    cell_h: usize,
    origin: (usize, usize),
) -> Vec<u8> {
    let (width, height) = size;
    let (ox, oy) = origin;
    let stride = width * 4;
    let mut buf = vec![0u8; stride * height];

    buf.par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(py, row)| {
            let Some(local_y) = py.checked_sub(oy) else {
                return;
            };
            let Some(cell_row) = cells.get(local_y / cell_h) else {
                return;
            };
            let cy = local_y % cell_h;
            for (gx, cell) in cell_row.iter().enumerate() {
                let x0 = ox + gx * atlas.cell_w;
                for (cx, &alpha) in atlas.mask_row(cell.ch, cy).iter().enumerate() {
                    if alpha == 0 {
                        continue;
                    }
                    let idx = (x0 + cx) * 4;
                    if let Some(px) = row.get_mut(idx..idx + 4) {
                        px[0] = premultiply(cell.color.r, alpha);
                        px[1] = premultiply(cell.color.g, alpha);
                        px[2] = premultiply(cell.color.b, alpha);
                        px[3] = alpha;
                    }
                }
            }
        });
    buf
}

/// Compose une couche RGBA prémultipliée sur un fond RGB, avec une opacité globale.
fn composite_over(dst: &mut [u8], src: &[u8], strength: f32) {
    dst.par_chunks_exact_mut(3)
        .zip(src.par_chunks_exact(4))
        .for_each(|(d, s)| {
            if s[3] == 0 {
                return;
            }
            let keep = 1.0 - f32::from(s[3]) / 255.0 * strength;
            for (dc, &sc) in d.iter_mut().zip(&s[..3]) {
                let v = f32::from(sc) * strength + f32::from(*dc) * keep;
                *dc = v.round().clamp(0.0, 255.0) as u8;
            }
        });
}

/// Rasterise la bannière : fond, ombre décalée, halo flouté, cœur en dégradé.
///
/// # Errors
/// Returns an error if the font data is invalid or the image would be too large.
///
/// # Example
/// ```
/// use nr_core::color::{Gradient, Rgb};
/// use nr_core::glyph::GlyphGrid;
/// use nr_export::raster::{rasterize, RasterOptions};
/// let grid = GlyphGrid::from_lines(["██"]);
/// let g = Gradient::new(Rgb::new(255, 0, 255), Rgb::new(0, 255, 255));
/// let img = rasterize(&grid, &g, &RasterOptions::default()).unwrap();
/// assert_eq!(img.dimensions(), (144, 146));
/// ```
pub fn rasterize(
    grid: &GlyphGrid,
    gradient: &Gradient,
    options: &RasterOptions,
) -> Result<RgbImage> {
    let m = options.metrics();
    let (width, height) = raster_dimensions(grid, options);
    anyhow::ensure!(
        width <= MAX_SIDE && height <= MAX_SIDE,
        "Image trop grande : {width}x{height} (max {MAX_SIDE})"
    );
    let (w32, h32) = (u32::try_from(width)?, u32::try_from(height)?);

    let painted = paint_layers(grid, gradient, |_, _| 1.0);
    let atlas = GlyphAtlas::build(grid, m, options.font_data.as_deref())?;

    let bg = options.background;
    let mut canvas: Vec<u8> = std::iter::repeat_n([bg.r, bg.g, bg.b], width * height)
        .flatten()
        .collect();

    let shadow_origin = (m.pad + m.shadow_offset, m.pad + m.shadow_offset);
    let shadow = paint_layer((width, height), &painted.shadow, &atlas, m.cell_h, shadow_origin);
    composite_over(&mut canvas, &shadow, 1.0);

    let core = paint_layer((width, height), &painted.core, &atlas, m.cell_h, (m.pad, m.pad));

    let sigma = options.glow_radius * options.scale.max(1) as f32 / 2.0;
    if sigma > 0.0 && options.glow_strength > 0.0 {
        let core_img = RgbaImage::from_raw(w32, h32, core.clone())
            .context("Buffer de couche incohérent")?;
        let glow = imageops::blur(&core_img, sigma).into_raw();
        composite_over(&mut canvas, &glow, options.glow_strength.min(1.0));
    }

    composite_over(&mut canvas, &core, 1.0);

    RgbImage::from_raw(w32, h32, canvas).context("Buffer image incohérent")
}

/// Écrit la bannière en PNG.
///
/// # Errors
/// Returns an error if rasterization fails or the file cannot be written.
///
/// # Example
/// ```no_run
/// use nr_core::color::{Gradient, Rgb};
/// use nr_core::glyph::GlyphGrid;
/// use nr_export::raster::{write_png, RasterOptions};
/// use std::path::Path;
/// let grid = GlyphGrid::from_lines(["█"]);
/// let g = Gradient::new(Rgb::new(255, 0, 255), Rgb::new(0, 255, 255));
/// write_png(&grid, &g, Path::new("neon.png"), &RasterOptions::default()).unwrap();
/// ```
pub fn write_png(
    grid: &GlyphGrid,
    gradient: &Gradient,
    path: &Path,
    options: &RasterOptions,
) -> Result<()> {
    let img = rasterize(grid, gradient, options)?;
    img.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!(
        "Export PNG écrit : {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neon() -> Gradient {
        Gradient::new(Rgb::new(255, 0, 255), Rgb::new(0, 255, 255))
    }

    fn pixel(img: &RgbImage, x: u32, y: u32) -> Rgb {
        let p = img.get_pixel(x, y);
        Rgb::new(p[0], p[1], p[2])
    }

    #[test]
    fn dimensions_follow_cell_metrics() {
        let opts = RasterOptions::default();
        assert_eq!(raster_dimensions(&GlyphGrid::from_lines(["ABC", "A"]), &opts), (160, 180));
        assert_eq!(raster_dimensions(&GlyphGrid::default(), &opts), (128, 112));
        let small = RasterOptions {
            scale: 1,
            font_size: 10,
            ..RasterOptions::default()
        };
        assert_eq!(raster_dimensions(&GlyphGrid::from_lines(["A"]), &small), (46, 52));
    }

    #[test]
    fn blank_grid_is_background() -> Result<()> {
        let opts = RasterOptions::default();
        let img = rasterize(&GlyphGrid::from_lines(["   "]), &neon(), &opts)?;
        assert!(img.pixels().all(|p| p.0 == [0x0b, 0x0b, 0x0e]));
        Ok(())
    }

    #[test]
    fn core_shadow_and_glow_layers() -> Result<()> {
        let opts = RasterOptions::default();
        let img = rasterize(&GlyphGrid::from_lines(["█"]), &neon(), &opts)?;
        let bg = opts.background;
        // cell 16x34 at (56, 56)
        assert_eq!(pixel(&img, 60, 70), neon().start);
        let shadow_only = pixel(&img, 56 + 17, 56 + 35);
        assert_ne!(shadow_only, bg);
        assert!(shadow_only.r < neon().start.r);
        assert_eq!(pixel(&img, 0, 0), bg);
        assert_ne!(pixel(&img, 50, 70), bg, "glow halo left of the cell");
        Ok(())
    }

    #[test]
    fn horizontal_gradient_across_cells() -> Result<()> {
        let opts = RasterOptions {
            glow_radius: 0.0,
            ..RasterOptions::default()
        };
        let img = rasterize(&GlyphGrid::from_lines(["███"]), &neon(), &opts)?;
        assert_eq!(pixel(&img, 60, 70), neon().start);
        assert_eq!(pixel(&img, 56 + 2 * 16 + 4, 70), neon().end);
        Ok(())
    }

    #[test]
    fn rasterization_is_deterministic() -> Result<()> {
        let grid = GlyphGrid::from_lines(["██╗  ██╗", "╚═╝  ╚═╝", "▀▄ ░▒▓ x"]);
        let opts = RasterOptions::default();
        let a = rasterize(&grid, &neon(), &opts)?;
        let b = rasterize(&grid, &neon(), &opts)?;
        assert_eq!(a.as_raw(), b.as_raw());
        Ok(())
    }

    #[test]
    fn builtin_masks() {
        let (w, h) = (16, 34);
        assert!(builtin_mask('█', w, h).iter().all(|&a| a == 255));
        assert!(builtin_mask(' ', w, h).iter().all(|&a| a == 0));

        let top = builtin_mask('▀', w, h);
        assert_eq!(top[0], 255);
        assert_eq!(top[(h - 1) * w], 0);

        // deux traits horizontaux distincts dans la colonne centrale
        let double = builtin_mask('═', w, h);
        let column: Vec<u8> = (0..h).map(|y| double[y * w + w / 2]).collect();
        let strokes = column.windows(2).filter(|p| p[0] == 0 && p[1] == 255).count();
        assert_eq!(strokes, 2);

        let single = builtin_mask('│', w, h);
        assert_eq!(single[w / 2], 255);
        assert_eq!(single[0], 0);
    }

    #[test]
    fn invalid_font_is_an_error() {
        let opts = RasterOptions {
            font_data: Some(vec![0, 1, 2, 3]),
            ..RasterOptions::default()
        };
        assert!(rasterize(&GlyphGrid::from_lines(["A"]), &neon(), &opts).is_err());
    }

    #[test]
    fn writes_png_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("banner.png");
        write_png(&GlyphGrid::from_lines(["█▀"]), &neon(), &path, &RasterOptions::default())?;
        let decoded = image::open(&path)?;
        assert_eq!((decoded.width(), decoded.height()), (144, 146));
        Ok(())
    }
}
