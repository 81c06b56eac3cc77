//! Fournisseur de glyphes : texte → [`GlyphGrid`] ASCII-art.

pub mod ansi_shadow;

use nr_core::glyph::GlyphGrid;

/// Police par défaut.
pub const DEFAULT_FONT: &str = "block";

/// Polices disponibles.
pub const FONTS: &[&str] = &["block", "plain"];

/// Noms des polices, dans l'ordre d'affichage.
#[must_use]
pub fn list_fonts() -> Vec<&'static str> {
    FONTS.to_vec()
}

/// Rend `text` dans la police `font_key`.
///
/// `block` dessine chaque ligne du texte en bannière de
/// [`ansi_shadow::HEIGHT`] lignes, les bannières étant empilées. `plain`
/// garde le texte tel quel. Une police inconnue retombe sur `block`.
///
/// # Example
/// ```
/// use nr_font::render_text;
/// let grid = render_text("Hi", "block");
/// assert_eq!(grid.height(), 6);
/// assert_eq!(render_text("a\nb", "plain").height(), 2);
/// ```
#[must_use]
pub fn render_text(text: &str, font_key: &str) -> GlyphGrid {
    match font_key.trim().to_lowercase().as_str() {
        "plain" => GlyphGrid::parse(&text.replace('\r', "")),
        "block" => render_block(text),
        other => {
            log::warn!("Police inconnue '{other}', utilisation de {DEFAULT_FONT}.");
            render_block(text)
        }
    }
}

fn render_block(text: &str) -> GlyphGrid {
    let rows: Vec<String> = text
        .split('\n')
        .flat_map(|line| banner_rows(line.trim_end_matches('\r')))
        .collect();
    GlyphGrid::from_lines(rows)
}

/// Les lignes de la bannière d'une ligne de texte.
fn banner_rows(line: &str) -> [String; ansi_shadow::HEIGHT] {
    let mut rows: [String; ansi_shadow::HEIGHT] = Default::default();
    for ch in line.chars() {
        let ch = if ch == '\t' { ' ' } else { ch };
        let Some(glyph) =
            ansi_shadow::glyph(ch).or_else(|| ansi_shadow::glyph(ansi_shadow::FALLBACK))
        else {
            continue;
        };
        for (row, part) in rows.iter_mut().zip(glyph.iter()) {
            row.push_str(part);
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width_of(s: &str) -> usize {
        s.chars().count()
    }

    #[test]
    fn glyph_rows_share_a_width() {
        for (ch, rows) in ansi_shadow::GLYPHS {
            let w = width_of(rows[0]);
            assert!(w > 0, "{ch:?}");
            for row in rows {
                assert_eq!(width_of(row), w, "glyph {ch:?}");
            }
        }
    }

    #[test]
    fn covers_letters_digits_and_punctuation() {
        for ch in ('A'..='Z').chain('0'..='9').chain(" !.,-?:'/".chars()) {
            assert!(ansi_shadow::glyph(ch).is_some(), "missing {ch:?}");
        }
    }

    #[test]
    fn banner_width_is_sum_of_glyphs() {
        let grid = render_text("NEON", "block");
        let expected: usize = "NEON"
            .chars()
            .filter_map(ansi_shadow::glyph)
            .map(|g| width_of(g[0]))
            .sum();
        assert_eq!(grid.width(), expected);
        assert_eq!(grid.height(), ansi_shadow::HEIGHT);
        assert!(grid.rows().iter().all(|r| r.len() == expected));
    }

    #[test]
    fn lowercase_matches_uppercase() {
        assert_eq!(render_text("neon", "block"), render_text("NEON", "block"));
    }

    #[test]
    fn unknown_characters_render_as_question_mark() {
        assert_eq!(render_text("é", "block"), render_text("?", "block"));
    }

    #[test]
    fn multi_line_text_stacks_banners() {
        let grid = render_text("AB\nC", "block");
        assert_eq!(grid.height(), 2 * ansi_shadow::HEIGHT);
        assert_eq!(
            grid.lines()[ansi_shadow::HEIGHT],
            render_text("C", "block").lines()[0]
        );
    }

    #[test]
    fn plain_and_unknown_fonts() {
        let plain = render_text("hello\nworld", "plain");
        assert_eq!(plain.lines(), ["hello", "world"]);
        assert_eq!(render_text("X", "gothic"), render_text("X", "block"));
        assert_eq!(render_text("X", " BLOCK "), render_text("X", "block"));
        assert_eq!(list_fonts(), ["block", "plain"]);
    }

    #[test]
    fn empty_text_is_blank() {
        let grid = render_text("", "block");
        assert_eq!(grid.height(), ansi_shadow::HEIGHT);
        assert_eq!(grid.width(), 0);
        assert!(grid.is_blank());
    }
}
