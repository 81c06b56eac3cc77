/// Grille de glyphes ASCII-art, immuable une fois construite.
///
/// Les lignes peuvent avoir des longueurs différentes : toute position
/// au-delà de la fin d'une ligne se lit comme un espace.
///
/// # Example
/// ```
/// use nr_core::glyph::GlyphGrid;
/// let grid = GlyphGrid::from_lines(["AB", "C"]);
/// assert_eq!(grid.width(), 2);
/// assert_eq!(grid.height(), 2);
/// assert_eq!(grid.char_at(1, 1), ' ');
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphGrid {
    rows: Vec<Vec<char>>,
}

impl GlyphGrid {
    /// Construit une grille à partir de lignes de texte.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rows: lines
                .into_iter()
                .map(|l| l.as_ref().chars().collect())
                .collect(),
        }
    }

    /// Découpe un texte multi-lignes (`\n`) en grille.
    ///
    /// # Example
    /// ```
    /// use nr_core::glyph::GlyphGrid;
    /// assert_eq!(GlyphGrid::parse("ab\ncd").height(), 2);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::from_lines(text.split('\n'))
    }

    /// Largeur en caractères de la plus longue ligne (peut valoir 0).
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Nombre de lignes.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Caractère en (x, y), espace hors limites.
    #[inline(always)]
    #[must_use]
    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(' ')
    }

    /// Lignes brutes.
    #[must_use]
    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    /// `true` si la grille ne contient que des espaces (ou rien).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.rows.iter().flatten().all(|c| *c == ' ')
    }

    /// Lignes reconstruites en `String`.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.iter().collect()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_counts_chars_not_bytes() {
        let grid = GlyphGrid::from_lines(["██╗", "x"]);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.char_at(2, 0), '╗');
        assert_eq!(grid.char_at(0, 5), ' ');
    }

    #[test]
    fn empty_grid() {
        let grid = GlyphGrid::default();
        assert_eq!(grid.width(), 0);
        assert_eq!(grid.height(), 0);
        assert!(grid.is_blank());
        assert!(GlyphGrid::from_lines(["", "  "]).is_blank());
    }

    #[test]
    fn lines_roundtrip_text() {
        let grid = GlyphGrid::parse("ab\n\ncd ");
        assert_eq!(grid.lines(), ["ab", "", "cd "]);
    }
}
