use std::fmt;
use std::path::{Path, PathBuf};

use nr_core::error::CoreError;

/// Nom de fichier de repli quand le texte ne donne rien d'utilisable.
const FALLBACK_STEM: &str = "neon";

/// Longueur maximale d'un nom de fichier dérivé du texte.
const MAX_STEM_LEN: usize = 64;

/// Format de sortie d'un export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    /// Frame ANSI brute, texte UTF-8.
    Ansi,
    /// Image raster PNG.
    Png,
}

impl ExportKind {
    /// Extension de fichier associée.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Ansi => "ansi",
            Self::Png => "png",
        }
    }

    /// Type d'export à partir de son nom (`ansi`, `png`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ansi" => Some(Self::Ansi),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Destination résolue d'un export : format + chemin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportTarget {
    /// Format de sortie.
    pub kind: ExportKind,
    /// Fichier à écrire.
    pub path: PathBuf,
}

impl ExportTarget {
    /// Résout l'argument `--export` et l'option `--out`.
    ///
    /// Une valeur contenant `.`, `/` ou `\` est un chemin : le format vient de
    /// l'extension (`png` → PNG, `gif` refusé, sinon ANSI) et `out` reste
    /// prioritaire.
    /// Sinon la valeur est un nom de format. Sans chemin, le fichier est
    /// `sanitize(base_name)` + extension.
    ///
    /// # Errors
    /// Returns [`CoreError::UnsupportedExport`] for an unknown format name or a
    /// `.gif` path.
    ///
    /// # Example
    /// ```
    /// use nr_export::target::{ExportKind, ExportTarget};
    /// let target = ExportTarget::parse("png", None, "Hello, Neon").unwrap();
    /// assert_eq!(target.kind, ExportKind::Png);
    /// assert_eq!(target.path.to_str(), Some("hello-neon.png"));
    /// ```
    pub fn parse(
        type_or_path: &str,
        out: Option<&Path>,
        base_name: &str,
    ) -> Result<Self, CoreError> {
        let lower = type_or_path.trim().to_lowercase();
        let looks_like_path = lower.contains(['.', '/', '\\']);

        let (kind, path) = if looks_like_path {
            let ext = lower.rsplit('.').next().unwrap_or_default();
            let kind = match ext {
                "png" => ExportKind::Png,
                "gif" => {
                    return Err(CoreError::UnsupportedExport {
                        kind: ext.to_string(),
                    });
                }
                _ => ExportKind::Ansi,
            };
            let path = out.map_or_else(|| PathBuf::from(type_or_path.trim()), Path::to_path_buf);
            (kind, Some(path))
        } else {
            let kind = ExportKind::from_name(&lower)
                .ok_or_else(|| CoreError::UnsupportedExport { kind: lower.clone() })?;
            (kind, out.map(Path::to_path_buf))
        };

        let path = path.unwrap_or_else(|| {
            PathBuf::from(format!("{}.{}", sanitize(base_name), kind.extension()))
        });
        Ok(Self { kind, path })
    }
}

/// Nom de fichier sûr dérivé d'un texte libre.
///
/// Minuscules, espaces de bord retirés, chaque suite de caractères hors
/// `[a-z0-9._-]` remplacée par `-`, tronqué à 64 caractères, `neon` si vide.
///
/// # Example
/// ```
/// use nr_export::target::sanitize;
/// assert_eq!(sanitize("  Hello, Neon!  "), "hello-neon-");
/// assert_eq!(sanitize(""), "neon");
/// ```
#[must_use]
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.trim().to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '.' | '_' | '-') {
            out.push(ch);
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }
    let out: String = out.chars().take(MAX_STEM_LEN).collect();
    if out.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        out
    }
}
