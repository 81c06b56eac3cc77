use std::path::Path;

use anyhow::{Context, Result};

/// Écrit une frame ANSI dans un fichier UTF-8, terminée par exactement un `\n`.
///
/// # Errors
/// Returns an error if the file cannot be written.
///
/// # Example
/// ```no_run
/// use nr_export::ansi::write_ansi_file;
/// use std::path::Path;
/// write_ansi_file("\n\x1b[0m", Path::new("neon.ansi")).unwrap();
/// ```
pub fn write_ansi_file(frame: &str, path: &Path) -> Result<()> {
    let mut content = frame.trim_end_matches('\n').to_string();
    content.push('\n');
    std::fs::write(path, content)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!("Export ANSI écrit : {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(frame: &str) -> Result<String> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("banner.ansi");
        write_ansi_file(frame, &path)?;
        Ok(std::fs::read_to_string(&path)?)
    }

    #[test]
    fn appends_single_newline() -> Result<()> {
        assert_eq!(roundtrip("\nabc\x1b[0m")?, "\nabc\x1b[0m\n");
        Ok(())
    }

    #[test]
    fn collapses_trailing_newlines() -> Result<()> {
        assert_eq!(roundtrip("abc\n")?, "abc\n");
        assert_eq!(roundtrip("abc\n\n\n")?, "abc\n");
        assert_eq!(roundtrip("")?, "\n");
        Ok(())
    }

    #[test]
    fn missing_directory_is_an_error() {
        let err = write_ansi_file("x", Path::new("/nonexistent-dir/neon.ansi"));
        assert!(err.is_err());
    }
}
