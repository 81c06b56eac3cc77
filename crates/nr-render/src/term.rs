use nr_core::color::ColorDepth;

/// Détecte la profondeur de couleur à partir de variables d'environnement.
///
/// `lookup` renvoie la valeur d'une variable, ou `None` si absente.
/// Sans indice exploitable, on suppose 256 couleurs.
///
/// # Example
/// ```
/// use nr_render::term::probe_color_depth;
/// use nr_core::color::ColorDepth;
/// let env = |k: &str| (k == "COLORTERM").then(|| "truecolor".to_string());
/// assert_eq!(probe_color_depth(env), ColorDepth::TrueColor);
/// assert_eq!(probe_color_depth(|_| None), ColorDepth::Ansi256);
/// ```
pub fn probe_color_depth<F>(lookup: F) -> ColorDepth
where
    F: Fn(&str) -> Option<String>,
{
    let colorterm = lookup("COLORTERM").unwrap_or_default().to_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorDepth::TrueColor;
    }
    // Windows Terminal
    if lookup("WT_SESSION").is_some() {
        return ColorDepth::TrueColor;
    }
    if lookup("TERM_PROGRAM").as_deref() == Some("iTerm.app") {
        return ColorDepth::TrueColor;
    }

    match lookup("TERM").map(|t| t.to_lowercase()) {
        Some(term) if term.contains("direct") || term.contains("truecolor") => {
            ColorDepth::TrueColor
        }
        Some(term) if term.contains("256") => ColorDepth::Ansi256,
        Some(term) if !term.is_empty() => ColorDepth::Ansi16,
        _ => ColorDepth::Ansi256,
    }
}

/// Profondeur de couleur du terminal courant (environnement du processus).
#[must_use]
pub fn detect_color_depth() -> ColorDepth {
    let depth = probe_color_depth(|key| std::env::var(key).ok());
    log::debug!("Profondeur couleur détectée : {} bits", depth.bits());
    depth
}

/// Nombre de lignes terminal occupées par une frame.
///
/// # Example
/// ```
/// use nr_render::term::line_count;
/// assert_eq!(line_count("\na\nb"), 3);
/// ```
#[must_use]
pub fn line_count(frame: &str) -> u16 {
    frame.split('\n').count().min(usize::from(u16::MAX)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn truecolor_hints() {
        assert_eq!(probe_color_depth(env(&[("COLORTERM", "24bit")])), ColorDepth::TrueColor);
        assert_eq!(probe_color_depth(env(&[("WT_SESSION", "abc")])), ColorDepth::TrueColor);
        assert_eq!(
            probe_color_depth(env(&[("TERM_PROGRAM", "iTerm.app"), ("TERM", "xterm")])),
            ColorDepth::TrueColor
        );
        assert_eq!(
            probe_color_depth(env(&[("TERM", "xterm-direct")])),
            ColorDepth::TrueColor
        );
    }

    #[test]
    fn term_names() {
        assert_eq!(
            probe_color_depth(env(&[("TERM", "xterm-256color")])),
            ColorDepth::Ansi256
        );
        assert_eq!(probe_color_depth(env(&[("TERM", "linux")])), ColorDepth::Ansi16);
        assert_eq!(probe_color_depth(env(&[("TERM", "")])), ColorDepth::Ansi256);
        assert_eq!(probe_color_depth(env(&[])), ColorDepth::Ansi256);
    }
}
