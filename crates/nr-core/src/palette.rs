use crate::color::{Gradient, Rgb};

/// Palette utilisée quand le nom demandé est inconnu.
pub const DEFAULT_PALETTE: &str = "neon-violet";

/// Palettes nommées, dans l'ordre de cycle du mode interactif.
pub const PALETTES: &[(&str, Gradient)] = &[
    (
        "neon-violet",
        Gradient::new(Rgb::new(255, 0, 255), Rgb::new(0, 255, 255)),
    ),
    (
        "cyberpunk-pinkblue",
        Gradient::new(Rgb::new(255, 0, 127), Rgb::new(0, 209, 255)),
    ),
    (
        "matrix-green",
        Gradient::new(Rgb::new(0, 255, 136), Rgb::new(0, 255, 0)),
    ),
    (
        "neon-amber",
        Gradient::new(Rgb::new(255, 122, 0), Rgb::new(255, 191, 0)),
    ),
];

/// Noms courts acceptés en ligne de commande.
const ALIASES: &[(&str, &str)] = &[
    ("cyberpunk", "cyberpunk-pinkblue"),
    ("matrix", "matrix-green"),
    ("amber", "neon-amber"),
    ("violet", "neon-violet"),
];

/// Résout un nom (ou alias) de palette. Un nom inconnu donne la palette par défaut.
///
/// # Example
/// ```
/// use nr_core::palette::resolve_palette;
/// use nr_core::color::Rgb;
/// assert_eq!(resolve_palette("matrix").end, Rgb::new(0, 255, 0));
/// assert_eq!(resolve_palette("nope"), resolve_palette("neon-violet"));
/// ```
#[must_use]
pub fn resolve_palette(name: &str) -> Gradient {
    lookup(name).unwrap_or(PALETTES[0].1)
}

/// Comme [`resolve_palette`] mais signale l'absence au lieu de retomber sur le défaut.
#[must_use]
pub fn lookup(name: &str) -> Option<Gradient> {
    let key = name.trim().to_ascii_lowercase();
    let key = ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map_or(key.as_str(), |(_, full)| full);
    PALETTES
        .iter()
        .find(|(n, _)| *n == key)
        .map(|(_, g)| *g)
}

/// Noms canoniques des palettes, dans l'ordre de déclaration.
#[must_use]
pub fn list_palettes() -> Vec<&'static str> {
    PALETTES.iter().map(|(n, _)| *n).collect()
}

/// Index d'une palette (alias compris) dans [`PALETTES`], 0 si inconnue.
#[must_use]
pub fn palette_index(name: &str) -> usize {
    let Some(gradient) = lookup(name) else {
        return 0;
    };
    PALETTES
        .iter()
        .position(|(_, g)| *g == gradient)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_full_names() {
        assert_eq!(resolve_palette("cyberpunk"), resolve_palette("cyberpunk-pinkblue"));
        assert_eq!(resolve_palette("amber"), resolve_palette("neon-amber"));
        assert_eq!(resolve_palette("violet"), resolve_palette("neon-violet"));
        assert_eq!(resolve_palette("  Matrix "), resolve_palette("matrix-green"));
    }

    #[test]
    fn unknown_falls_back_to_default() {
        assert!(lookup("sunset").is_none());
        assert_eq!(resolve_palette("sunset"), resolve_palette(DEFAULT_PALETTE));
        assert_eq!(resolve_palette(""), resolve_palette(DEFAULT_PALETTE));
    }

    #[test]
    fn listing_and_index() {
        assert_eq!(
            list_palettes(),
            ["neon-violet", "cyberpunk-pinkblue", "matrix-green", "neon-amber"]
        );
        assert_eq!(palette_index("amber"), 3);
        assert_eq!(palette_index("unknown"), 0);
    }
}
