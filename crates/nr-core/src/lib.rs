//! Types partagés de neonrender : couleurs, palettes, grilles de glyphes,
//! configuration et horloge d'animation.
//!
//! Ce crate ne fait aucune entrée/sortie terminal ; il est utilisé par tous
//! les autres crates du workspace.

pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod glyph;
pub mod palette;

pub use color::{ColorDepth, Gradient, Rgb};
pub use config::NeonConfig;
pub use error::CoreError;
pub use glyph::GlyphGrid;
