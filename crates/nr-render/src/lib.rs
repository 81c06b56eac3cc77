//! Pipeline de rendu néon de neonrender.
//!
//! Fournit la bibliothèque d'effets, leur composition, le rendu de frames
//! ANSI, la détection terminal et le cadencement des frames.

pub mod compose;
pub mod effects;
pub mod frame;
pub mod pacer;
pub mod term;

pub use compose::{CompositeEffect, EffectSpec, build_composite, parse_spec};
pub use effects::{Effect, EffectKind, EffectParams, Intensity};
pub use frame::{RenderOptions, render_frame, render_static_frame};
