//! Exporteurs de bannières : fichier ANSI et image PNG.

pub mod ansi;
pub mod raster;
pub mod target;

pub use ansi::write_ansi_file;
pub use raster::{RasterOptions, write_png};
pub use target::{ExportKind, ExportTarget, sanitize};
