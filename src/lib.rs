pub mod error;
pub mod icon_gen;
pub mod manifest;
pub mod png;
pub mod raster;

pub use crate::error::IconError;
pub use crate::icon_gen::{generate_icons, write_icons, Args, IconOutcome};
pub use crate::png::{build_chunk, build_png_bytes};
pub use crate::raster::{render_raster, IconSpec, Rgb, BRAND_COLOR, DEFAULT_SIZES};
