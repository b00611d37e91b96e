//! Group colors for the presentation layer.
//!
//! A registry is built once per rendering session from every group that will
//! appear on the wall, then handed to each panel so a group keeps its color
//! across panels.

pub mod registry;

pub use registry::{is_hex_color, ColorRegistry, FALLBACK_COLOR, TAB10};
