//! Binviz - binary data visualization core.
//!
//! This library renders raw binary data as a 2D pixel image: each byte (or
//! group of bytes) in a buffer is mapped to an RGB(A) color via a selectable
//! renderer strategy, then written into a row-major RGBA bitmap. Strategies:
//! - RGB / RGBA channel packing (configurable byte order)
//! - Grayscale
//! - Byte classification (control / printable / digit / letter / high-bit)
//! - Extremes highlighting (0x00, 0xFF, threshold bands)
//! - Heatmap (5-color gradient over 4 threshold segments)
//!
//! The library stops at the RGBA buffer; displaying or exporting it is the
//! caller's concern.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

pub mod color;
pub mod render;
pub mod settings;

pub use color::{Color, Hsl};
pub use render::{render_bitmap, render_bitmap_parallel, PixelRenderer, RendererKind, RgbaBitmap};
pub use settings::{
    RendererSetting, SettingError, SettingKind, SettingValue, VisualizationSettings,
};
