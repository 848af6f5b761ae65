//! Pixel rendering: byte → color strategies and the bitmap rasterizer.
//!
//! - `strategy`: the six renderer strategies and their typed settings
//! - `bitmap`: the rasterization loop producing row-major RGBA images

mod bitmap;
mod strategy;

pub use bitmap::{render_bitmap, render_bitmap_parallel, RgbaBitmap};
pub use strategy::{
    byte_bucket, ByteBucket, ByteClassRenderer, ExtremesRenderer, GrayscaleRenderer,
    HeatmapRenderer, PixelRenderer, RendererKind, RgbOrder, RgbRenderer, RgbaOrder, RgbaRenderer,
};
