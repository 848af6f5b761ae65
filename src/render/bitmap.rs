//! Bitmap rasterization: drives the active renderer across an output grid.
//!
//! The rasterizer walks the output row-major, pulling bytes from the source
//! buffer at `settings.offset` and advancing by `settings.step` after every
//! pixel. The step is independent of the renderer's `skip_bytes`; a step
//! below `skip_bytes` produces overlapping reads, which is intentional.

use rayon::prelude::*;

use crate::color::Color;
use crate::settings::VisualizationSettings;

/// Bytes per output pixel (R, G, B, A).
const CHANNELS: usize = 4;

// =============================================================================
// Output Image
// =============================================================================

/// A width × height RGBA image, row-major, 4 bytes per pixel. Fully
/// overwritten on each render call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaBitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbaBitmap {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Flat pixel data, length width × height × 4, row-major RGBA.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The R, G, B, A bytes of the pixel at (x, y).
    ///
    /// # Panics
    /// Panics when (x, y) lies outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

// =============================================================================
// Rasterization
// =============================================================================

/// Round a channel to the nearest integer and clamp it into [0, 255].
/// The single place where out-of-range channel math gets clamped.
#[inline]
fn write_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Write one color into the output slice at `i`. Alpha defaults to fully
/// opaque when the color carries none.
#[inline]
fn write_pixel(out: &mut [u8], i: usize, c: Color) {
    out[i] = write_channel(c.r);
    out[i + 1] = write_channel(c.g);
    out[i + 2] = write_channel(c.b);
    out[i + 3] = match c.a {
        None => 255,
        Some(a) => write_channel(a),
    };
}

/// Render one row of `width` pixels starting at source offset `src`.
/// Pixels whose remaining source bytes fall short of the renderer's
/// `skip_bytes` become opaque black instead of reading out of bounds.
fn render_row(out: &mut [u8], binary: &[u8], settings: &VisualizationSettings, mut src: usize) {
    let renderer = settings.active_renderer();
    let skip = renderer.skip_bytes();
    let step = settings.step;

    for i in (0..out.len()).step_by(CHANNELS) {
        let c = if src.checked_add(skip).is_some_and(|end| end <= binary.len()) {
            renderer.render(binary, src)
        } else {
            Color::rgb(0.0, 0.0, 0.0)
        };
        write_pixel(out, i, c);
        src = src.saturating_add(step);
    }
}

/// Rasterize `binary` into a width × height RGBA bitmap using the active
/// renderer. Returns `None` when the configured width or the requested
/// height is zero. A single synchronous pass, no partial results.
pub fn render_bitmap(
    binary: &[u8],
    settings: &VisualizationSettings,
    height: u32,
) -> Option<RgbaBitmap> {
    let width = settings.width;
    if width == 0 || height == 0 {
        return None;
    }

    log::debug!(
        "rendering {width}x{height} bitmap: {} bytes, {}, offset {}, step {}",
        binary.len(),
        settings.active_renderer().name(),
        settings.offset,
        settings.step,
    );

    let mut img = RgbaBitmap::new(width, height);
    let row_stride = width as usize * CHANNELS;
    let src_per_row = width as usize * settings.step;

    for (row, out) in img.data.chunks_mut(row_stride).enumerate() {
        let src = settings.offset + row * src_per_row;
        render_row(out, binary, settings, src);
    }

    Some(img)
}

/// Same output as `render_bitmap`, rows computed in parallel. Sound because
/// renderers only read their settings during a render pass.
pub fn render_bitmap_parallel(
    binary: &[u8],
    settings: &VisualizationSettings,
    height: u32,
) -> Option<RgbaBitmap> {
    let width = settings.width;
    if width == 0 || height == 0 {
        return None;
    }

    log::debug!(
        "rendering {width}x{height} bitmap (parallel): {} bytes, {}, offset {}, step {}",
        binary.len(),
        settings.active_renderer().name(),
        settings.offset,
        settings.step,
    );

    let mut img = RgbaBitmap::new(width, height);
    let row_stride = width as usize * CHANNELS;
    let src_per_row = width as usize * settings.step;

    img.data
        .par_chunks_mut(row_stride)
        .enumerate()
        .for_each(|(row, out)| {
            let src = settings.offset + row * src_per_row;
            render_row(out, binary, settings, src);
        });

    Some(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RendererKind;
    use crate::settings::SettingValue;

    fn settings(width: u32, kind: RendererKind) -> VisualizationSettings {
        let mut s = VisualizationSettings::default();
        s.width = width;
        s.set_active(kind);
        s
    }

    #[test]
    fn test_zero_dimensions_yield_none() {
        let s = settings(0, RendererKind::Grayscale);
        assert!(render_bitmap(&[1, 2, 3], &s, 4).is_none());

        let s = settings(4, RendererKind::Grayscale);
        assert!(render_bitmap(&[1, 2, 3], &s, 0).is_none());
    }

    #[test]
    fn test_empty_buffer_renders_black() {
        let s = settings(4, RendererKind::Grayscale);
        let img = render_bitmap(&[], &s, 1).unwrap();
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 1);
        for x in 0..4 {
            assert_eq!(img.pixel(x, 0), [0, 0, 0, 255]);
        }
    }

    #[test]
    fn test_grayscale_row_major() {
        let s = settings(2, RendererKind::Grayscale);
        let img = render_bitmap(&[10, 20, 30, 40], &s, 2).unwrap();
        assert_eq!(img.pixel(0, 0), [10, 10, 10, 255]);
        assert_eq!(img.pixel(1, 0), [20, 20, 20, 255]);
        assert_eq!(img.pixel(0, 1), [30, 30, 30, 255]);
        assert_eq!(img.pixel(1, 1), [40, 40, 40, 255]);
    }

    #[test]
    fn test_tail_pixels_fall_back_to_black() {
        // 3 source bytes feed 3 pixels; the fourth has nothing left
        let s = settings(4, RendererKind::Grayscale);
        let img = render_bitmap(&[9, 9, 9], &s, 1).unwrap();
        assert_eq!(img.pixel(2, 0), [9, 9, 9, 255]);
        assert_eq!(img.pixel(3, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_skip_bytes_bound_differs_from_step() {
        // RGB consumes 3 bytes per pixel but the step stays 1, so reads
        // overlap: pixel 0 sees bytes 0..3, pixel 1 sees 1..4.
        let s = settings(2, RendererKind::Rgb);
        let img = render_bitmap(&[1, 2, 3, 4], &s, 1).unwrap();
        assert_eq!(img.pixel(0, 0), [1, 2, 3, 255]);
        assert_eq!(img.pixel(1, 0), [2, 3, 4, 255]);
    }

    #[test]
    fn test_rgb_needs_three_bytes() {
        // Only 2 bytes remain at the last pixel, below the RGB skip of 3
        let s = settings(2, RendererKind::Rgb);
        let img = render_bitmap(&[1, 2, 3, 4], &s, 2).unwrap();
        assert_eq!(img.pixel(1, 0), [2, 3, 4, 255]);
        assert_eq!(img.pixel(0, 1), [0, 0, 0, 255]);
        assert_eq!(img.pixel(1, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn test_offset_and_step() {
        let mut s = settings(2, RendererKind::Grayscale);
        s.offset = 1;
        s.step = 2;
        let img = render_bitmap(&[0, 11, 0, 22, 0, 33, 0, 44], &s, 2).unwrap();
        assert_eq!(img.pixel(0, 0), [11, 11, 11, 255]);
        assert_eq!(img.pixel(1, 0), [22, 22, 22, 255]);
        assert_eq!(img.pixel(0, 1), [33, 33, 33, 255]);
        assert_eq!(img.pixel(1, 1), [44, 44, 44, 255]);
    }

    #[test]
    fn test_rgba_alpha_written_rounded() {
        let mut s = settings(1, RendererKind::Rgba);
        s.active_renderer_mut()
            .set_setting("Byte order", SettingValue::Text("RGBA".into()))
            .unwrap();
        s.step = 4;
        let img = render_bitmap(&[10, 20, 30, 40], &s, 1).unwrap();
        assert_eq!(img.pixel(0, 0), [10, 20, 30, 40]);
    }

    #[test]
    fn test_out_of_range_channels_clamped_at_write() {
        // Force an out-of-range channel through a configured color
        let mut s = settings(1, RendererKind::Extremes);
        s.active_renderer_mut()
            .set_setting(
                "0x00 color",
                SettingValue::Color(Color::rgb(300.0, -20.0, 128.0)),
            )
            .unwrap();
        let img = render_bitmap(&[0], &s, 1).unwrap();
        assert_eq!(img.pixel(0, 0), [255, 0, 128, 255]);
    }

    #[test]
    fn test_heatmap_default_render() {
        let mut s = settings(2, RendererKind::Heatmap);
        s.step = 1;
        let img = render_bitmap(&[0, 255], &s, 1).unwrap();
        // Byte 0 is Color 1, byte 255 is Color 5
        assert_eq!(img.pixel(0, 0), [0, 0, 64, 255]);
        assert_eq!(img.pixel(1, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let binary: Vec<u8> = (0..4096).map(|i| (i * 31 % 256) as u8).collect();
        for kind in [
            RendererKind::Rgb,
            RendererKind::Rgba,
            RendererKind::Grayscale,
            RendererKind::ByteClass,
            RendererKind::Extremes,
            RendererKind::Heatmap,
        ] {
            let mut s = settings(32, kind);
            s.step = 3;
            let seq = render_bitmap(&binary, &s, 32).unwrap();
            let par = render_bitmap_parallel(&binary, &s, 32).unwrap();
            assert_eq!(seq, par, "mismatch for {kind:?}");
        }
    }

    #[test]
    fn test_output_length() {
        let s = settings(7, RendererKind::Heatmap);
        let img = render_bitmap(&[1, 2, 3], &s, 5).unwrap();
        assert_eq!(img.data().len(), 7 * 5 * 4);
    }
}
