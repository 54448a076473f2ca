//! ASCII conversion pipeline: resize, alpha flattening, grayscale, and
//! character mapping.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::fmt;

/// Density ramp used for rendering (10 levels).
/// Characters ordered from darkest/densest to lightest/sparsest.
/// Works well on light terminals and plain-text output.
pub const RAMP: &[char] = &['@', '%', '#', '*', '+', '=', '-', ':', '.', ' '];

/// Default output width in characters.
pub const DEFAULT_WIDTH: u32 = 100;

/// Default character aspect correction.
/// Monospaced glyphs are roughly twice as tall as they are wide, so the
/// output needs fewer rows than a square pixel grid would suggest. Without
/// this factor the art appears vertically stretched.
pub const DEFAULT_ASPECT_CORRECTION: f32 = 0.55;

/// Rendering parameters merged from CLI, config file, and built-in defaults.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Output width in characters. A width of 0 falls back to
    /// [`DEFAULT_WIDTH`].
    pub width: u32,
    /// Character aspect correction factor.
    pub aspect_correction: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            aspect_correction: DEFAULT_ASPECT_CORRECTION,
        }
    }
}

/// Pixel layout of an [`ImageBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// 3 bytes per pixel: R, G, B.
    Rgb,
    /// 4 bytes per pixel: R, G, B, A.
    Rgba,
    /// 1 byte per pixel: intensity.
    Gray,
}

impl ColorMode {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            ColorMode::Rgb => 3,
            ColorMode::Rgba => 4,
            ColorMode::Gray => 1,
        }
    }
}

/// Decoded pixels with an explicit color layout.
///
/// Each pipeline stage converts between modes explicitly instead of relying
/// on implicit coercion, so the layout of `data` is always known: row-major,
/// `bytes_per_pixel` bytes per pixel, no padding.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    mode: ColorMode,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Create a buffer from raw pixel data.
    ///
    /// `data.len()` must equal `width * height * mode.bytes_per_pixel()`;
    /// trailing bytes beyond that length are ignored by the pipeline.
    pub fn new(width: u32, height: u32, mode: ColorMode, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            mode,
            data,
        }
    }

    /// Extract pixels from a decoded image.
    ///
    /// Images with an alpha channel are kept as RGBA so transparency can be
    /// flattened before grayscale conversion; everything else becomes RGB.
    pub fn from_decoded(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        if image.color().has_alpha() {
            Self::new(width, height, ColorMode::Rgba, image.to_rgba8().into_raw())
        } else {
            Self::new(width, height, ColorMode::Rgb, image.to_rgb8().into_raw())
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Composite the image onto an opaque white background.
    ///
    /// For each RGBA pixel: `out = alpha/255 * channel + (1 - alpha/255) * 255`,
    /// computed with round-to-nearest integer math. Fully transparent regions
    /// become white so they later render as blank characters rather than
    /// black. RGB and grayscale buffers have no alpha and pass through
    /// unchanged.
    pub fn flatten_onto_white(&self) -> ImageBuffer {
        match self.mode {
            ColorMode::Rgba => {
                let mut rgb = Vec::with_capacity((self.width * self.height) as usize * 3);
                for px in self.data.chunks_exact(4) {
                    let a = px[3] as u32;
                    for &c in &px[..3] {
                        rgb.push(composite_onto_white(c, a));
                    }
                }
                ImageBuffer::new(self.width, self.height, ColorMode::Rgb, rgb)
            }
            ColorMode::Rgb | ColorMode::Gray => self.clone(),
        }
    }

    /// Convert to single-channel intensity using the ITU-R BT.601 luma
    /// formula: `Y = 0.299*R + 0.587*G + 0.114*B`.
    ///
    /// Uses integer math with coefficients scaled by 1000. RGBA buffers are
    /// flattened onto white first so transparency never leaks into the
    /// intensities.
    pub fn to_grayscale(&self) -> GrayscaleBuffer {
        match self.mode {
            ColorMode::Rgba => self.flatten_onto_white().to_grayscale(),
            ColorMode::Gray => GrayscaleBuffer {
                width: self.width,
                height: self.height,
                data: self.data.clone(),
            },
            ColorMode::Rgb => {
                let mut gray = Vec::with_capacity((self.width * self.height) as usize);
                for rgb in self.data.chunks_exact(3) {
                    gray.push(luma(rgb[0], rgb[1], rgb[2]));
                }
                GrayscaleBuffer {
                    width: self.width,
                    height: self.height,
                    data: gray,
                }
            }
        }
    }
}

/// Composite a single channel value onto white given its alpha.
fn composite_onto_white(channel: u8, alpha: u32) -> u8 {
    // out = (c*a + 255*(255-a)) / 255, rounded to nearest
    ((channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8
}

/// BT.601 luma with coefficients scaled by 1000: 299 + 587 + 114 = 1000.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}

/// One intensity value (0-255) per output character cell.
///
/// Derived deterministically from an [`ImageBuffer`]; never mutated after
/// creation.
#[derive(Debug, Clone)]
pub struct GrayscaleBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl GrayscaleBuffer {
    /// Create a buffer from raw intensities, row-major, one byte per cell.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// The final output: one text line per image row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiArt {
    lines: Vec<String>,
}

impl AsciiArt {
    /// Map every intensity to a ramp glyph and assemble rows into lines.
    ///
    /// The mapping is a direct linear quantization: index
    /// `v * ramp_len / 256`, clamped to the last entry. No dithering, no
    /// gamma beyond what grayscale conversion already applied.
    pub fn from_grayscale(gray: &GrayscaleBuffer, ramp: &[char]) -> Self {
        let width = gray.width() as usize;
        let mut lines = Vec::with_capacity(gray.height() as usize);

        if width == 0 || ramp.is_empty() {
            return Self { lines };
        }

        for row in gray.data().chunks_exact(width) {
            let mut line = String::with_capacity(width);
            for &v in row {
                line.push(map_brightness(v, ramp));
            }
            lines.push(line);
        }

        Self { lines }
    }

    /// The text lines, top to bottom.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of character rows.
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Number of characters per row (0 for empty art).
    pub fn width(&self) -> usize {
        self.lines.first().map(|l| l.chars().count()).unwrap_or(0)
    }
}

impl fmt::Display for AsciiArt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

/// Select the ramp glyph for one intensity value.
///
/// Monotonic: darker intensities map to earlier (denser) ramp entries.
/// `ramp` must be non-empty.
pub fn map_brightness(v: u8, ramp: &[char]) -> char {
    let idx = (v as usize * ramp.len()) / 256;
    ramp[idx.min(ramp.len() - 1)]
}

/// Calculate the output height in rows for a target character width.
///
/// `round(width * img_height / img_width * aspect_correction)`, clamped to
/// at least one row so degenerate inputs still produce well-formed output.
pub fn output_height(img_width: u32, img_height: u32, width: u32, aspect_correction: f32) -> u32 {
    if img_width == 0 || img_height == 0 || width == 0 {
        return 1;
    }
    let height =
        (width as f32 * img_height as f32 / img_width as f32 * aspect_correction).round() as u32;
    height.max(1)
}

/// Convert a decoded image to ASCII art.
///
/// The pipeline is strictly linear: resize to the target character grid with
/// a bilinear filter (nearest-neighbor aliases badly at small widths),
/// flatten transparency onto white, convert to grayscale, and map each
/// intensity onto [`RAMP`]. Pure function of the image and options; running
/// it twice on the same input yields byte-identical output.
pub fn convert(image: &DynamicImage, options: &RenderOptions) -> AsciiArt {
    let width = if options.width == 0 {
        DEFAULT_WIDTH
    } else {
        options.width
    };

    let (img_width, img_height) = image.dimensions();
    let height = output_height(img_width, img_height, width, options.aspect_correction);

    let resized = image.resize_exact(width, height, FilterType::Triangle);
    let gray = ImageBuffer::from_decoded(&resized)
        .flatten_onto_white()
        .to_grayscale();

    log::debug!(
        "converted {}x{} image to {}x{} character grid",
        img_width,
        img_height,
        gray.width(),
        gray.height()
    );

    AsciiArt::from_grayscale(&gray, RAMP)
}
