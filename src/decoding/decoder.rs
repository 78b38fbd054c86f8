use image::{Rgb, RgbImage};
use thiserror::Error;

use crate::core::trace::{IntensityTrace, TraceError};

/// Errors that can occur while turning an image into intensity traces
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Image data is empty")]
    Empty,

    #[error("Unable to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image has no pixels to sample ({width}x{height})")]
    NoSamples { width: u32, height: u32 },

    #[error("Lane row {row} is outside the image (height {height})")]
    LaneOutOfBounds { row: u32, height: u32 },

    #[error("Sampling stride must be at least 1")]
    InvalidStride,

    #[error("Extracted trace is invalid: {0}")]
    Trace(#[from] TraceError),
}

/// Which pixel row of the image is read as the sequencing lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaneRow {
    /// The row at `height / 2`
    #[default]
    Middle,
    /// A fixed row index from the top of the image
    Index(u32),
}

impl LaneRow {
    fn resolve(self, height: u32) -> Result<u32, DecodeError> {
        let row = match self {
            LaneRow::Middle => height / 2,
            LaneRow::Index(row) => row,
        };
        if row >= height {
            return Err(DecodeError::LaneOutOfBounds { row, height });
        }
        Ok(row)
    }
}

impl std::str::FromStr for LaneRow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("middle") {
            return Ok(LaneRow::Middle);
        }
        s.parse::<u32>()
            .map(LaneRow::Index)
            .map_err(|_| format!("expected 'middle' or a row index, got '{s}'"))
    }
}

/// Default number of pixel columns between consecutive samples
pub const DEFAULT_STRIDE: usize = 1;

/// Configuration for [`ChromatogramDecoder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    pub lane_row: LaneRow,
    /// Sample every `stride`-th column, starting at column 0
    pub stride: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            lane_row: LaneRow::Middle,
            stride: DEFAULT_STRIDE,
        }
    }
}

/// Turns chromatogram images into four-channel intensity traces
#[derive(Debug, Clone, Default)]
pub struct ChromatogramDecoder {
    config: DecoderConfig,
}

impl ChromatogramDecoder {
    #[must_use]
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode raw image bytes (PNG, JPEG, BMP or GIF) into a trace
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::Empty` for empty input, `DecodeError::Image` if the
    /// bytes are not a readable raster, and the errors of
    /// [`ChromatogramDecoder::decode_rgb`] otherwise.
    pub fn decode(&self, image_bytes: &[u8]) -> Result<IntensityTrace, DecodeError> {
        let lane = self.read_lane(image_bytes)?;
        lane_to_trace(&lane)
    }

    /// Decode raw image bytes and return the sampled lane pixels unscaled
    ///
    /// # Errors
    ///
    /// Same as [`ChromatogramDecoder::decode`].
    pub fn read_lane(&self, image_bytes: &[u8]) -> Result<Vec<Rgb<u8>>, DecodeError> {
        if image_bytes.is_empty() {
            return Err(DecodeError::Empty);
        }

        let image = image::load_from_memory(image_bytes)?.to_rgb8();
        self.lane_pixels(&image)
    }

    /// Extract the lane of an already decoded RGB image.
    ///
    /// Red is read as A, green as T, blue as C and the mean of red and green
    /// ("yellow") as G. Each channel is scaled by its maximum over the sampled
    /// lane, so every value lies in `[0, 1]`; a channel with no signal stays zero.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::InvalidStride` for a zero stride,
    /// `DecodeError::NoSamples` for an image without pixels and
    /// `DecodeError::LaneOutOfBounds` if the configured row does not exist.
    pub fn decode_rgb(&self, image: &RgbImage) -> Result<IntensityTrace, DecodeError> {
        let lane = self.lane_pixels(image)?;
        lane_to_trace(&lane)
    }

    /// The pixels of the configured row at every `stride`-th column
    fn lane_pixels(&self, image: &RgbImage) -> Result<Vec<Rgb<u8>>, DecodeError> {
        if self.config.stride == 0 {
            return Err(DecodeError::InvalidStride);
        }

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(DecodeError::NoSamples { width, height });
        }
        let row = self.config.lane_row.resolve(height)?;

        let lane: Vec<_> = (0..width)
            .step_by(self.config.stride)
            .map(|x| *image.get_pixel(x, row))
            .collect();

        tracing::debug!(
            width,
            height,
            row,
            stride = self.config.stride,
            samples = lane.len(),
            "Extracted lane from chromatogram image"
        );

        Ok(lane)
    }
}

/// Scale lane pixels into the four normalized dye channels
///
/// # Errors
///
/// Returns `DecodeError::NoSamples` for an empty lane.
pub fn lane_to_trace(lane: &[Rgb<u8>]) -> Result<IntensityTrace, DecodeError> {
    if lane.is_empty() {
        return Err(DecodeError::NoSamples { width: 0, height: 0 });
    }

    let red = normalize(lane.iter().map(|p| f64::from(p[0])).collect());
    let green = normalize(lane.iter().map(|p| f64::from(p[1])).collect());
    let blue = normalize(lane.iter().map(|p| f64::from(p[2])).collect());
    let yellow = normalize(
        red.iter()
            .zip(&green)
            .map(|(r, g)| (r + g) / 2.0)
            .collect(),
    );

    Ok(IntensityTrace::new(red, blue, yellow, green)?)
}

/// Scale values by their maximum; all-zero input is returned unchanged
fn normalize(mut values: Vec<f64>) -> Vec<f64> {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if max > 0.0 {
        for v in &mut values {
            *v /= max;
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Nucleotide;
    use image::ImageFormat;
    use std::io::Cursor;

    fn lane_image(colors: &[[u8; 3]], height: u32) -> RgbImage {
        #[allow(clippy::cast_possible_truncation)]
        let width = colors.len() as u32;
        let mut image = RgbImage::new(width, height);
        let row = height / 2;
        for (x, color) in colors.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            image.put_pixel(x as u32, row, Rgb(*color));
        }
        image
    }

    fn encode_png(image: &RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_empty_bytes() {
        let decoder = ChromatogramDecoder::default();
        assert!(matches!(decoder.decode(&[]), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_decode_garbage_bytes() {
        let decoder = ChromatogramDecoder::default();
        let result = decoder.decode(b"definitely not an image");
        assert!(matches!(result, Err(DecodeError::Image(_))));
    }

    #[test]
    fn test_decode_png_maps_channels() {
        let image = lane_image(&[[255, 0, 0], [0, 255, 0], [0, 0, 255], [0, 0, 0]], 3);
        let trace = ChromatogramDecoder::default()
            .decode(&encode_png(&image))
            .unwrap();

        assert_eq!(trace.len(), 4);
        assert_eq!(trace.channel(Nucleotide::A), &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(trace.channel(Nucleotide::T), &[0.0, 1.0, 0.0, 0.0]);
        assert_eq!(trace.channel(Nucleotide::C), &[0.0, 0.0, 1.0, 0.0]);
        // Yellow is the mean of red and green, rescaled to its own maximum
        assert_eq!(trace.channel(Nucleotide::G), &[1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_decode_uses_configured_stride() {
        let image = lane_image(&[[255, 0, 0]; 10], 1);
        let decoder = ChromatogramDecoder::new(DecoderConfig {
            stride: 3,
            ..DecoderConfig::default()
        });
        let trace = decoder.decode_rgb(&image).unwrap();
        // Columns 0, 3, 6, 9
        assert_eq!(trace.len(), 4);
    }

    #[test]
    fn test_decode_stride_wider_than_image_yields_one_sample() {
        let image = lane_image(&[[10, 20, 30]; 4], 1);
        let decoder = ChromatogramDecoder::new(DecoderConfig {
            stride: 100,
            ..DecoderConfig::default()
        });
        assert_eq!(decoder.decode_rgb(&image).unwrap().len(), 1);
    }

    #[test]
    fn test_decode_zero_stride() {
        let image = lane_image(&[[255, 0, 0]], 1);
        let decoder = ChromatogramDecoder::new(DecoderConfig {
            stride: 0,
            ..DecoderConfig::default()
        });
        assert!(matches!(
            decoder.decode_rgb(&image),
            Err(DecodeError::InvalidStride)
        ));
    }

    #[test]
    fn test_decode_lane_out_of_bounds() {
        let image = lane_image(&[[255, 0, 0]], 2);
        let decoder = ChromatogramDecoder::new(DecoderConfig {
            lane_row: LaneRow::Index(5),
            ..DecoderConfig::default()
        });
        assert!(matches!(
            decoder.decode_rgb(&image),
            Err(DecodeError::LaneOutOfBounds { row: 5, height: 2 })
        ));
    }

    #[test]
    fn test_decode_zero_sized_image() {
        let image = RgbImage::new(0, 0);
        assert!(matches!(
            ChromatogramDecoder::default().decode_rgb(&image),
            Err(DecodeError::NoSamples { .. })
        ));
    }

    #[test]
    fn test_decode_dark_image_stays_zero() {
        let image = lane_image(&[[0, 0, 0]; 5], 3);
        let trace = ChromatogramDecoder::default().decode_rgb(&image).unwrap();
        assert!(trace.samples().all(|s| s == [0.0; 4]));
    }

    #[test]
    fn test_read_lane_keeps_raw_pixels() {
        let image = lane_image(&[[200, 10, 0], [0, 0, 0], [5, 5, 90]], 3);
        let lane = ChromatogramDecoder::default()
            .read_lane(&encode_png(&image))
            .unwrap();
        assert_eq!(lane, vec![Rgb([200, 10, 0]), Rgb([0, 0, 0]), Rgb([5, 5, 90])]);
    }

    #[test]
    fn test_lane_to_trace_rejects_empty_lane() {
        assert!(matches!(lane_to_trace(&[]), Err(DecodeError::NoSamples { .. })));
    }

    #[test]
    fn test_lane_row_from_str() {
        assert_eq!("middle".parse::<LaneRow>(), Ok(LaneRow::Middle));
        assert_eq!("12".parse::<LaneRow>(), Ok(LaneRow::Index(12)));
        assert!("top".parse::<LaneRow>().is_err());
    }
}
