use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::{DynamicImage, GenericImageView, GrayImage, ImageBuffer, ImageFormat, Luma};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StitchError};
use crate::field::Field2;

/// Which colour channels of an RGB tile feed the correlation. Grayscale
/// images ignore the selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelSelection {
    Red,
    Green,
    Blue,
    RedGreen,
    RedBlue,
    GreenBlue,
    #[default]
    Average,
}

impl ChannelSelection {
    pub const ALL: [ChannelSelection; 7] = [
        ChannelSelection::Red,
        ChannelSelection::Green,
        ChannelSelection::Blue,
        ChannelSelection::RedGreen,
        ChannelSelection::RedBlue,
        ChannelSelection::GreenBlue,
        ChannelSelection::Average,
    ];

    fn mask(self) -> [bool; 3] {
        match self {
            ChannelSelection::Red => [true, false, false],
            ChannelSelection::Green => [false, true, false],
            ChannelSelection::Blue => [false, false, true],
            ChannelSelection::RedGreen => [true, true, false],
            ChannelSelection::RedBlue => [true, false, true],
            ChannelSelection::GreenBlue => [false, true, true],
            ChannelSelection::Average => [true, true, true],
        }
    }

    /// Mean of the selected channels of one RGB sample.
    pub fn combine(self, rgb: [f32; 3]) -> f32 {
        let mask = self.mask();
        let (sum, count) = rgb
            .iter()
            .zip(mask.iter())
            .filter(|(_, on)| **on)
            .fold((0.0f32, 0u32), |(s, c), (&v, _)| (s + v, c + 1));
        sum / count as f32
    }

    fn name(self) -> &'static str {
        match self {
            ChannelSelection::Red => "red",
            ChannelSelection::Green => "green",
            ChannelSelection::Blue => "blue",
            ChannelSelection::RedGreen => "red-green",
            ChannelSelection::RedBlue => "red-blue",
            ChannelSelection::GreenBlue => "green-blue",
            ChannelSelection::Average => "average",
        }
    }
}

impl fmt::Display for ChannelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChannelSelection {
    type Err = StitchError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| {
                StitchError::Config(format!(
                    "unknown channel '{}', expected one of: {}",
                    s,
                    Self::ALL.map(|c| c.name()).join(", ")
                ))
            })
    }
}

/// Load an image file as a 2-D field of raw intensities (0..255 for 8-bit
/// sources, 0..65535 for 16-bit ones).
pub fn load_image(path: &Path, channel: ChannelSelection) -> Result<Field2> {
    let img = image::open(path)?;
    field_from_image(&img, channel)
}

pub fn field_from_image(img: &DynamicImage, channel: ChannelSelection) -> Result<Field2> {
    let (w, h) = img.dimensions();
    let color = img.color();
    let deep = color.bits_per_pixel() / color.channel_count() as u16 > 8;

    let data: Vec<f32> = match (color.has_color(), deep) {
        (false, false) => img.to_luma8().into_raw().into_iter().map(f32::from).collect(),
        (false, true) => img.to_luma16().into_raw().into_iter().map(f32::from).collect(),
        (true, false) => img
            .to_rgb8()
            .pixels()
            .map(|p| channel.combine(p.0.map(f32::from)))
            .collect(),
        (true, true) => img
            .to_rgb16()
            .pixels()
            .map(|p| channel.combine(p.0.map(f32::from)))
            .collect(),
    };

    Field2::from_vec([w as usize, h as usize], data)
}

/// Samples stretched linearly so the field's minimum maps to 0 and its
/// maximum to 1. A constant field maps to all zeros.
pub fn normalized(field: &Field2) -> Vec<f32> {
    let Some((lo, hi)) = field.min_max() else {
        return Vec::new();
    };
    let range = hi - lo;
    if range <= 0.0 {
        return vec![0.0; field.len()];
    }
    field.as_slice().iter().map(|&v| (v - lo) / range).collect()
}

/// Save a field as 16-bit grayscale TIFF, stretched to the full range.
pub fn save_tiff(field: &Field2, path: &Path) -> Result<()> {
    let pixels: Vec<u16> = normalized(field)
        .into_iter()
        .map(|v| (v.clamp(0.0, 1.0) * 65535.0) as u16)
        .collect();
    let img = ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(
        field.width() as u32,
        field.height() as u32,
        pixels,
    )
    .ok_or_else(|| buffer_mismatch(field))?;
    img.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save a field as 8-bit grayscale PNG, stretched to the full range.
pub fn save_png(field: &Field2, path: &Path) -> Result<()> {
    let pixels: Vec<u8> = normalized(field)
        .into_iter()
        .map(|v| (v.clamp(0.0, 1.0) * 255.0) as u8)
        .collect();
    let img = GrayImage::from_raw(field.width() as u32, field.height() as u32, pixels)
        .ok_or_else(|| buffer_mismatch(field))?;
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a field, choosing the format from the file extension (TIFF unless
/// the extension says PNG).
pub fn save_image(field: &Field2, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => save_png(field, path),
        _ => save_tiff(field, path),
    }
}

fn buffer_mismatch(field: &Field2) -> StitchError {
    StitchError::Dimension(format!(
        "pixel buffer does not match image dims {:?}",
        field.dims()
    ))
}
