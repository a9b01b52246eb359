use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage, imageops::FilterType};

use crate::data_structures::texture::Texture;

/// Pixel layout the renderer accepts from decoded images.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn channels(self) -> u8 {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("could not load image {path:?}: {source}")]
    FileNotFoundOrDecodeError {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("image {path:?} has {channels} channels, only RGB and RGBA are supported")]
    UnsupportedChannelFormat { path: PathBuf, channels: u8 },
}

impl TextureError {
    fn load(path: &Path, source: impl Into<BoxError>) -> Self {
        TextureError::FileNotFoundOrDecodeError {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

pub fn pixel_format(path: &Path, channels: u8) -> Result<PixelFormat, TextureError> {
    match channels {
        3 => Ok(PixelFormat::Rgb),
        4 => Ok(PixelFormat::Rgba),
        channels => Err(TextureError::UnsupportedChannelFormat {
            path: path.to_path_buf(),
            channels,
        }),
    }
}

/// Swap rows top-to-bottom in place. Applying it twice restores the buffer.
pub fn flip_vertically(pixels: &mut [u8], width: u32, height: u32, channels: u8) {
    let row_len = width as usize * channels as usize;
    let height = height as usize;
    debug_assert!(pixels.len() >= row_len * height);
    for j in 0..height / 2 {
        let (upper, lower) = pixels.split_at_mut((height - 1 - j) * row_len);
        upper[j * row_len..(j + 1) * row_len].swap_with_slice(&mut lower[..row_len]);
    }
}

/// Number of levels in a full mip chain down to 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Build every mip level, level 0 first. Each level halves the previous one
/// (rounding down, never below 1).
pub fn build_mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let levels = mip_level_count(base.width(), base.height());
    let mut chain = Vec::with_capacity(levels as usize);
    chain.push(base);
    for _ in 1..levels {
        let prev = &chain[chain.len() - 1];
        let width = (prev.width() / 2).max(1);
        let height = (prev.height() / 2).max(1);
        let next = image::imageops::resize(prev, width, height, FilterType::Triangle);
        chain.push(next);
    }
    chain
}

/// CPU-side texture data, flipped for bottom-left UV origin and expanded to
/// RGBA8 with its full mip chain.
#[derive(Debug)]
pub struct TextureData {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub mips: Vec<RgbaImage>,
}

impl TextureData {
    pub fn from_bytes(path: &Path, bytes: &[u8]) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes).map_err(|e| TextureError::load(path, e))?;
        Self::from_image(path, img)
    }

    pub fn from_image(path: &Path, img: DynamicImage) -> Result<Self, TextureError> {
        let format = pixel_format(path, img.color().channel_count())?;
        let (width, height) = (img.width(), img.height());

        let base = match format {
            PixelFormat::Rgb => {
                let mut rgb = img.into_rgb8();
                flip_vertically(&mut rgb, width, height, 3);
                DynamicImage::ImageRgb8(rgb).into_rgba8()
            }
            PixelFormat::Rgba => {
                let mut rgba = img.into_rgba8();
                flip_vertically(&mut rgba, width, height, 4);
                rgba
            }
        };

        Ok(Self {
            label: path.display().to_string(),
            width,
            height,
            format,
            mips: build_mip_chain(base),
        })
    }

    pub fn mip_level_count(&self) -> u32 {
        self.mips.len() as u32
    }
}

/// Read and decode `path` into [`TextureData`] without touching the GPU.
pub async fn load_texture_data(path: &Path) -> Result<TextureData, TextureError> {
    let bytes = super::load_binary(path)
        .await
        .map_err(|e| TextureError::load(path, e))?;
    TextureData::from_bytes(path, &bytes)
}

/// Load an image file and upload it with a generated mip chain.
///
/// The decoded pixels are dropped once uploaded; nothing is created on the
/// GPU when decoding or channel validation fails.
pub async fn load_texture(
    path: &Path,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> Result<Texture, TextureError> {
    let data = load_texture_data(path).await?;
    let texture = Texture::from_data(device, queue, &data);
    log::info!(
        "Loaded texture {} ({}x{}, {:?}, {} mip levels)",
        data.label,
        data.width,
        data.height,
        data.format,
        data.mip_level_count()
    );
    Ok(texture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, LumaA, Rgb, RgbImage, Rgba};

    #[test]
    fn flip_twice_is_identity() {
        for (width, height, channels) in [(3, 4, 3), (5, 5, 4), (1, 1, 4), (7, 2, 3)] {
            let len = (width * height * channels as u32) as usize;
            let original: Vec<u8> = (0..len).map(|i| (i * 31 % 251) as u8).collect();
            let mut pixels = original.clone();
            flip_vertically(&mut pixels, width, height, channels);
            if height > 1 {
                assert_ne!(pixels, original);
            }
            flip_vertically(&mut pixels, width, height, channels);
            assert_eq!(pixels, original);
        }
    }

    #[test]
    fn flip_swaps_rows() {
        let mut pixels = vec![1, 1, 1, 2, 2, 2, 3, 3, 3];
        flip_vertically(&mut pixels, 1, 3, 3);
        assert_eq!(pixels, vec![3, 3, 3, 2, 2, 2, 1, 1, 1]);
    }

    #[test]
    fn only_rgb_and_rgba_are_accepted() {
        let path = Path::new("t.png");
        assert_eq!(pixel_format(path, 3).unwrap(), PixelFormat::Rgb);
        assert_eq!(pixel_format(path, 4).unwrap(), PixelFormat::Rgba);
        for channels in [0, 1, 2, 5, 8] {
            assert!(matches!(
                pixel_format(path, channels),
                Err(TextureError::UnsupportedChannelFormat { channels: c, .. }) if c == channels
            ));
        }
    }

    #[test]
    fn mip_counts() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(300, 20), 9);
        assert_eq!(mip_level_count(0, 0), 1);
    }

    #[test]
    fn mip_chain_ends_at_one_pixel() {
        let chain = build_mip_chain(RgbaImage::new(8, 3));
        let sizes: Vec<_> = chain.iter().map(|m| m.dimensions()).collect();
        assert_eq!(sizes, vec![(8, 3), (4, 1), (2, 1), (1, 1)]);
    }

    #[test]
    fn rgb_image_is_flipped_and_expanded() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));
        let data = TextureData::from_image(Path::new("rgb.png"), DynamicImage::ImageRgb8(img))
            .expect("rgb is supported");
        assert_eq!(data.format, PixelFormat::Rgb);
        assert_eq!(data.mip_level_count(), 2);
        // The bottom row on disk is now the first row.
        assert_eq!(*data.mips[0].get_pixel(0, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(*data.mips[0].get_pixel(0, 1), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn rgba_image_keeps_alpha() {
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, Rgba([1, 2, 3, 4]));
        img.put_pixel(0, 1, Rgba([5, 6, 7, 8]));
        let data = TextureData::from_image(Path::new("rgba.png"), DynamicImage::ImageRgba8(img))
            .expect("rgba is supported");
        assert_eq!(data.format, PixelFormat::Rgba);
        assert_eq!(*data.mips[0].get_pixel(0, 0), Rgba([5, 6, 7, 8]));
    }

    #[test]
    fn grey_images_are_rejected() {
        let luma = DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 2, Luma([9])));
        assert!(matches!(
            TextureData::from_image(Path::new("grey.png"), luma),
            Err(TextureError::UnsupportedChannelFormat { channels: 1, .. })
        ));
        let luma_alpha = DynamicImage::ImageLumaA8(image::ImageBuffer::from_pixel(
            2,
            2,
            LumaA([9, 9]),
        ));
        assert!(matches!(
            TextureData::from_image(Path::new("grey.png"), luma_alpha),
            Err(TextureError::UnsupportedChannelFormat { channels: 2, .. })
        ));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let result = TextureData::from_bytes(Path::new("noise.png"), b"definitely not a png");
        assert!(matches!(
            result,
            Err(TextureError::FileNotFoundOrDecodeError { .. })
        ));
    }
}
