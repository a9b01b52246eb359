use std::path::{Path, PathBuf};

use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use plug_scene::resources::{
    load_binary,
    texture::{PixelFormat, TextureError, load_texture_data},
    texture_path,
};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join(format!("plug-scene-{}-{}", name, std::process::id()))
        .join("textures");
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Runtime::new().unwrap()
}

#[test]
fn rgba_png_is_flipped_and_mipmapped() {
    let dir = scratch_dir("rgba");
    let path = dir.join("two_rows.png");
    // Top row red, bottom row blue.
    let img = RgbaImage::from_fn(8, 2, |_, y| {
        if y == 0 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 128])
        }
    });
    img.save(&path).unwrap();

    let data = runtime().block_on(load_texture_data(&path)).unwrap();
    assert_eq!(data.format, PixelFormat::Rgba);
    assert_eq!((data.width, data.height), (8, 2));
    assert_eq!(data.mip_level_count(), 4);
    // Row 0 in memory is the image's bottom row.
    assert_eq!(*data.mips[0].get_pixel(3, 0), Rgba([0, 0, 255, 128]));
    assert_eq!(*data.mips[0].get_pixel(3, 1), Rgba([255, 0, 0, 255]));
    let last = data.mips.last().unwrap();
    assert_eq!(last.dimensions(), (1, 1));
}

#[test]
fn rgb_png_is_expanded_to_opaque_rgba() {
    let dir = scratch_dir("rgb");
    let path = dir.join("solid.png");
    RgbImage::from_pixel(4, 4, Rgb([10, 20, 30])).save(&path).unwrap();

    let data = runtime().block_on(load_texture_data(&path)).unwrap();
    assert_eq!(data.format, PixelFormat::Rgb);
    assert_eq!(data.format.channels(), 3);
    assert_eq!(data.mip_level_count(), 3);
    assert!(data.mips[0].pixels().all(|p| *p == Rgba([10, 20, 30, 255])));
}

#[test]
fn greyscale_png_is_rejected() {
    let dir = scratch_dir("grey");
    let path = dir.join("grey.png");
    GrayImage::from_pixel(2, 2, Luma([90])).save(&path).unwrap();

    let err = runtime().block_on(load_texture_data(&path)).unwrap_err();
    match err {
        TextureError::UnsupportedChannelFormat { path: p, channels } => {
            assert_eq!(p, path);
            assert_eq!(channels, 1);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn missing_file_is_reported_with_its_path() {
    let path = texture_path(Path::new("/definitely/not/here"), "metal.png");
    let err = runtime().block_on(load_texture_data(&path)).unwrap_err();
    assert!(matches!(
        &err,
        TextureError::FileNotFoundOrDecodeError { path: p, .. } if *p == path
    ));
    assert!(err.to_string().contains("metal.png"));
}

#[test]
fn garbage_bytes_fail_to_decode() {
    let dir = scratch_dir("garbage");
    let path = dir.join("broken.png");
    std::fs::write(&path, b"not an image at all").unwrap();

    let rt = runtime();
    assert_eq!(rt.block_on(load_binary(&path)).unwrap().len(), 19);
    let err = rt.block_on(load_texture_data(&path)).unwrap_err();
    assert!(matches!(err, TextureError::FileNotFoundOrDecodeError { .. }));
}

#[test]
fn shipped_textures_all_decode() {
    let resources = Path::new(env!("CARGO_MANIFEST_DIR")).join("resources");
    let rt = runtime();
    for file in plug_scene::scene::texture_files(&plug_scene::scene::reference_scene()) {
        let data = rt
            .block_on(load_texture_data(&texture_path(&resources, file)))
            .unwrap_or_else(|e| panic!("{file}: {e}"));
        assert!(data.mip_level_count() > 1, "{file} has no mip chain");
    }
}
