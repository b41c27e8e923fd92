// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Decoding and preprocessing of uploads in every accepted format

use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgba, RgbaImage};
use philologica_ocr::vision::{
    check_extension, decode_image_bytes, preprocess, ColorMode, ImageError,
};
use std::io::Cursor;

fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

fn parchment() -> RgbaImage {
    RgbaImage::from_fn(64, 48, |x, y| {
        let ink = (y % 12 < 3) && x > 4;
        if ink {
            Rgba([60, 40, 30, 255])
        } else {
            Rgba([222, 205, 170, 200])
        }
    })
}

#[test]
fn test_every_accepted_format_becomes_single_channel() {
    let rgb = DynamicImage::ImageRgba8(parchment()).to_rgb8();
    let rgb = DynamicImage::ImageRgb8(rgb);

    for format in [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Bmp, ImageFormat::Tiff] {
        let decoded = decode_image_bytes(&encode(&rgb, format)).unwrap();
        let page = preprocess(&decoded);
        assert_eq!(page.mode(), ColorMode::Luma, "{:?}", format);
        assert_eq!((page.width(), page.height()), (64, 48), "{:?}", format);
    }
}

#[test]
fn test_alpha_and_sixteen_bit_inputs() {
    let rgba = decode_image_bytes(&encode(&DynamicImage::ImageRgba8(parchment()), ImageFormat::Png)).unwrap();
    assert_eq!(rgba.mode(), ColorMode::Rgba);
    assert_eq!(preprocess(&rgba).source_mode(), ColorMode::Rgba);

    let deep: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_fn(16, 16, |x, _| Luma([(x as u16) * 4000]));
    let deep = decode_image_bytes(&encode(&DynamicImage::ImageLuma16(deep), ImageFormat::Png)).unwrap();
    assert_eq!(deep.mode(), ColorMode::Luma16);
    assert_eq!(preprocess(&deep).mode(), ColorMode::Luma);
}

#[test]
fn test_identical_bytes_give_identical_pixels() {
    let bytes = encode(&DynamicImage::ImageRgba8(parchment()), ImageFormat::Png);
    let first = preprocess(&decode_image_bytes(&bytes).unwrap());
    let second = preprocess(&decode_image_bytes(&bytes).unwrap());
    assert_eq!(first.as_gray().as_raw(), second.as_gray().as_raw());
}

#[test]
fn test_one_pixel_page() {
    let bytes = encode(
        &DynamicImage::ImageRgb8(image::RgbImage::from_pixel(1, 1, image::Rgb([10, 200, 30]))),
        ImageFormat::Png,
    );
    let page = preprocess(&decode_image_bytes(&bytes).unwrap());
    assert_eq!((page.width(), page.height()), (1, 1));
}

#[test]
fn test_rejections() {
    assert!(matches!(
        check_extension("codex.gif"),
        Err(ImageError::UnsupportedExtension { .. })
    ));
    assert_eq!(check_extension("Codex.TIF").unwrap(), ".tif");
    assert!(matches!(decode_image_bytes(&[]), Err(ImageError::EmptyData)));
    assert!(matches!(
        decode_image_bytes(b"GIF89a...."),
        Err(ImageError::UnsupportedFormat)
    ));
}
