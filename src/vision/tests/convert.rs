use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

use crate::vision::Vision;

#[test]
fn test_to_luma_keeps_gray_image() {
    let gray = GrayImage::from_fn(4, 3, |x, y| Luma([(x * 10 + y) as u8]));
    let luma = Vision::to_luma(&DynamicImage::ImageLuma8(gray.clone()));
    assert_eq!(luma, gray);
}

#[test]
fn test_to_luma_weights_rgb() {
    // 纯红、纯绿、纯蓝分别只保留各自的亮度权重
    let mut rgb = RgbImage::new(3, 1);
    rgb.put_pixel(0, 0, Rgb([255, 0, 0]));
    rgb.put_pixel(1, 0, Rgb([0, 255, 0]));
    rgb.put_pixel(2, 0, Rgb([0, 0, 255]));
    let luma = Vision::to_luma(&DynamicImage::ImageRgb8(rgb));

    assert_eq!(luma.dimensions(), (3, 1));
    assert_eq!(luma.get_pixel(0, 0)[0], 76);
    assert_eq!(luma.get_pixel(1, 0)[0], 150);
    assert_eq!(luma.get_pixel(2, 0)[0], 29);
}

#[test]
fn test_resize_image() {
    let gray = GrayImage::from_pixel(20, 10, Luma([100]));
    let resized = Vision::resize_image(&gray, 8, 8);
    assert_eq!(resized.dimensions(), (8, 8));
    // 均匀图像缩放后仍然均匀
    assert!(resized.pixels().all(|p| p[0] == 100));
}

#[test]
fn test_load_image_missing_file() {
    assert!(Vision::load_image("./does/not/exist.png").is_err());
}
