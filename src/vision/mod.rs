/*
 * @Description  : 本模块提供数据增强流水线用到的图像原语。
 *                 在本模块中，不严谨地说：
 *                 1. 所谓的image/图像是指经`image`库解码后的图像；
 *                 2. “灰度”（图）等同于英文中luma、luminance、grey、gray的概念。
 *                 随机参数的采样不在这里进行，这里的函数都是确定性的。
 */

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageResult, Luma};
use std::path::Path;

mod augment;

#[cfg(test)]
mod tests;

pub struct Vision;

impl Vision {
    /// 从本地打开并解码图像
    pub fn load_image<P: AsRef<Path>>(path: P) -> ImageResult<DynamicImage> {
        image::open(path)
    }

    /// 返回图像的灰度图。
    /// 单通道图像直接复制；多通道图像按`0.299R + 0.587G + 0.114B`压缩到单通道，透明通道被忽略。
    pub fn to_luma(image: &DynamicImage) -> GrayImage {
        match image {
            DynamicImage::ImageLuma8(luma) => luma.clone(),
            DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA16(_) => {
                image.to_luma8()
            }
            _ => {
                let rgb = image.to_rgb8();
                GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                    let p = rgb.get_pixel(x, y);
                    let luma = 0.299 * p[0] as f32 + 0.587 * p[1] as f32 + 0.114 * p[2] as f32;
                    Luma([luma.round().clamp(0.0, 255.0) as u8])
                })
            }
        }
    }

    /// 将灰度图缩放到`width`×`height`（双线性插值，不保持宽高比）
    pub fn resize_image(image: &GrayImage, width: u32, height: u32) -> GrayImage {
        if image.dimensions() == (width, height) {
            return image.clone();
        }
        image::imageops::resize(image, width, height, FilterType::Triangle)
    }
}
