use super::Tensor;
use image::{DynamicImage, GenericImageView, GrayImage};

impl Tensor {
    /// 把任意`DynamicImage`按原始像素值（0~255）转为张量，形状为`[H, W, C]`；
    /// 单通道图像会被压缩为`[H, W]`。
    pub fn from_image(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        let (h, w) = (height as usize, width as usize);
        let channels = image.color().channel_count() as usize;
        let data: Vec<f32> = match channels {
            1 => image.to_luma8().into_raw().into_iter().map(f32::from).collect(),
            2 => image.to_luma_alpha8().into_raw().into_iter().map(f32::from).collect(),
            3 => image.to_rgb8().into_raw().into_iter().map(f32::from).collect(),
            _ => image.to_rgba8().into_raw().into_iter().map(f32::from).collect(),
        };
        if channels == 1 {
            Self::from_vec(data, &[h, w])
        } else {
            Self::from_vec(data, &[h, w, channels.min(4)])
        }
    }

    /// 灰度图转为`[1, H, W]`的张量，像素值除以255，落在`[0, 1]`区间
    pub fn from_luma_scaled(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        let data = image
            .pixels()
            .map(|p| p[0] as f32 / 255.0)
            .collect::<Vec<_>>();
        Self::from_vec(data, &[1, height as usize, width as usize])
    }
}
