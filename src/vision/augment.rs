use super::Vision;
use image::{GrayImage, Luma};
use imageproc::geometric_transformations::{Interpolation, Projection, rotate_about_center, warp};

/// 旋转、仿射后露出的区域用黑色填充
const FILL: Luma<u8> = Luma([0]);

impl Vision {
    /// 绕图像中心旋转`degrees`度（逆时针为正），尺寸不变
    pub fn rotate(image: &GrayImage, degrees: f32) -> GrayImage {
        if degrees == 0.0 {
            return image.clone();
        }
        rotate_about_center(
            image,
            -degrees.to_radians(),
            Interpolation::Bilinear,
            FILL,
        )
    }

    /// 以图像中心为原点做仿射变换：先沿x方向剪切`shear_degrees`度，再平移`(tx, ty)`像素
    pub fn affine(image: &GrayImage, tx: f32, ty: f32, shear_degrees: f32) -> GrayImage {
        let (width, height) = image.dimensions();
        let cx = width as f32 * 0.5;
        let cy = height as f32 * 0.5;

        let shear_tan = shear_degrees.to_radians().tan();
        #[rustfmt::skip]
        let shear = Projection::from_matrix([
            1.0, -shear_tan, 0.0,
            0.0, 1.0,        0.0,
            0.0, 0.0,        1.0,
        ]);
        let Some(shear) = shear else {
            return image.clone();
        };

        let projection =
            Projection::translate(cx + tx, cy + ty) * shear * Projection::translate(-cx, -cy);
        warp(image, &projection, Interpolation::Bilinear, FILL)
    }

    /// 亮度调整：每个像素乘以`factor`后截断到`[0, 255]`
    pub fn adjust_brightness(image: &GrayImage, factor: f32) -> GrayImage {
        let mut out = image.clone();
        for p in out.pixels_mut() {
            p[0] = (p[0] as f32 * factor).round().clamp(0.0, 255.0) as u8;
        }
        out
    }

    /// 对比度调整：以整图均值为中心向外（`factor > 1`）或向内（`factor < 1`）拉伸
    pub fn adjust_contrast(image: &GrayImage, factor: f32) -> GrayImage {
        let total = image.width() as f32 * image.height() as f32;
        if total == 0.0 {
            return image.clone();
        }
        let mean = image.pixels().map(|p| p[0] as f32).sum::<f32>() / total;

        let mut out = image.clone();
        for p in out.pixels_mut() {
            let v = mean + factor * (p[0] as f32 - mean);
            p[0] = v.round().clamp(0.0, 255.0) as u8;
        }
        out
    }

    /// 把左上角为`(x, y)`、大小为`w`×`h`的矩形区域填充为`value`，越界部分被忽略
    pub fn erase(image: &mut GrayImage, x: u32, y: u32, w: u32, h: u32, value: u8) {
        let x_end = x.saturating_add(w).min(image.width());
        let y_end = y.saturating_add(h).min(image.height());
        for yy in y..y_end {
            for xx in x..x_end {
                image.put_pixel(xx, yy, Luma([value]));
            }
        }
    }
}
