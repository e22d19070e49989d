//! 数据变换
//!
//! 变换流水线由一串 [`TransformStep`] 描述符组成，描述符本身是纯数据（可比较、可打印），
//! 由 [`Compose`] 依次执行。样本在流水线中依次经历三种形态：
//! 解码后的原始图像 → 灰度图 → 张量。数据增强必须作用在灰度图阶段，归一化必须是最后一步。
//!
//! # 使用示例
//!
//! ```ignore
//! use scan_dataset::data::{AugmentationPipelineBuilder, Mode};
//!
//! let pipeline = AugmentationPipelineBuilder::new()
//!     .target_size((256, 256))
//!     .build("BRAIN", Mode::Train)?;
//! let tensor = pipeline.apply(image, &mut rand::thread_rng())?;
//! assert_eq!(tensor.shape(), &[1, 512, 512]);
//! ```

use std::collections::BTreeMap;

use enum_dispatch::enum_dispatch;
use image::{DynamicImage, GrayImage};
use rand::{Rng, RngCore};

use crate::data::error::{DataError, Result};
use crate::data::vocab::{Mode, Organ};
use crate::tensor::Tensor;
use crate::vision::Vision;

/// 下游模型要求的输入尺寸（宽, 高）
pub const REQUIRED_IMAGE_SIZE: (u32, u32) = (512, 512);
/// 单通道归一化的均值
pub const NORMALIZE_MEAN: f32 = 0.5;
/// 单通道归一化的标准差
pub const NORMALIZE_STD: f32 = 0.5;

/// 流水线中的样本
#[derive(Debug, Clone)]
pub enum Sample {
    Image(DynamicImage),
    Gray(GrayImage),
    Tensor(Tensor),
}

impl Sample {
    fn stage(&self) -> &'static str {
        match self {
            Sample::Image(_) => "image",
            Sample::Gray(_) => "gray",
            Sample::Tensor(_) => "tensor",
        }
    }

    /// 取出灰度图；原始图像会先转灰度，张量则说明步骤顺序有误
    fn into_gray(self, step: &'static str) -> Result<GrayImage> {
        match self {
            Sample::Image(image) => Ok(Vision::to_luma(&image)),
            Sample::Gray(gray) => Ok(gray),
            Sample::Tensor(_) => Err(DataError::TransformStage {
                step,
                stage: "tensor",
            }),
        }
    }

    /// 流水线结束后的张量。未经`ToTensor`的图像按原始像素值（0~255）转换
    pub fn into_tensor(self) -> Tensor {
        match self {
            Sample::Image(image) => Tensor::from_image(&image),
            Sample::Gray(gray) => Tensor::from_image(&DynamicImage::ImageLuma8(gray)),
            Sample::Tensor(tensor) => tensor,
        }
    }
}

/// 单个变换步骤
#[enum_dispatch]
pub trait Transform {
    fn apply(&self, sample: Sample, rng: &mut dyn RngCore) -> Result<Sample>;

    fn name(&self) -> &'static str;
}

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓确定性步骤↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
/// 转为单通道灰度图
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grayscale;

impl Transform for Grayscale {
    fn apply(&self, sample: Sample, _rng: &mut dyn RngCore) -> Result<Sample> {
        Ok(Sample::Gray(sample.into_gray(self.name())?))
    }

    fn name(&self) -> &'static str {
        "grayscale"
    }
}

/// 缩放到固定尺寸
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resize {
    pub width: u32,
    pub height: u32,
}

impl Transform for Resize {
    fn apply(&self, sample: Sample, _rng: &mut dyn RngCore) -> Result<Sample> {
        let gray = sample.into_gray(self.name())?;
        Ok(Sample::Gray(Vision::resize_image(&gray, self.width, self.height)))
    }

    fn name(&self) -> &'static str {
        "resize"
    }
}

/// 灰度图转为`[1, H, W]`张量，像素值缩放到`[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToTensor;

impl Transform for ToTensor {
    fn apply(&self, sample: Sample, _rng: &mut dyn RngCore) -> Result<Sample> {
        let gray = sample.into_gray(self.name())?;
        Ok(Sample::Tensor(Tensor::from_luma_scaled(&gray)))
    }

    fn name(&self) -> &'static str {
        "to_tensor"
    }
}

/// `(x - mean) / std`，只接受张量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub mean: f32,
    pub std: f32,
}

impl Transform for Normalize {
    fn apply(&self, sample: Sample, _rng: &mut dyn RngCore) -> Result<Sample> {
        match sample {
            Sample::Tensor(tensor) => {
                let data = tensor
                    .to_vec()
                    .into_iter()
                    .map(|v| (v - self.mean) / self.std)
                    .collect();
                Ok(Sample::Tensor(Tensor::from_vec(data, tensor.shape())))
            }
            other => Err(DataError::TransformStage {
                step: self.name(),
                stage: other.stage(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "normalize"
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑确定性步骤↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓随机增强↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
/// 在`[-degrees, degrees]`内随机旋转
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomRotation {
    pub degrees: f32,
}

impl Transform for RandomRotation {
    fn apply(&self, sample: Sample, rng: &mut dyn RngCore) -> Result<Sample> {
        let gray = sample.into_gray(self.name())?;
        let angle = rng.gen_range(-self.degrees..=self.degrees);
        Ok(Sample::Gray(Vision::rotate(&gray, angle)))
    }

    fn name(&self) -> &'static str {
        "random_rotation"
    }
}

/// 随机仿射（不含旋转）：平移比例为宽高的`translate`倍以内，x方向剪切`[-shear, shear]`度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomAffine {
    pub translate: Option<(f32, f32)>,
    pub shear: f32,
}

impl Transform for RandomAffine {
    fn apply(&self, sample: Sample, rng: &mut dyn RngCore) -> Result<Sample> {
        let gray = sample.into_gray(self.name())?;
        let (tx, ty) = match self.translate {
            Some((fx, fy)) => {
                let max_dx = fx * gray.width() as f32;
                let max_dy = fy * gray.height() as f32;
                (
                    rng.gen_range(-max_dx..=max_dx).round(),
                    rng.gen_range(-max_dy..=max_dy).round(),
                )
            }
            None => (0.0, 0.0),
        };
        let shear = rng.gen_range(-self.shear..=self.shear);
        Ok(Sample::Gray(Vision::affine(&gray, tx, ty, shear)))
    }

    fn name(&self) -> &'static str {
        "random_affine"
    }
}

/// 亮度、对比度抖动，系数分别取自`[max(0, 1 - b), 1 + b]`、`[max(0, 1 - c), 1 + c]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorJitter {
    pub brightness: f32,
    pub contrast: f32,
}

impl Transform for ColorJitter {
    fn apply(&self, sample: Sample, rng: &mut dyn RngCore) -> Result<Sample> {
        let mut gray = sample.into_gray(self.name())?;
        if self.brightness > 0.0 {
            let factor = rng.gen_range((1.0 - self.brightness).max(0.0)..=1.0 + self.brightness);
            gray = Vision::adjust_brightness(&gray, factor);
        }
        if self.contrast > 0.0 {
            let factor = rng.gen_range((1.0 - self.contrast).max(0.0)..=1.0 + self.contrast);
            gray = Vision::adjust_contrast(&gray, factor);
        }
        Ok(Sample::Gray(gray))
    }

    fn name(&self) -> &'static str {
        "color_jitter"
    }
}

/// 以概率`p`随机擦除一个矩形区域。
/// 面积占比取自`scale`，宽高比在`ratio`内按对数均匀采样，最多尝试10次放置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomErasing {
    pub p: f64,
    pub scale: (f32, f32),
    pub ratio: (f32, f32),
    pub value: u8,
}

impl RandomErasing {
    const MAX_ATTEMPTS: usize = 10;

    pub fn with_probability(p: f64) -> Self {
        Self {
            p,
            scale: (0.02, 0.33),
            ratio: (0.3, 3.3),
            value: 0,
        }
    }
}

impl Transform for RandomErasing {
    fn apply(&self, sample: Sample, rng: &mut dyn RngCore) -> Result<Sample> {
        let mut gray = sample.into_gray(self.name())?;
        if !rng.gen_bool(self.p.clamp(0.0, 1.0)) {
            return Ok(Sample::Gray(gray));
        }

        let (width, height) = gray.dimensions();
        let area = width as f32 * height as f32;
        let (log_lo, log_hi) = (self.ratio.0.ln(), self.ratio.1.ln());

        for _ in 0..Self::MAX_ATTEMPTS {
            let erase_area = area * rng.gen_range(self.scale.0..=self.scale.1);
            let aspect = rng.gen_range(log_lo..=log_hi).exp();
            let h = (erase_area * aspect).sqrt().round() as u32;
            let w = (erase_area / aspect).sqrt().round() as u32;
            if h == 0 || w == 0 || h >= height || w >= width {
                continue;
            }
            let y = rng.gen_range(0..=height - h);
            let x = rng.gen_range(0..=width - w);
            Vision::erase(&mut gray, x, y, w, h, self.value);
            break;
        }
        Ok(Sample::Gray(gray))
    }

    fn name(&self) -> &'static str {
        "random_erasing"
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑随机增强↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

#[enum_dispatch(Transform)]
#[derive(Debug, Clone, PartialEq)]
pub enum TransformStep {
    Grayscale,
    Resize,
    RandomRotation,
    RandomAffine,
    ColorJitter,
    RandomErasing,
    ToTensor,
    Normalize,
}

/// 依次执行的一串变换
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compose {
    steps: Vec<TransformStep>,
}

impl Compose {
    pub fn new(steps: Vec<TransformStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[TransformStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// 依次执行所有步骤，返回最终张量
    pub fn apply(&self, image: DynamicImage, rng: &mut dyn RngCore) -> Result<Tensor> {
        let mut sample = Sample::Image(image);
        for step in &self.steps {
            sample = step.apply(sample, rng)?;
        }
        Ok(sample.into_tensor())
    }
}

/// 各器官在训练模式下追加的数据增强
pub fn augmentation_block(organ: Organ) -> Vec<TransformStep> {
    match organ {
        Organ::Brain => vec![
            RandomRotation { degrees: 15.0 }.into(),
            RandomAffine {
                translate: Some((0.1, 0.1)),
                shear: 10.0,
            }
            .into(),
            ColorJitter {
                brightness: 0.2,
                contrast: 0.2,
            }
            .into(),
        ],
        Organ::Breast => vec![
            RandomRotation { degrees: 20.0 }.into(),
            RandomErasing::with_probability(0.2).into(),
        ],
        Organ::Lungs => vec![
            RandomRotation { degrees: 20.0 }.into(),
            RandomAffine {
                translate: None,
                shear: 5.0,
            }
            .into(),
            ColorJitter {
                brightness: 0.3,
                contrast: 0.3,
            }
            .into(),
            RandomErasing::with_probability(0.3).into(),
        ],
    }
}

/// 按器官与模式构造变换流水线：
/// 灰度 →（尺寸不符时）缩放 →（仅训练模式）器官数据增强 → 转张量 → 归一化。
///
/// 器官按大写键精确匹配增强表（`"BRAIN"`、`"BREAST"`、`"LUNGS"`），
/// 只有训练模式才会查表，查不到即为配置错误。
#[derive(Debug, Clone)]
pub struct AugmentationPipelineBuilder {
    table: BTreeMap<String, Vec<TransformStep>>,
    target_size: (u32, u32),
}

impl Default for AugmentationPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AugmentationPipelineBuilder {
    /// 使用内置增强表，目标尺寸默认为[`REQUIRED_IMAGE_SIZE`]
    pub fn new() -> Self {
        let table = Organ::ALL
            .into_iter()
            .map(|organ| (organ.key().to_string(), augmentation_block(organ)))
            .collect();
        Self {
            table,
            target_size: REQUIRED_IMAGE_SIZE,
        }
    }

    /// 使用空增强表，配合`with_block`使用
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
            target_size: REQUIRED_IMAGE_SIZE,
        }
    }

    /// 输入图像的尺寸（宽, 高），与[`REQUIRED_IMAGE_SIZE`]不同时会插入缩放
    pub fn target_size(mut self, size: (u32, u32)) -> Self {
        self.target_size = size;
        self
    }

    /// 添加或替换某个器官键对应的增强
    pub fn with_block(mut self, organ_key: &str, steps: Vec<TransformStep>) -> Self {
        self.table.insert(organ_key.to_string(), steps);
        self
    }

    pub fn build(&self, organ_key: &str, mode: Mode) -> Result<Compose> {
        let mut steps: Vec<TransformStep> = vec![Grayscale.into()];

        if self.target_size != REQUIRED_IMAGE_SIZE {
            let (width, height) = REQUIRED_IMAGE_SIZE;
            steps.push(Resize { width, height }.into());
        }

        if mode.is_train() {
            let block = self
                .table
                .get(organ_key)
                .ok_or_else(|| DataError::UnsupportedOrgan(organ_key.to_string()))?;
            steps.extend(block.iter().cloned());
        }

        steps.push(ToTensor.into());
        steps.push(
            Normalize {
                mean: NORMALIZE_MEAN,
                std: NORMALIZE_STD,
            }
            .into(),
        );

        Ok(Compose::new(steps))
    }

    /// 类型化的入口：按`organ.key()`查表
    pub fn build_for(&self, organ: Organ, mode: Mode) -> Result<Compose> {
        self.build(organ.key(), mode)
    }
}
