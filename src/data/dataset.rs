/*
 * @Description  : 可随机访问的数据集。
 *                 `LabeledImageDataset`只在构造时保存路径与标签，图像在访问时才解码并经过变换流水线。
 */

use std::path::{Path, PathBuf};

use rand::RngCore;

use crate::data::error::{DataError, Result};
use crate::data::labels::LabelMap;
use crate::data::transforms::Compose;
use crate::tensor::Tensor;
use crate::vision::Vision;

/// 可随机访问、定长的数据集，每个样本为`(特征, 类别编码)`
pub trait Dataset {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 获取第`index`个样本；随机数据增强使用`rng`
    fn get_with_rng(&self, index: usize, rng: &mut dyn RngCore) -> Result<(Tensor, usize)>;

    /// 获取第`index`个样本，随机数据增强使用线程本地随机数
    fn get(&self, index: usize) -> Result<(Tensor, usize)> {
        self.get_with_rng(index, &mut rand::thread_rng())
    }
}

/// 图像路径 + 标签，访问时才打开图像
#[derive(Debug, Clone)]
pub struct LabeledImageDataset {
    image_paths: Vec<PathBuf>,
    labels: Vec<usize>,
    transform: Option<Compose>,
}

impl LabeledImageDataset {
    /// # Panics
    /// 如果`image_paths`和`labels`的长度不一致
    pub fn new(image_paths: Vec<PathBuf>, labels: Vec<usize>, transform: Option<Compose>) -> Self {
        assert_eq!(
            image_paths.len(),
            labels.len(),
            "LabeledImageDataset: 图像路径和标签的数量必须一致，得到 {} vs {}",
            image_paths.len(),
            labels.len()
        );
        Self {
            image_paths,
            labels,
            transform,
        }
    }

    /// 按路径顺序展开标签表
    pub fn from_label_map(labels: &LabelMap, transform: Option<Compose>) -> Self {
        let (image_paths, labels) = labels
            .iter()
            .map(|(path, &label)| (path.clone(), label))
            .unzip();
        Self::new(image_paths, labels, transform)
    }

    pub fn path(&self, index: usize) -> Option<&Path> {
        self.image_paths.get(index).map(PathBuf::as_path)
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn transform(&self) -> Option<&Compose> {
        self.transform.as_ref()
    }
}

impl Dataset for LabeledImageDataset {
    fn len(&self) -> usize {
        self.image_paths.len()
    }

    fn get_with_rng(&self, index: usize, rng: &mut dyn RngCore) -> Result<(Tensor, usize)> {
        let len = self.len();
        let path = self
            .image_paths
            .get(index)
            .ok_or(DataError::IndexOutOfBounds { index, len })?;

        let image = Vision::load_image(path).map_err(|source| DataError::ImageDecode {
            path: path.clone(),
            source,
        })?;

        let tensor = match &self.transform {
            Some(transform) => transform.apply(image, rng)?,
            None => Tensor::from_image(&image),
        };
        Ok((tensor, self.labels[index]))
    }
}
