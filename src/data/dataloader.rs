/*
 * @Description  : DataLoader - PyTorch 风格的数据批量加载器
 *
 * 提供统一的数据迭代 API，支持：
 * - 自动分批 (batch_size)
 * - 随机打乱 (shuffle)
 * - 丢弃不完整批次 (drop_last)
 * - 固定随机种子 (seed)，同时决定打乱顺序和数据增强
 */

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::data::dataset::Dataset;
use crate::data::error::{DataError, Result};
use crate::tensor::Tensor;

/// 一个批次：`[B, ...]`的特征张量与`B`个类别编码
pub type Batch = (Tensor, Vec<usize>);

/// DataLoader - PyTorch 风格的数据批量加载器
///
/// # 示例
/// ```ignore
/// let loader = DataLoader::new(dataset, 32)
///     .shuffle(true)
///     .seed(42);
///
/// for batch in loader.iter() {
///     let (images, labels) = batch?;
///     model.forward(&images)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DataLoader<D: Dataset> {
    dataset: D,
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    seed: Option<u64>,
}

impl<D: Dataset> DataLoader<D> {
    /// 创建新的 DataLoader
    ///
    /// # Panics
    /// `batch_size`为0时
    pub fn new(dataset: D, batch_size: usize) -> Self {
        assert!(batch_size > 0, "DataLoader: batch_size 必须大于 0");
        Self {
            dataset,
            batch_size,
            shuffle: false,
            drop_last: false,
            seed: None,
        }
    }

    /// 设置是否打乱数据
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// 设置是否丢弃最后一个不完整的批次
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// 设置随机种子（用于 shuffle 与数据增强）
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 设置可选的随机种子
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffle
    }

    /// 获取批次数量
    pub fn num_batches(&self) -> usize {
        let n = self.dataset.len();
        if self.drop_last {
            n / self.batch_size
        } else {
            n.div_ceil(self.batch_size)
        }
    }

    /// 获取数据集大小
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    /// 检查是否为空
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    /// 创建迭代器
    pub fn iter(&self) -> DataLoaderIterator<'_, D> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut indices: Vec<usize> = (0..self.dataset.len()).collect();
        if self.shuffle {
            indices.shuffle(&mut rng);
        }

        DataLoaderIterator {
            loader: self,
            indices,
            current_batch: 0,
            rng,
        }
    }
}

/// DataLoader 迭代器。样本解码失败时产出`Err`，不跳过坏样本
pub struct DataLoaderIterator<'a, D: Dataset> {
    loader: &'a DataLoader<D>,
    indices: Vec<usize>,
    current_batch: usize,
    rng: StdRng,
}

impl<D: Dataset> Iterator for DataLoaderIterator<'_, D> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.indices.len();
        let batch_size = self.loader.batch_size;
        let start = self.current_batch * batch_size;

        // 检查是否还有数据
        if start >= n {
            return None;
        }

        let end = (start + batch_size).min(n);

        // 如果 drop_last 且批次不完整，则结束
        if self.loader.drop_last && end - start < batch_size {
            return None;
        }

        self.current_batch += 1;
        Some(self.extract_batch(start, end))
    }
}

impl<D: Dataset> DataLoaderIterator<'_, D> {
    /// 按索引取出样本并沿新维度堆叠；样本形状必须一致
    fn extract_batch(&mut self, start: usize, end: usize) -> Result<Batch> {
        let mut features: Vec<Tensor> = Vec::with_capacity(end - start);
        let mut labels = Vec::with_capacity(end - start);
        for &idx in &self.indices[start..end] {
            let (feature, label) = self.loader.dataset.get_with_rng(idx, &mut self.rng)?;
            if let Some(first) = features.first() {
                if first.shape() != feature.shape() {
                    return Err(DataError::ShapeMismatch {
                        expected: first.shape().to_vec(),
                        got: feature.shape().to_vec(),
                    });
                }
            }
            features.push(feature);
            labels.push(label);
        }
        let refs = features.iter().collect::<Vec<_>>();
        Ok((Tensor::stack(&refs), labels))
    }
}
