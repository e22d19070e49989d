//! DataLoader 单元测试

use rand::RngCore;
use tempfile::tempdir;

use super::write_images;
use crate::data::dataloader::DataLoader;
use crate::data::dataset::{Dataset, LabeledImageDataset};
use crate::data::error::{self, DataError};
use crate::tensor::Tensor;

/// 第`i`个样本为`[2i, 2i + 1]`，标签为`i`
struct RangeDataset(usize);

impl Dataset for RangeDataset {
    fn len(&self) -> usize {
        self.0
    }

    fn get_with_rng(&self, index: usize, _rng: &mut dyn RngCore) -> error::Result<(Tensor, usize)> {
        if index >= self.0 {
            return Err(DataError::IndexOutOfBounds { index, len: self.0 });
        }
        let start = (index * 2) as f32;
        Ok((Tensor::new(&[start, start + 1.0], &[2]), index))
    }
}

fn range_dataset(n: usize) -> RangeDataset {
    RangeDataset(n)
}

#[test]
fn test_dataloader_basic() {
    let loader = DataLoader::new(range_dataset(10), 3);
    assert_eq!(loader.num_batches(), 4); // 10 / 3 = 3.33, 向上取整 = 4
    assert_eq!(loader.len(), 10);
    assert!(!loader.is_shuffled());

    let batches = loader.iter().collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(batches.len(), 4);

    // 前 3 个批次大小为 3
    assert_eq!(batches[0].0.shape(), &[3, 2]);
    assert_eq!(batches[1].0.shape(), &[3, 2]);
    assert_eq!(batches[2].0.shape(), &[3, 2]);
    // 最后一个批次大小为 1
    assert_eq!(batches[3].0.shape(), &[1, 2]);

    // 不打乱时保持原顺序
    assert_eq!(batches[0].1, vec![0, 1, 2]);
    assert_eq!(batches[3].1, vec![9]);
    assert_eq!(batches[1].0[[0, 1]], 7.0);
}

#[test]
fn test_dataloader_drop_last() {
    let loader = DataLoader::new(range_dataset(10), 3).drop_last(true);
    assert_eq!(loader.num_batches(), 3); // 10 / 3 = 3

    let batches: Vec<_> = loader.iter().collect();
    assert_eq!(batches.len(), 3);
}

#[test]
fn test_dataloader_shuffle_with_seed() {
    // 使用相同种子，两次迭代应该产生相同的结果
    let loader1 = DataLoader::new(range_dataset(10), 3).shuffle(true).seed(42);
    let loader2 = DataLoader::new(range_dataset(10), 3).shuffle(true).seed(42);

    let batches1 = loader1.iter().collect::<Result<Vec<_>, _>>().unwrap();
    let batches2 = loader2.iter().collect::<Result<Vec<_>, _>>().unwrap();

    assert_eq!(batches1.len(), batches2.len());
    for (b1, b2) in batches1.iter().zip(batches2.iter()) {
        assert_eq!(b1.0, b2.0);
        assert_eq!(b1.1, b2.1);
    }

    // 打乱后仍然是同一批样本
    let mut labels = batches1.into_iter().flat_map(|b| b.1).collect::<Vec<_>>();
    labels.sort_unstable();
    assert_eq!(labels, (0..10).collect::<Vec<_>>());
}

#[test]
fn test_dataloader_empty() {
    let loader = DataLoader::new(range_dataset(0), 4);
    assert!(loader.is_empty());
    assert_eq!(loader.num_batches(), 0);
    assert!(loader.iter().next().is_none());
}

#[test]
#[should_panic(expected = "batch_size 必须大于 0")]
fn test_dataloader_zero_batch_size() {
    DataLoader::new(range_dataset(1), 0);
}

#[test]
fn test_dataloader_stacks_images() {
    let dir = tempdir().unwrap();
    let paths = write_images(dir.path(), "train", "glioma", 3, 5);
    let dataset = LabeledImageDataset::new(paths, vec![1, 1, 1], None);

    let loader = DataLoader::new(dataset, 2);
    let batches = loader.iter().collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].0.shape(), &[2, 5, 5]);
    assert_eq!(batches[1].0.shape(), &[1, 5, 5]);
    assert_eq!(batches[1].1, vec![1]);
}

#[test]
fn test_dataloader_surfaces_decode_errors() {
    let dir = tempdir().unwrap();
    let mut paths = write_images(dir.path(), "train", "glioma", 1, 4);
    paths.push(dir.path().join("missing.png"));
    let dataset = LabeledImageDataset::new(paths, vec![1, 1], None);

    let loader = DataLoader::new(dataset, 1);
    let mut iter = loader.iter();
    assert!(iter.next().unwrap().is_ok());
    assert!(matches!(
        iter.next().unwrap(),
        Err(DataError::ImageDecode { .. })
    ));
    assert!(iter.next().is_none());
}

#[test]
fn test_dataloader_rejects_mixed_image_sizes() {
    let dir = tempdir().unwrap();
    let mut paths = write_images(dir.path(), "test", "notumor", 1, 20);
    paths.extend(write_images(dir.path(), "test", "glioma", 1, 30));
    let dataset = LabeledImageDataset::new(paths, vec![0, 1], None);

    let loader = DataLoader::new(dataset, 2);
    let err = loader.iter().next().unwrap().unwrap_err();
    assert!(err.is_configuration());
    match err {
        DataError::ShapeMismatch { expected, got } => {
            assert_eq!(expected, vec![20, 20]);
            assert_eq!(got, vec![30, 30]);
        }
        other => panic!("意外的错误: {other:?}"),
    }

    // 每批只有一个样本时不需要堆叠不同形状
    let loader = DataLoader::new(loader.dataset().clone(), 1);
    assert!(loader.iter().all(|batch| batch.is_ok()));
}
