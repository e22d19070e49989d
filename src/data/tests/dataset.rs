use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::tempdir;

use super::write_images;
use crate::data::dataset::{Dataset, LabeledImageDataset};
use crate::data::error::DataError;
use crate::data::labels::LabelMap;
use crate::data::transforms::AugmentationPipelineBuilder;
use crate::data::vocab::Mode;

#[test]
fn test_labeled_dataset_without_transform() {
    let dir = tempdir().unwrap();
    let paths = write_images(dir.path(), "train", "glioma", 2, 6);
    let dataset = LabeledImageDataset::new(paths.clone(), vec![1, 1], None);

    assert_eq!(dataset.len(), 2);
    assert!(dataset.transform().is_none());
    assert_eq!(dataset.path(1), Some(paths[1].as_path()));

    let (image, label) = dataset.get(0).unwrap();
    assert_eq!(label, 1);
    assert_eq!(image.shape(), &[6, 6]);
    // write_images 写入的像素值为 (x + y) * 8 + i
    assert_eq!(image[[1, 2]], 24.0);
}

#[test]
fn test_labeled_dataset_from_label_map() {
    let dir = tempdir().unwrap();
    let glioma = write_images(dir.path(), "train", "glioma", 1, 8);
    let notumor = write_images(dir.path(), "train", "notumor", 1, 8);
    let labels: LabelMap = [(glioma[0].clone(), 1), (notumor[0].clone(), 0)]
        .into_iter()
        .collect();

    let pipeline = AugmentationPipelineBuilder::new()
        .target_size((8, 8))
        .build("BRAIN", Mode::Test)
        .unwrap();
    let dataset = LabeledImageDataset::from_label_map(&labels, Some(pipeline));

    // 按路径排序：glioma 在 notumor 之前
    assert_eq!(dataset.labels(), &[1, 0]);
    let mut rng = StdRng::seed_from_u64(0);
    let (image, label) = dataset.get_with_rng(1, &mut rng).unwrap();
    assert_eq!(label, 0);
    assert_eq!(image.shape(), &[1, 512, 512]);
}

#[test]
fn test_labeled_dataset_errors() {
    let dir = tempdir().unwrap();
    let bogus = dir.path().join("broken.png");
    fs::write(&bogus, b"not an image").unwrap();
    let dataset = LabeledImageDataset::new(vec![bogus.clone()], vec![0], None);

    match dataset.get(0) {
        Err(DataError::ImageDecode { path, .. }) => assert_eq!(path, bogus),
        other => panic!("意外的结果: {other:?}"),
    }
    assert!(matches!(
        dataset.get(1),
        Err(DataError::IndexOutOfBounds { index: 1, len: 1 })
    ));
}

#[test]
fn test_labeled_dataset_missing_file_fails_lazily() {
    // 构造时不访问文件
    let dataset = LabeledImageDataset::new(vec![PathBuf::from("/no/such/file.png")], vec![0], None);
    assert_eq!(dataset.len(), 1);
    assert!(matches!(
        dataset.get(0),
        Err(DataError::ImageDecode { .. })
    ));
}

#[test]
#[should_panic(expected = "数量必须一致")]
fn test_labeled_dataset_length_mismatch() {
    LabeledImageDataset::new(vec![PathBuf::from("a.png")], vec![], None);
}
