use std::fs;

use tempfile::tempdir;

use super::{brain_dataset, write_images};
use crate::data::error::DataError;
use crate::data::labels::{FolderLabelExtractor, LabelSource, resolve_split_dir};
use crate::data::vocab::{DiseaseVocabulary, Split};

#[test]
fn test_extract_brain_labels() {
    let dir = tempdir().unwrap();
    brain_dataset(dir.path(), 8);

    let extractor = FolderLabelExtractor::new(dir.path(), DiseaseVocabulary::brain()).unwrap();
    let train = extractor.labels(Split::Train).unwrap();
    let test = extractor.labels(Split::Test).unwrap();

    assert_eq!(train.len(), 2);
    assert!(train.values().all(|&code| code == 1));
    assert!(
        train
            .keys()
            .all(|path| path.parent().unwrap().ends_with("Training/glioma"))
    );

    assert_eq!(test.len(), 1);
    assert_eq!(test.values().copied().collect::<Vec<_>>(), vec![0]);
}

#[test]
fn test_extract_multiple_tags() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_images(root, "train", "glioma", 1, 4);
    write_images(root, "train", "pituitary", 2, 4);
    write_images(root, "train", "Meningioma", 1, 4);
    write_images(root, "test", "notumor", 1, 4);

    let extractor = FolderLabelExtractor::new(root, DiseaseVocabulary::brain()).unwrap();
    let train = extractor.labels(Split::Train).unwrap();

    let mut codes = train.values().copied().collect::<Vec<_>>();
    codes.sort_unstable();
    assert_eq!(codes, vec![1, 2, 3, 3]);
}

#[test]
fn test_unknown_tag_is_error() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_images(root, "train", "unknowntag", 1, 4);
    write_images(root, "test", "glioma", 1, 4);

    let extractor = FolderLabelExtractor::new(root, DiseaseVocabulary::brain()).unwrap();
    match extractor.labels(Split::Train) {
        Err(DataError::UnknownDiseaseTag { tag, .. }) => assert_eq!(tag, "unknowntag"),
        other => panic!("意外的结果: {other:?}"),
    }
    // test 划分不受影响
    assert_eq!(extractor.labels(Split::Test).unwrap().len(), 1);
}

#[test]
fn test_lung_tags_rejected_by_brain_vocabulary() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_images(root, "train", "pneumonia", 1, 4);
    write_images(root, "test", "normal", 1, 4);

    let extractor = FolderLabelExtractor::new(root, DiseaseVocabulary::brain()).unwrap();
    assert!(matches!(
        extractor.labels(Split::Train),
        Err(DataError::UnknownDiseaseTag { .. })
    ));

    let extractor = FolderLabelExtractor::new(root, DiseaseVocabulary::lungs()).unwrap();
    let train = extractor.labels(Split::Train).unwrap();
    assert_eq!(train.values().copied().collect::<Vec<_>>(), vec![5]);
}

#[test]
fn test_missing_split_folder() {
    let dir = tempdir().unwrap();
    write_images(dir.path(), "train", "glioma", 1, 4);

    let err = FolderLabelExtractor::new(dir.path(), DiseaseVocabulary::brain()).unwrap_err();
    assert!(err.is_configuration());
    match err {
        DataError::MissingSplitFolder { split, .. } => assert_eq!(split, "test"),
        other => panic!("意外的错误: {other:?}"),
    }
}

#[test]
fn test_ambiguous_split_folder() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("train_a")).unwrap();
    fs::create_dir_all(root.join("train_b")).unwrap();

    match resolve_split_dir(root, Split::Train) {
        Err(DataError::AmbiguousSplitFolder { candidates, .. }) => {
            assert_eq!(candidates.len(), 2)
        }
        other => panic!("意外的结果: {other:?}"),
    }
}

#[test]
fn test_split_folder_ignores_files() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("train_notes.txt"), "x").unwrap();
    fs::create_dir_all(root.join("Training")).unwrap();

    let resolved = resolve_split_dir(root, Split::Train).unwrap();
    assert!(resolved.ends_with("Training"));
}

#[test]
fn test_stray_files_and_empty_tags() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_images(root, "train", "glioma", 1, 4);
    fs::create_dir_all(root.join("train").join("pituitary")).unwrap();
    fs::write(root.join("train").join("README.md"), "x").unwrap();
    // 不按扩展名过滤
    fs::write(root.join("train").join("glioma").join("notes.txt"), "x").unwrap();
    fs::create_dir_all(root.join("test")).unwrap();

    let extractor = FolderLabelExtractor::new(root, DiseaseVocabulary::brain()).unwrap();
    let train = extractor.labels(Split::Train).unwrap();
    assert_eq!(train.len(), 2);
    assert!(train.values().all(|&code| code == 1));
    assert!(extractor.labels(Split::Test).unwrap().is_empty());
}

#[test]
fn test_custom_vocabulary() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_images(root, "train", "benign", 2, 4);
    write_images(root, "test", "malignant", 1, 4);

    let vocab = DiseaseVocabulary::new("breast", [("benign", 6), ("malignant", 7)]);
    let extractor = FolderLabelExtractor::new(root, vocab).unwrap();
    assert_eq!(extractor.describe(), "folder-tag(breast)");
    assert_eq!(
        extractor.labels(Split::Test).unwrap().values().copied().collect::<Vec<_>>(),
        vec![7]
    );
}
