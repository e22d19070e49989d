use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{LabelMap, LabelSource};
use crate::data::error::{DataError, Result};
use crate::data::vocab::{DiseaseVocabulary, Split};

/// 在数据集根目录下找名字包含`split`关键字（不区分大小写）的唯一文件夹
pub fn resolve_split_dir(root: &Path, split: Split) -> Result<PathBuf> {
    let keyword = split.as_str();
    let mut candidates = Vec::new();

    for entry in immediate_children(root) {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.contains(keyword) {
            candidates.push(entry.into_path());
        }
    }

    match candidates.len() {
        0 => Err(DataError::MissingSplitFolder {
            root: root.to_path_buf(),
            split: keyword,
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(DataError::AmbiguousSplitFolder {
            root: root.to_path_buf(),
            split: keyword,
            candidates,
        }),
    }
}

/// 按文件夹名打标：`<root>/<*train*|*test*>/<疾病标签>/<任意文件>`
///
/// 构造时即解析 train/test 文件夹，缺少任何一个都是配置错误。
#[derive(Debug, Clone)]
pub struct FolderLabelExtractor {
    train_dir: PathBuf,
    test_dir: PathBuf,
    vocabulary: DiseaseVocabulary,
}

impl FolderLabelExtractor {
    pub fn new<P: AsRef<Path>>(root: P, vocabulary: DiseaseVocabulary) -> Result<Self> {
        let root = std::path::absolute(root.as_ref())?;
        let train_dir = resolve_split_dir(&root, Split::Train)?;
        let test_dir = resolve_split_dir(&root, Split::Test)?;
        debug!(?train_dir, ?test_dir, vocabulary = vocabulary.name(), "解析数据划分");
        Ok(Self {
            train_dir,
            test_dir,
            vocabulary,
        })
    }

    pub fn split_dir(&self, split: Split) -> &Path {
        match split {
            Split::Train => &self.train_dir,
            Split::Test => &self.test_dir,
        }
    }

    pub fn vocabulary(&self) -> &DiseaseVocabulary {
        &self.vocabulary
    }

    /// 遍历`split_dir`下的每个疾病标签文件夹，把其中每个文件映射到该标签的编码。
    ///
    /// 不按扩展名过滤：标签文件夹里的任何文件都被当作图像。
    /// 直接位于`split_dir`下的普通文件会被忽略，标签文件夹内的子目录不会被递归。
    pub fn extract(split_dir: &Path, vocabulary: &DiseaseVocabulary) -> Result<LabelMap> {
        let mut labels = LabelMap::new();

        for tag_entry in immediate_children(split_dir) {
            let tag_entry = tag_entry?;
            if !tag_entry.file_type().is_dir() {
                continue;
            }
            let tag = tag_entry.file_name().to_string_lossy().to_lowercase();
            let code = vocabulary
                .code(&tag)
                .ok_or_else(|| DataError::UnknownDiseaseTag {
                    tag: tag.clone(),
                    folder: tag_entry.path().to_path_buf(),
                })?;

            let before = labels.len();
            for image_entry in immediate_children(tag_entry.path()) {
                let image_entry = image_entry?;
                if image_entry.file_type().is_file() {
                    labels.insert(image_entry.into_path(), code);
                }
            }

            let count = labels.len() - before;
            if count == 0 {
                warn!(folder = ?tag_entry.path(), "疾病标签文件夹为空");
            }
            debug!(%tag, code, count, "扫描标签文件夹");
        }

        Ok(labels)
    }
}

impl LabelSource for FolderLabelExtractor {
    fn labels(&self, split: Split) -> Result<LabelMap> {
        Self::extract(self.split_dir(split), &self.vocabulary)
    }

    fn describe(&self) -> String {
        format!("folder-tag({})", self.vocabulary.name())
    }
}

fn immediate_children(dir: &Path) -> walkdir::IntoIter {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
}
