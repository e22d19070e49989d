//! CSV 标签清单
//!
//! 每个划分一个文件：`<目标目录>/train_<文件名>`、`<目标目录>/test_<文件名>`。
//! 写入总是追加；只有文件在写入前不存在时才写表头。同样的记录写两次就会得到两份，
//! 这里不做去重。

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::data::error::{DataError, Result};
use crate::data::labels::{LabelMap, LabelSource, LabelValue, RecordMap};
use crate::data::vocab::Split;

/// 清单表头
pub const MANIFEST_HEADER: [&str; 5] = [
    "Image Path",
    "Organ Label",
    "Disease Label",
    "Scan Type Label",
    "Dataset Type",
];

const PATH_COLUMN: usize = 0;
const DISEASE_COLUMN: usize = 2;

fn manifest_path(dest_dir: &Path, file_name: &str, split: Split) -> PathBuf {
    dest_dir.join(format!("{}_{}", split.as_str(), file_name))
}

/// 清单写入器
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    dest_dir: PathBuf,
    file_name: String,
}

impl ManifestWriter {
    pub fn new<P: AsRef<Path>>(dest_dir: P, file_name: &str) -> Self {
        Self {
            dest_dir: dest_dir.as_ref().to_path_buf(),
            file_name: file_name.to_string(),
        }
    }

    /// 某个划分对应的清单路径
    pub fn path_for(&self, split: Split) -> PathBuf {
        manifest_path(&self.dest_dir, &self.file_name, split)
    }

    /// 把记录追加写入`split`对应的清单，返回清单路径
    pub fn write(&self, records: &RecordMap, split: Split) -> Result<PathBuf> {
        fs::create_dir_all(&self.dest_dir)?;
        let path = self.path_for(split);
        let is_new = !path.exists();

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if is_new {
            writer.write_record(MANIFEST_HEADER)?;
        }
        for record in records.values() {
            writer.write_record([
                record.image_path.to_string_lossy().into_owned(),
                record.organ.to_string(),
                record.disease.to_string(),
                record.scan.to_string(),
                record.split.code().to_string(),
            ])?;
        }
        writer.flush()?;

        info!(path = ?path, rows = records.len(), header = is_new, "写入标签清单");
        Ok(path)
    }
}

/// 从已经生成的清单读回疾病标签
///
/// 适用于没有文件夹标签的器官：由调用方事先准备好同格式的清单。
/// 同一路径出现多次时（重复追加），以最后一行为准。
#[derive(Debug, Clone)]
pub struct ManifestLabelSource {
    dest_dir: PathBuf,
    file_name: String,
}

impl ManifestLabelSource {
    pub fn new<P: AsRef<Path>>(dest_dir: P, file_name: &str) -> Self {
        Self {
            dest_dir: dest_dir.as_ref().to_path_buf(),
            file_name: file_name.to_string(),
        }
    }

    pub fn path_for(&self, split: Split) -> PathBuf {
        manifest_path(&self.dest_dir, &self.file_name, split)
    }

    /// 读取单个清单文件
    pub fn read(path: &Path) -> Result<LabelMap> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;

        let mut labels = LabelMap::new();
        for (line, row) in reader.records().enumerate() {
            let row = row?;
            let format_err = |reason: String| DataError::ManifestFormat {
                path: path.to_path_buf(),
                reason: format!("第{}行: {reason}", line + 2),
            };

            let image_path = row
                .get(PATH_COLUMN)
                .ok_or_else(|| format_err("缺少图像路径".to_string()))?;
            let disease = row
                .get(DISEASE_COLUMN)
                .ok_or_else(|| format_err("缺少疾病标签".to_string()))?
                .parse::<LabelValue>()
                .map_err(format_err)?;
            let code = disease
                .code()
                .ok_or_else(|| format_err("疾病标签为空".to_string()))?;

            labels.insert(PathBuf::from(image_path), code);
        }
        Ok(labels)
    }
}

impl LabelSource for ManifestLabelSource {
    fn labels(&self, split: Split) -> Result<LabelMap> {
        Self::read(&self.path_for(split))
    }

    fn describe(&self) -> String {
        format!("manifest({:?})", self.dest_dir.join(&self.file_name))
    }
}
