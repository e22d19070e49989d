//! 组装参数
//!
//! 可以在代码里链式构造，也可以从 JSON 文件加载：
//!
//! ```json
//! {
//!     "dataset_path": "data/brain-tumor-mri-dataset",
//!     "scanned_organ": "brain",
//!     "scan_type": "mri",
//!     "csv_dest_folder": "output",
//!     "csv_file_name": "brain-labels.csv",
//!     "mode": "train",
//!     "batch_size": 32
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::error::{DataError, Result};
use crate::data::labels::Encoding;
use crate::data::transforms::REQUIRED_IMAGE_SIZE;
use crate::data::vocab::{Mode, Organ, ScanType};

pub const DEFAULT_BATCH_SIZE: usize = 32;

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_image_size() -> (u32, u32) {
    REQUIRED_IMAGE_SIZE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// 数据集根目录，下面应有 train/test 文件夹
    pub dataset_path: PathBuf,
    pub scanned_organ: Organ,
    pub scan_type: ScanType,
    /// 清单输出目录
    pub csv_dest_folder: PathBuf,
    /// 清单文件名，实际文件为`train_<名称>`与`test_<名称>`
    pub csv_file_name: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub mode: Mode,
    /// 输入图像尺寸（宽, 高）
    #[serde(default = "default_image_size")]
    pub image_size: (u32, u32),
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub encoding: Encoding,
}

impl AssemblyConfig {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        dataset_path: P,
        scanned_organ: Organ,
        scan_type: ScanType,
        csv_dest_folder: Q,
        csv_file_name: &str,
    ) -> Self {
        Self {
            dataset_path: dataset_path.as_ref().to_path_buf(),
            scanned_organ,
            scan_type,
            csv_dest_folder: csv_dest_folder.as_ref().to_path_buf(),
            csv_file_name: csv_file_name.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            mode: Mode::default(),
            image_size: REQUIRED_IMAGE_SIZE,
            seed: None,
            encoding: Encoding::default(),
        }
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn image_size(mut self, image_size: (u32, u32)) -> Self {
        self.image_size = image_size;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(DataError::InvalidBatchSize);
        }
        Ok(())
    }
}
