//! 标签来源
//!
//! 每种打标策略实现一次 [`LabelSource`]：目前有按文件夹名打标的
//! [`FolderLabelExtractor`]，以及从已有 CSV 清单读回标签的
//! [`ManifestLabelSource`](crate::data::ManifestLabelSource)。
//! 调用方只依赖这个接口，新增策略不需要改动组装流程。

mod encoder;
mod extractor;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::data::error::Result;
use crate::data::vocab::Split;

pub use encoder::{
    Encoding, LabelRecord, LabelValue, MetadataEncoder, RecordMap, one_hot_decode,
    one_hot_encode,
};
pub use extractor::{FolderLabelExtractor, resolve_split_dir};

/// 图像路径 → 疾病编码。按路径排序，保证清单行序与数据集下标稳定
pub type LabelMap = BTreeMap<PathBuf, usize>;

/// 打标策略
pub trait LabelSource {
    /// 返回某个划分下所有图像的疾病编码
    fn labels(&self, split: Split) -> Result<LabelMap>;

    /// 用于日志的策略名
    fn describe(&self) -> String;
}
