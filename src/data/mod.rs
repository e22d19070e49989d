//! 数据集组装模块
//!
//! 把“按文件夹存放的医学影像”整理成可训练的数据集。
//!
//! # 主要组件
//!
//! - [`FolderLabelExtractor`]: 按疾病文件夹名为图像打标
//! - [`MetadataEncoder`]: 补全器官、扫描类型、数据划分等元数据
//! - [`ManifestWriter`]: 把标签记录追加写入 CSV 清单
//! - [`AugmentationPipelineBuilder`]: 按器官和模式构造变换流水线
//! - [`LabeledImageDataset`]: 访问时才解码图像的数据集
//! - [`DataLoader`]: `PyTorch` 风格的数据批量加载器
//! - [`DatasetAssembly`]: 串起以上所有步骤的入口
//! - [`DataError`]: 数据集组装错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use scan_dataset::data::{AssemblyConfig, DatasetAssembly, Mode, Organ, ScanType};
//!
//! let config = AssemblyConfig::new("data/brain", Organ::Brain, ScanType::Mri, "out", "labels.csv")
//!     .mode(Mode::Train)
//!     .batch_size(16);
//! let assembly = DatasetAssembly::build(config)?;
//!
//! for batch in assembly.loader().iter() {
//!     let (images, labels) = batch?;
//!     // images: [B, 1, 512, 512]
//! }
//! ```

mod assembly;
mod config;
mod dataloader;
mod dataset;
pub mod error;
pub mod labels;
mod manifest;
pub mod transforms;
pub mod vocab;

#[cfg(test)]
mod tests;

// Re-exports
pub use assembly::DatasetAssembly;
pub use config::{AssemblyConfig, DEFAULT_BATCH_SIZE};
pub use dataloader::{Batch, DataLoader, DataLoaderIterator};
pub use dataset::{Dataset, LabeledImageDataset};
pub use error::DataError;
pub use labels::{
    Encoding, FolderLabelExtractor, LabelMap, LabelRecord, LabelSource, LabelValue,
    MetadataEncoder, RecordMap, one_hot_decode, one_hot_encode,
};
pub use manifest::{MANIFEST_HEADER, ManifestLabelSource, ManifestWriter};
pub use transforms::{AugmentationPipelineBuilder, Compose, Transform, TransformStep};
pub use vocab::{DiseaseVocabulary, Mode, Organ, ScanType, Split};
