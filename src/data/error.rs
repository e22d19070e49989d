//! 数据集组装相关的错误类型定义
//!
//! 配置类错误（找不到 train/test 文件夹、未知器官/扫描类型/疾病标签等）在构造时立即返回，
//! 不做任何重试；图像解码错误在访问样本时返回；写清单时的 IO/CSV 错误原样向上传递。

use std::path::PathBuf;
use thiserror::Error;

/// 数据集组装相关错误
#[derive(Debug, Error)]
pub enum DataError {
    /// 数据集根目录下没有名字含`split`的文件夹
    #[error("在 {root:?} 下找不到名称包含 \"{split}\" 的文件夹")]
    MissingSplitFolder { root: PathBuf, split: &'static str },

    /// 数据集根目录下有多个名字含`split`的文件夹
    #[error("在 {root:?} 下有多个名称包含 \"{split}\" 的文件夹: {candidates:?}")]
    AmbiguousSplitFolder {
        root: PathBuf,
        split: &'static str,
        candidates: Vec<PathBuf>,
    },

    /// 未知的器官名
    #[error("未知的器官: {0}")]
    UnknownOrgan(String),

    /// 未知的扫描类型
    #[error("未知的扫描类型: {0}（可选：rmn、mri、xray、ct）")]
    UnknownScanType(String),

    /// 未知的模式
    #[error("未知的模式: {0}（可选：train、val、test）")]
    UnknownMode(String),

    /// 疾病标签文件夹不在词表中，说明数据集与词表不匹配
    #[error("文件夹 {folder:?} 的疾病标签 \"{tag}\" 不在词表中")]
    UnknownDiseaseTag { tag: String, folder: PathBuf },

    /// 该器官没有对应的数据增强配置
    #[error("器官 {0} 没有对应的数据增强配置")]
    UnsupportedOrgan(String),

    /// 该器官不支持按文件夹提取标签，需要调用方提供标签来源
    #[error("器官 {0} 不支持按文件夹提取标签，请通过 build_with_source 提供标签来源")]
    MissingLabelSource(String),

    /// 标签超出 one-hot 的类别数
    #[error("标签 {label} 超出类别数 {num_classes}")]
    LabelOutOfRange { label: usize, num_classes: usize },

    /// 词表中的编码与类别数常量不一致
    #[error("词表 {vocabulary} 中编码 {code} 超出类别数 {num_classes}")]
    VocabularyMismatch {
        vocabulary: String,
        code: usize,
        num_classes: usize,
    },

    /// batch_size 必须大于0
    #[error("batch_size 必须大于 0")]
    InvalidBatchSize,

    /// 变换步骤收到了不支持的样本形态（如在`ToTensor`之后做数据增强）
    #[error("变换步骤 {step} 不能作用于 {stage} 阶段的样本")]
    TransformStage {
        step: &'static str,
        stage: &'static str,
    },

    /// 图像打开或解码失败
    #[error("无法解码图像 {path:?}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// 索引越界
    #[error("索引越界: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// 同一批次内样本形状不一致（图像尺寸不同且未缩放到统一尺寸）
    #[error("批次内样本形状不一致: 期望 {expected:?}，得到 {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// 清单文件内容不合法
    #[error("清单 {path:?} 格式错误: {reason}")]
    ManifestFormat { path: PathBuf, reason: String },

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// CSV 读写错误
    #[error("CSV 错误: {0}")]
    Csv(#[from] csv::Error),

    /// 遍历目录错误
    #[error("遍历目录错误: {0}")]
    Walk(#[from] walkdir::Error),

    /// 配置文件解析错误
    #[error("配置解析错误: {0}")]
    Config(#[from] serde_json::Error),
}

impl DataError {
    /// 是否属于配置类错误（构造阶段即可发现）
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingSplitFolder { .. }
                | Self::AmbiguousSplitFolder { .. }
                | Self::UnknownOrgan(_)
                | Self::UnknownScanType(_)
                | Self::UnknownMode(_)
                | Self::UnknownDiseaseTag { .. }
                | Self::UnsupportedOrgan(_)
                | Self::MissingLabelSource(_)
                | Self::LabelOutOfRange { .. }
                | Self::VocabularyMismatch { .. }
                | Self::InvalidBatchSize
                | Self::TransformStage { .. }
                | Self::ShapeMismatch { .. }
                | Self::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
