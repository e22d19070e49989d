use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::LabelMap;
use crate::data::error::{DataError, Result};
use crate::data::vocab::{DISEASE_CLASSES, ORGAN_CLASSES, Organ, SCAN_CLASSES, ScanType, Split};
use crate::tensor::Tensor;

/// 将类别索引转换为 one-hot 编码：除`label`位置为1.0外其余全为0.0
///
/// # 示例
/// ```ignore
/// assert_eq!(one_hot_encode(2, 4)?, vec![0.0, 0.0, 1.0, 0.0]);
/// ```
pub fn one_hot_encode(label: usize, num_classes: usize) -> Result<Vec<f32>> {
    if label >= num_classes {
        return Err(DataError::LabelOutOfRange { label, num_classes });
    }
    let mut encoded = vec![0.0; num_classes];
    encoded[label] = 1.0;
    Ok(encoded)
}

/// one-hot 解码（argmax），空向量返回`None`
pub fn one_hot_decode(encoded: &[f32]) -> Option<usize> {
    Tensor::new(encoded, &[encoded.len()]).argmax()
}

/// 清单中标签字段的编码方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// 整数编码
    #[default]
    Plain,
    /// 定长 one-hot 向量
    OneHot,
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "plain" => Ok(Encoding::Plain),
            "one_hot" | "onehot" => Ok(Encoding::OneHot),
            other => Err(format!("未知的编码方式: {other}（可选：plain、one_hot）")),
        }
    }
}

/// 单个标签字段的值
#[derive(Debug, Clone, PartialEq)]
pub enum LabelValue {
    Code(usize),
    OneHot(Vec<f32>),
}

impl LabelValue {
    fn encode(code: usize, num_classes: usize, encoding: Encoding) -> Result<Self> {
        match encoding {
            Encoding::Plain => Ok(LabelValue::Code(code)),
            Encoding::OneHot => Ok(LabelValue::OneHot(one_hot_encode(code, num_classes)?)),
        }
    }

    /// 整数编码；one-hot 形式按 argmax 解码
    pub fn code(&self) -> Option<usize> {
        match self {
            LabelValue::Code(code) => Some(*code),
            LabelValue::OneHot(encoded) => one_hot_decode(encoded),
        }
    }
}

/// 整数写成`3`，one-hot 写成`[0.0, 0.0, 0.0, 1.0]`
impl fmt::Display for LabelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelValue::Code(code) => write!(f, "{code}"),
            LabelValue::OneHot(encoded) => {
                write!(f, "[")?;
                for (i, v) in encoded.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v:?}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl FromStr for LabelValue {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(inner) = s.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            let encoded = inner
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| v.parse::<f32>().map_err(|e| format!("{v}: {e}")))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(LabelValue::OneHot(encoded))
        } else {
            s.parse::<usize>()
                .map(LabelValue::Code)
                .map_err(|e| format!("{s}: {e}"))
        }
    }
}

/// 一张图像的完整标签元数据
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    pub image_path: PathBuf,
    pub organ: LabelValue,
    pub disease: LabelValue,
    pub scan: LabelValue,
    pub split: Split,
}

/// 图像路径 → 标签元数据
pub type RecordMap = BTreeMap<PathBuf, LabelRecord>;

/// 给每个疾病标签附上器官、扫描类型编码，可选 one-hot 编码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataEncoder {
    organ_code: usize,
    scan_code: usize,
    encoding: Encoding,
}

impl MetadataEncoder {
    pub fn new(organ: Organ, scan_type: ScanType, encoding: Encoding) -> Self {
        Self {
            organ_code: organ.code(),
            scan_code: scan_type.code(),
            encoding,
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn encode(&self, labels: &LabelMap, split: Split) -> Result<RecordMap> {
        labels
            .iter()
            .map(|(path, &disease)| {
                let record = LabelRecord {
                    image_path: path.clone(),
                    organ: LabelValue::encode(self.organ_code, ORGAN_CLASSES, self.encoding)?,
                    disease: LabelValue::encode(disease, DISEASE_CLASSES, self.encoding)?,
                    scan: LabelValue::encode(self.scan_code, SCAN_CLASSES, self.encoding)?,
                    split,
                };
                Ok((path.clone(), record))
            })
            .collect()
    }
}
