//! 封闭词表：器官、扫描类型、模式、数据划分以及各器官的疾病标签表
//!
//! 疾病编码在所有器官间共享同一个 one-hot 空间（[`DISEASE_CLASSES`] 个槽位），
//! 因此脑部占用 0~3，肺部占用 4~5。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::data::error::{DataError, Result};

/// 疾病标签的 one-hot 宽度
pub const DISEASE_CLASSES: usize = 8;
/// 器官标签的 one-hot 宽度
pub const ORGAN_CLASSES: usize = 3;
/// 扫描类型标签的 one-hot 宽度
pub const SCAN_CLASSES: usize = 3;

const BRAIN_DISEASES: [(&str, usize); 4] = [
    ("notumor", 0),
    ("glioma", 1),
    ("meningioma", 2),
    ("pituitary", 3),
];

const LUNG_DISEASES: [(&str, usize); 2] = [("normal", 4), ("pneumonia", 5)];

/// 被扫描的器官
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Organ {
    Brain,
    Lungs,
    Breast,
}

impl Organ {
    pub const ALL: [Organ; 3] = [Organ::Brain, Organ::Lungs, Organ::Breast];

    /// 写入清单的器官编码
    pub fn code(self) -> usize {
        match self {
            Organ::Brain => 0,
            Organ::Lungs => 1,
            Organ::Breast => 2,
        }
    }

    /// 数据增强表、日志里使用的大写键
    pub fn key(self) -> &'static str {
        match self {
            Organ::Brain => "BRAIN",
            Organ::Lungs => "LUNGS",
            Organ::Breast => "BREAST",
        }
    }
}

impl FromStr for Organ {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brain" => Ok(Organ::Brain),
            "lungs" => Ok(Organ::Lungs),
            "breast" => Ok(Organ::Breast),
            _ => Err(DataError::UnknownOrgan(s.to_string())),
        }
    }
}

impl TryFrom<String> for Organ {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Organ> for String {
    fn from(organ: Organ) -> Self {
        organ.key().to_ascii_lowercase()
    }
}

impl fmt::Display for Organ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 成像方式。`rmn`是`mri`的别名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScanType {
    Mri,
    Xray,
    Ct,
}

impl ScanType {
    pub fn code(self) -> usize {
        match self {
            ScanType::Mri => 0,
            ScanType::Xray => 1,
            ScanType::Ct => 2,
        }
    }
}

impl FromStr for ScanType {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rmn" | "mri" => Ok(ScanType::Mri),
            "xray" => Ok(ScanType::Xray),
            "ct" => Ok(ScanType::Ct),
            _ => Err(DataError::UnknownScanType(s.to_string())),
        }
    }
}

impl TryFrom<String> for ScanType {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ScanType> for String {
    fn from(scan: ScanType) -> Self {
        match scan {
            ScanType::Mri => "mri",
            ScanType::Xray => "xray",
            ScanType::Ct => "ct",
        }
        .to_string()
    }
}

/// 加载模式：`Train`启用数据增强并打乱，`Val`/`Test`只做归一化且不打乱
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    #[default]
    Train,
    Val,
    Test,
}

impl Mode {
    pub fn is_train(self) -> bool {
        self == Mode::Train
    }

    /// 该模式读取的数据划分：验证与测试都读取 test 划分
    pub fn split(self) -> Split {
        match self {
            Mode::Train => Split::Train,
            Mode::Val | Mode::Test => Split::Test,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Train => "train",
            Mode::Val => "val",
            Mode::Test => "test",
        }
    }
}

impl FromStr for Mode {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "train" => Ok(Mode::Train),
            "val" => Ok(Mode::Val),
            "test" => Ok(Mode::Test),
            _ => Err(DataError::UnknownMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.as_str().to_string()
    }
}

/// 数据划分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    pub const ALL: [Split; 2] = [Split::Train, Split::Test];

    /// 文件夹匹配关键字，同时也是清单文件名前缀
    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }

    /// 清单中`Dataset Type`列的取值：0 为训练集，1 为测试集
    pub fn code(self) -> usize {
        match self {
            Split::Train => 0,
            Split::Test => 1,
        }
    }

    pub fn from_code(code: usize) -> Option<Self> {
        match code {
            0 => Some(Split::Train),
            1 => Some(Split::Test),
            _ => None,
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 疾病标签词表：小写文件夹名 → 疾病编码。
/// 作为不可变的配置表传给标签提取器，测试可以换成自己的小词表。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseVocabulary {
    name: String,
    tags: BTreeMap<String, usize>,
}

impl DiseaseVocabulary {
    pub fn new<I, S>(name: &str, tags: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: AsRef<str>,
    {
        Self {
            name: name.to_string(),
            tags: tags
                .into_iter()
                .map(|(tag, code)| (tag.as_ref().to_lowercase(), code))
                .collect(),
        }
    }

    pub fn brain() -> Self {
        Self::new("brain", BRAIN_DISEASES)
    }

    pub fn lungs() -> Self {
        Self::new("lungs", LUNG_DISEASES)
    }

    /// 器官对应的内置词表；没有文件夹标签的器官返回`None`
    pub fn for_organ(organ: Organ) -> Option<Self> {
        match organ {
            Organ::Brain => Some(Self::brain()),
            Organ::Lungs => Some(Self::lungs()),
            Organ::Breast => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 按不区分大小写的标签名查找编码
    pub fn code(&self, tag: &str) -> Option<usize> {
        self.tags.get(&tag.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.tags.iter().map(|(tag, code)| (tag.as_str(), *code))
    }

    /// 校验所有编码都能放进`num_classes`宽的 one-hot 向量
    pub fn validate(&self, num_classes: usize) -> Result<()> {
        match self.tags.values().find(|&&code| code >= num_classes) {
            Some(&code) => Err(DataError::VocabularyMismatch {
                vocabulary: self.name.clone(),
                code,
                num_classes,
            }),
            None => Ok(()),
        }
    }
}

/// 启动时校验内置词表与各维度的类别数常量是否一致
pub fn validate_vocabularies() -> Result<()> {
    DiseaseVocabulary::brain().validate(DISEASE_CLASSES)?;
    DiseaseVocabulary::lungs().validate(DISEASE_CLASSES)?;

    for organ in Organ::ALL {
        if organ.code() >= ORGAN_CLASSES {
            return Err(DataError::VocabularyMismatch {
                vocabulary: "organ".to_string(),
                code: organ.code(),
                num_classes: ORGAN_CLASSES,
            });
        }
    }
    for scan in [ScanType::Mri, ScanType::Xray, ScanType::Ct] {
        if scan.code() >= SCAN_CLASSES {
            return Err(DataError::VocabularyMismatch {
                vocabulary: "scan".to_string(),
                code: scan.code(),
                num_classes: SCAN_CLASSES,
            });
        }
    }
    Ok(())
}
