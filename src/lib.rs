//! # Scan Dataset
//!
//! `scan_dataset`把按“划分/疾病”文件夹组织的医学影像（脑部 MRI、胸部 X 光等）
//! 整理成带标签的数据集：从文件夹名提取疾病标签，补全器官与扫描类型等元数据并写出 CSV 清单，
//! 再按器官和模式构造灰度化、数据增强、归一化的变换流水线，最终以批量张量的形式提供给训练代码。
//!

pub mod data;
pub mod errors;
pub mod tensor;
pub mod vision;
