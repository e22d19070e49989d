use thiserror::Error;

/// 张量构造、堆叠时的错误。张量层把这些当作编程错误，只用作 panic 信息
#[derive(Error, Debug, PartialEq)]
pub enum TensorError {
    #[error("数据长度{len}与形状{shape:?}不符")]
    DataLenMismatch { len: usize, shape: Vec<usize> },
    #[error("张量列表为空")]
    EmptyList,
    #[error("张量形状不一致")]
    InconsistentShape,
}
