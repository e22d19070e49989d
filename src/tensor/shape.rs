use super::Tensor;
use crate::errors::TensorError;

impl Tensor {
    /// 在最前面新增一个维度，把多个形状完全一致的张量堆叠起来。
    /// 组批时`n`个`[C, H, W]`得到`[n, C, H, W]`；标量堆叠得到`[n]`。
    ///
    /// # Panics
    /// `tensors`为空或形状不一致时
    pub fn stack(tensors: &[&Self]) -> Self {
        assert!(!tensors.is_empty(), "{}", TensorError::EmptyList);

        let first_shape = tensors[0].shape();
        assert!(
            tensors.iter().all(|t| t.shape() == first_shape),
            "{}",
            TensorError::InconsistentShape
        );

        let data = tensors
            .iter()
            .flat_map(|t| t.data.iter().copied())
            .collect::<Vec<_>>();

        let mut shape = first_shape.to_vec();
        shape.insert(0, tensors.len());
        Self::from_vec(data, &shape)
    }
}
