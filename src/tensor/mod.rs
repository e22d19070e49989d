/*
 * @Description  : 极简的张量类型，仅承载数据集流水线所需的功能：
 *                 构造、形状查询、堆叠（组批）、argmax 以及与 image 库之间的互转。
 *                 数值计算交给下游模型框架，这里不实现任何算子。
 */

use ndarray::{Array, ArrayViewD, IxDyn};
use std::ops::Index;

use crate::errors::TensorError;

mod image;
mod shape;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 图像张量约定为`[C, H, W]`（经`ToTensor`之后）或`[H, W]`/`[H, W, C]`（原始像素）。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量，`data`的长度必须和`shape`中所有元素的乘积相等；
    /// 若为标量，`shape`可以是`[]`。
    ///
    /// # Panics
    /// `data`长度与`shape`不符时
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        Self::from_vec(data.to_vec(), shape)
    }

    /// 与`new`相同，但直接接管`Vec`的所有权，避免一次拷贝
    pub fn from_vec(data: Vec<f32>, shape: &[usize]) -> Tensor {
        let expected: usize = shape.iter().product();
        assert_eq!(
            data.len(),
            expected,
            "{}",
            TensorError::DataLenMismatch {
                len: data.len(),
                shape: shape.to_vec(),
            }
        );
        // 长度已校验，from_shape_vec 不会失败
        let data = Array::from_shape_vec(IxDyn(shape), data)
            .unwrap_or_else(|_| Array::zeros(IxDyn(shape)));
        Tensor { data }
    }
}

impl Tensor {
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn view(&self) -> ArrayViewD<'_, f32> {
        self.data.view()
    }

    /// 按行优先（C order）顺序拷贝出全部元素
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// 按行优先顺序遍历时最大元素的下标；相同最大值取最靠前者。空张量返回`None`
    pub fn argmax(&self) -> Option<usize> {
        self.data
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((i, v)),
            })
            .map(|(i, _)| i)
    }

    /// 最小、最大元素；空张量返回`None`
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

impl<const N: usize> Index<[usize; N]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; N]) -> &Self::Output {
        &self.data[&index[..]]
    }
}
