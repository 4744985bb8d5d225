//! 2D 图像序列与 3D 体数据的互转适配.
//!
//! 上游代码常以 `Vec<Array2>` 的形式携带一组投影或切片. 本模块在 API 边界
//! 把这类序列沿新的 axis 0 堆叠成体数据, 之后所有算子都只面对 3D 数组;
//! 拆分方向返回每层的独立拷贝.

use crate::Idx2d;
use ndarray::{Array2, Array3, ArrayView3, Axis};

/// 堆叠操作的运行时错误.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StackError {
    /// 输入序列为空.
    Empty,

    /// 序列中某张图像的形状与首张不一致. 载荷为 (序号, 该图形状, 首张形状).
    ShapeMismatch(usize, Idx2d, Idx2d),
}

/// 把一组同形状的 2D 图像堆叠成体数据, 第 `i` 张图成为第 `i` 层切片.
///
/// 全部形状校验通过后才分配输出, 失败时不产生部分结果.
pub fn stack_images<T: Clone>(images: &[Array2<T>]) -> Result<Array3<T>, StackError> {
    let Some(first) = images.first() else {
        return Err(StackError::Empty);
    };
    let expected = first.dim();
    for (index, img) in images.iter().enumerate() {
        if img.dim() != expected {
            return Err(StackError::ShapeMismatch(index, img.dim(), expected));
        }
    }
    let views: Vec<_> = images.iter().map(|img| img.view()).collect();
    // 形状已逐一校验, 堆叠不会失败, 可直接 unwrap.
    Ok(ndarray::stack(Axis(0), &views).unwrap())
}

/// 把体数据拆成逐层的 2D 独立拷贝, 与 [`stack_images`] 互逆.
pub fn split_images<T: Clone>(volume: ArrayView3<'_, T>) -> Vec<Array2<T>> {
    volume.outer_iter().map(|sli| sli.to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_stack_empty() {
        let images: Vec<Array2<f32>> = vec![];
        assert_eq!(stack_images(&images).unwrap_err(), StackError::Empty);
    }

    #[test]
    fn test_stack_shape_mismatch() {
        let images = vec![
            Array2::<u8>::zeros((4, 4)),
            Array2::<u8>::zeros((4, 4)),
            Array2::<u8>::zeros((4, 5)),
        ];
        assert_eq!(
            stack_images(&images).unwrap_err(),
            StackError::ShapeMismatch(2, (4, 5), (4, 4))
        );
    }

    /// 堆叠保持层序与像素值, 拆分后恢复原序列.
    #[test]
    fn test_stack_split_round_trip() {
        let images: Vec<Array2<i32>> = (0..3)
            .map(|s| Array2::from_shape_fn((2, 4), |(i, j)| (s * 1000 + i * 10 + j) as i32))
            .collect();
        let volume = stack_images(&images).unwrap();
        assert_eq!(volume.dim(), (3, 2, 4));
        for ((s, i, j), &v) in volume.indexed_iter() {
            assert_eq!(v, images[s][(i, j)]);
        }

        let split = split_images(volume.view());
        assert_eq!(split, images);
    }

    /// 单张图也构成合法体数据.
    #[test]
    fn test_stack_single_image() {
        let images = vec![Array2::<f64>::ones((3, 3))];
        let volume = stack_images(&images).unwrap();
        assert_eq!(volume.dim(), (1, 3, 3));
    }

    /// 拆分结果是独立拷贝, 修改不影响原体数据.
    #[test]
    fn test_split_is_owned() {
        let volume = ndarray::Array3::<f32>::zeros((2, 2, 2));
        let mut split = split_images(volume.view());
        split[0][(0, 0)] = 7.0;
        assert_eq!(volume[(0, 0, 0)], 0.0);
    }
}
