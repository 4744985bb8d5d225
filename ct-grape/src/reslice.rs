//! 解剖方向重切片.
//!
//! 体数据在矢状位 / 冠状位 / 横断位三种观察方向之间的转换只是轴次序变换,
//! 不涉及像素重采样. 方向对到轴排列的映射是一张固定查找表, 底层由 2D / 3D
//! 转置原语实现, 全程零拷贝.

use ndarray::{ArrayView2, ArrayView3};
use std::str::FromStr;

/// 重切片操作的运行时错误.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResliceError {
    /// 未知的解剖方向名. 载荷为调用者提供的原始字符串.
    UnknownDirection(String),

    /// 2D 轴次序不是 `{0, 1}` 的排列. 载荷为实际值.
    BadAxisOrder2([usize; 2]),

    /// 3D 轴次序不是 `{0, 1, 2}` 的排列. 载荷为实际值.
    BadAxisOrder3([usize; 3]),
}

/// 解剖观察方向.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    /// 矢状位, 沿左右方向观察.
    Sagittal,

    /// 冠状位, 沿前后方向观察.
    Coronal,

    /// 横断位, 沿头脚方向观察.
    Transverse,
}

impl FromStr for Direction {
    type Err = ResliceError;

    /// 仅接受全小写的 `"sagittal"` / `"coronal"` / `"transverse"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sagittal" => Ok(Self::Sagittal),
            "coronal" => Ok(Self::Coronal),
            "transverse" => Ok(Self::Transverse),
            other => Err(ResliceError::UnknownDirection(other.to_string())),
        }
    }
}

/// 查询 `(from, to)` 方向对对应的轴排列.
///
/// 返回值 `p` 的含义: 结果体数据的第 `i` 轴取自输入体数据的第 `p[i]` 轴.
/// `from == to` 时为恒等排列. 注意该映射不满足对称性, 例如矢状位到冠状位
/// 与冠状位到矢状位是互逆而非相同的排列.
#[inline]
pub const fn permutation(from: Direction, to: Direction) -> [usize; 3] {
    use Direction::*;
    match (from, to) {
        (Sagittal, Sagittal) | (Coronal, Coronal) | (Transverse, Transverse) => [0, 1, 2],
        (Sagittal, Coronal) | (Sagittal, Transverse) | (Transverse, Sagittal) => [2, 0, 1],
        (Coronal, Sagittal) => [1, 2, 0],
        (Coronal, Transverse) | (Transverse, Coronal) => [0, 2, 1],
    }
}

/// 把 `from` 方向堆叠的体数据重新表达为 `to` 方向堆叠.
///
/// 仅调整轴次序, 返回借用原数据的视图; 需要独立数据时由调用者自行
/// `to_owned`.
pub fn permute<T>(volume: ArrayView3<'_, T>, from: Direction, to: Direction) -> ArrayView3<'_, T> {
    // 查找表内的排列恒合法, 可直接 unwrap.
    transpose_3d(volume, permutation(from, to)).unwrap()
}

/// 按 `order` 重排 2D 数组的轴. `order` 必须是 `{0, 1}` 的排列.
pub fn transpose_2d<T>(
    img: ArrayView2<'_, T>,
    order: [usize; 2],
) -> Result<ArrayView2<'_, T>, ResliceError> {
    if !is_permutation(&order) {
        return Err(ResliceError::BadAxisOrder2(order));
    }
    Ok(img.permuted_axes(order))
}

/// 按 `order` 重排 3D 数组的轴. `order` 必须是 `{0, 1, 2}` 的排列.
pub fn transpose_3d<T>(
    volume: ArrayView3<'_, T>,
    order: [usize; 3],
) -> Result<ArrayView3<'_, T>, ResliceError> {
    if !is_permutation(&order) {
        return Err(ResliceError::BadAxisOrder3(order));
    }
    Ok(volume.permuted_axes(order))
}

/// `order` 是否恰好包含 `0..N` 各一次.
fn is_permutation<const N: usize>(order: &[usize; N]) -> bool {
    let mut seen = [false; N];
    for &axis in order {
        if axis >= N || seen[axis] {
            return false;
        }
        seen[axis] = true;
    }
    true
}
