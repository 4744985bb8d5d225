//! 按轴下采样 (binning).
//!
//! 沿指定轴每 `rate` 个样本保留第一个, 即下标 `0, rate, 2 * rate, ...`
//! 处的样本. 不做任何平均或滤波.

use super::{TransformError, TransformResult};
use ndarray::{s, Array2, Array3, ArrayView2, ArrayView3};

/// 下采样所沿的轴.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BinAxis {
    /// 列方向 (平面内水平, 最后一轴).
    X,

    /// 行方向 (平面内垂直).
    Y,

    /// 切片堆叠方向 (仅 3D).
    Z,
}

/// 对 2D 图像按 `rate` 下采样.
///
/// `rate` 必须 >= 1, `rate == 1` 时返回原图拷贝; 2D 图像没有 z 轴,
/// `axis` 取 [`BinAxis::Z`] 时返回 [`TransformError::NoZAxis`].
pub fn binning<T: Clone>(
    img: ArrayView2<'_, T>,
    rate: usize,
    axis: BinAxis,
) -> TransformResult<Array2<T>> {
    let step = check_rate(rate)?;
    let sampled = match axis {
        BinAxis::X => img.slice(s![.., ..;step]),
        BinAxis::Y => img.slice(s![..;step, ..]),
        BinAxis::Z => return Err(TransformError::NoZAxis),
    };
    Ok(sampled.to_owned())
}

/// 对体数据按 `rate` 下采样. 轴含义: X 列, Y 行, Z 切片.
pub fn binning_3d<T: Clone>(
    volume: ArrayView3<'_, T>,
    rate: usize,
    axis: BinAxis,
) -> TransformResult<Array3<T>> {
    let step = check_rate(rate)?;
    let sampled = match axis {
        BinAxis::X => volume.slice(s![.., .., ..;step]),
        BinAxis::Y => volume.slice(s![.., ..;step, ..]),
        BinAxis::Z => volume.slice(s![..;step, .., ..]),
    };
    Ok(sampled.to_owned())
}

#[inline]
fn check_rate(rate: usize) -> TransformResult<isize> {
    if rate == 0 {
        return Err(TransformError::BadRate(rate));
    }
    Ok(rate as isize)
}
