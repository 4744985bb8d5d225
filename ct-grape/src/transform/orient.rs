//! 旋转与翻转.
//!
//! 旋转总是返回独立拷贝; 翻转可按调用者要求返回零拷贝视图或独立拷贝,
//! 由 [`CowArray`] 承载两种情形.

use super::{TransformError, TransformResult};
use ndarray::{
    Array2, Array3, ArrayView, ArrayView2, ArrayView3, Axis, CowArray, Dimension, Ix2, Ix3,
};

/// 顺时针旋转 2D 图像. `deg` 必须是 90 的整数倍, 允许为负或超过 360.
///
/// 角度先按 360 归一化, 归一化后为 0 时返回原图拷贝.
pub fn rotate<T: Clone>(img: ArrayView2<'_, T>, deg: i32) -> TransformResult<Array2<T>> {
    match normalize_deg(deg)? {
        0 => Ok(img.to_owned()),
        90 => {
            // 顺时针 90 度: 先上下翻转再转置.
            let mut v = img;
            v.invert_axis(Axis(0));
            Ok(v.reversed_axes().to_owned())
        }
        180 => {
            let mut v = img;
            v.invert_axis(Axis(0));
            v.invert_axis(Axis(1));
            Ok(v.to_owned())
        }
        270 => {
            // 逆时针 90 度: 先转置再上下翻转.
            let mut v = img.reversed_axes();
            v.invert_axis(Axis(0));
            Ok(v.to_owned())
        }
        _ => unreachable!(),
    }
}

/// 对体数据的每个切片 (axis 1-2 平面) 做同一顺时针旋转.
pub fn rotate_stack<T: Clone>(volume: ArrayView3<'_, T>, deg: i32) -> TransformResult<Array3<T>> {
    match normalize_deg(deg)? {
        0 => Ok(volume.to_owned()),
        90 => {
            let mut v = volume;
            v.invert_axis(Axis(1));
            Ok(v.permuted_axes([0, 2, 1]).to_owned())
        }
        180 => {
            let mut v = volume;
            v.invert_axis(Axis(1));
            v.invert_axis(Axis(2));
            Ok(v.to_owned())
        }
        270 => {
            let mut v = volume.permuted_axes([0, 2, 1]);
            v.invert_axis(Axis(1));
            Ok(v.to_owned())
        }
        _ => unreachable!(),
    }
}

/// 把任意角度归一化到 `{0, 90, 180, 270}`, 非 90 倍数立即报错.
#[inline]
fn normalize_deg(deg: i32) -> TransformResult<i32> {
    if deg % 90 != 0 {
        return Err(TransformError::BadRotation(deg));
    }
    Ok(deg.rem_euclid(360))
}

/// 垂直翻转 (行逆序).
///
/// `copy == false` 时返回借用原数据的零拷贝视图, `copy == true` 时返回
/// 独立拷贝. 两种情形下逻辑内容一致.
pub fn vertical_flip<T: Clone>(img: ArrayView2<'_, T>, copy: bool) -> CowArray<'_, T, Ix2> {
    flipped(img, Axis(0), copy)
}

/// 水平翻转 (列逆序). 视图 / 拷贝语义同 [`vertical_flip`].
pub fn horizontal_flip<T: Clone>(img: ArrayView2<'_, T>, copy: bool) -> CowArray<'_, T, Ix2> {
    flipped(img, Axis(1), copy)
}

/// 切片序翻转 (axis 0 逆序), 各切片内容不变.
/// 视图 / 拷贝语义同 [`vertical_flip`].
pub fn stack_flip<T: Clone>(volume: ArrayView3<'_, T>, copy: bool) -> CowArray<'_, T, Ix3> {
    flipped(volume, Axis(0), copy)
}

/// 逆序指定轴. 视图情形仅翻转步长, 不移动数据.
fn flipped<T: Clone, D: Dimension>(
    a: ArrayView<'_, T, D>,
    axis: Axis,
    copy: bool,
) -> CowArray<'_, T, D> {
    let mut v = a;
    v.invert_axis(axis);
    if copy {
        v.to_owned().into()
    } else {
        v.into()
    }
}
