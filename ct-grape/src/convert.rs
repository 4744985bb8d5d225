//! CT 值 (HU) 与投影域数值转换.
//!
//! 本模块的转换都是逐元素线性 / 指数映射, 对 2D 与 3D 输入统一由维度类型
//! 参数静态区分, 数值类型覆盖 `f32` / `f64`.

use crate::Idx2d;
use itertools::izip;
use ndarray::{Array, Array2, Array3, ArrayView, ArrayView2, ArrayView3, Dimension};
use num::Float;

/// 数值转换的参数错误.
#[derive(Clone, Debug, PartialEq)]
pub enum ConvertError {
    /// 水的线性衰减系数必须为正且有限. 载荷为实际值.
    BadMuWater(f64),

    /// HU 标度系数必须非零且有限. 载荷为实际值.
    BadScale(f64),

    /// 线性重标定斜率必须非零且有限. 载荷为实际值.
    BadSlope(f64),

    /// 线性重标定截距必须有限. 载荷为实际值.
    BadIntercept(f64),

    /// 空气参考图的形状与 postlog 图的平面形状不一致.
    /// 载荷为 (air 形状, postlog 平面形状).
    AirShapeMismatch(Idx2d, Idx2d),
}

/// 错误载荷统一以 f64 表示.
#[inline]
fn payload<F: Float>(v: F) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}

fn check_mu_water<F: Float>(mu_water: F) -> Result<(), ConvertError> {
    if !mu_water.is_finite() || mu_water <= F::zero() {
        return Err(ConvertError::BadMuWater(payload(mu_water)));
    }
    Ok(())
}

fn check_scale<F: Float>(b: F) -> Result<(), ConvertError> {
    if !b.is_finite() || b == F::zero() {
        return Err(ConvertError::BadScale(payload(b)));
    }
    Ok(())
}

/// 把线性衰减系数 (μ) 图转换为 HU 图: `hu = (mu - mu_water) / mu_water * b`.
///
/// `mu_water` 为参考能量下水的线性衰减系数, 必须与 `image` 同单位;
/// `b` 为 HU 标度系数, 惯用取值 1000 ([`crate::consts::hu::SCALE`]).
pub fn mu_to_hu<F, D>(
    image: ArrayView<'_, F, D>,
    mu_water: F,
    b: F,
) -> Result<Array<F, D>, ConvertError>
where
    F: Float,
    D: Dimension,
{
    check_mu_water(mu_water)?;
    check_scale(b)?;
    Ok(image.mapv(|mu| (mu - mu_water) / mu_water * b))
}

/// 把 HU 图转换回线性衰减系数图: `mu = hu / b * mu_water + mu_water`.
///
/// 与 [`mu_to_hu`] 互逆 (精确到浮点舍入).
pub fn hu_to_mu<F, D>(
    image: ArrayView<'_, F, D>,
    mu_water: F,
    b: F,
) -> Result<Array<F, D>, ConvertError>
where
    F: Float,
    D: Dimension,
{
    check_mu_water(mu_water)?;
    check_scale(b)?;
    Ok(image.mapv(|hu| hu / b * mu_water + mu_water))
}

/// 撤销线性重标定 `hu = k * raw + b`, 即 `raw = (hu - b) / k`.
///
/// DICOM 惯例下 `b = -1000`, `k = 1`
/// ([`crate::consts::hu::RESCALE_INTERCEPT`] 与
/// [`crate::consts::hu::RESCALE_SLOPE`]).
pub fn hu_no_rescale<F, D>(
    image: ArrayView<'_, F, D>,
    b: F,
    k: F,
) -> Result<Array<F, D>, ConvertError>
where
    F: Float,
    D: Dimension,
{
    if !b.is_finite() {
        return Err(ConvertError::BadIntercept(payload(b)));
    }
    if !k.is_finite() || k == F::zero() {
        return Err(ConvertError::BadSlope(payload(k)));
    }
    Ok(image.mapv(|hu| (hu - b) / k))
}

/// 把单张 2D postlog 图像还原为原始投影: `proj = exp(-postlog) * air`.
///
/// `air` 为同形状的空气参考投影 (明场).
pub fn postlog_to_proj_2d<F: Float>(
    postlog: ArrayView2<'_, F>,
    air: ArrayView2<'_, F>,
) -> Result<Array2<F>, ConvertError> {
    check_air_shape(postlog.dim(), air.dim())?;
    let mut proj = postlog.to_owned();
    for (p, a) in izip!(proj.iter_mut(), air.iter()) {
        *p = (-*p).exp() * *a;
    }
    Ok(proj)
}

/// 把 postlog 体数据逐层还原为原始投影, 同一张 `air` 参考图作用于每一层.
pub fn postlog_to_proj<F: Float>(
    postlog: ArrayView3<'_, F>,
    air: ArrayView2<'_, F>,
) -> Result<Array3<F>, ConvertError> {
    let (_, h, w) = postlog.dim();
    check_air_shape((h, w), air.dim())?;
    let mut proj = postlog.to_owned();
    for mut sli in proj.outer_iter_mut() {
        for (p, a) in izip!(sli.iter_mut(), air.iter()) {
            *p = (-*p).exp() * *a;
        }
    }
    Ok(proj)
}

fn check_air_shape(plane: Idx2d, air: Idx2d) -> Result<(), ConvertError> {
    if plane != air {
        return Err(ConvertError::AirShapeMismatch(air, plane));
    }
    Ok(())
}
