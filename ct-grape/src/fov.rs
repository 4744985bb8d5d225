//! 有效 FOV (field of view) 半径推导与圆形裁剪.
//!
//! 圆轨道锥束扫描中, 只有以旋转中心为圆心的某个圆内的体素才会在所有投影
//! 角度被射线覆盖. 本模块由扫描几何推导该圆的像素半径, 并提供按半径把
//! 圆外体素置为填充值的裁剪操作.

use crate::{Idx2d, Idx2dF, Idx3d};
use itertools::izip;
use ndarray::{Array2, Array3, ArrayView3};
use ordered_float::OrderedFloat;

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use ndarray::Axis;
        use rayon::iter::{IntoParallelIterator, ParallelIterator};
    }
}

/// 圆周采样的弧度步长. 整圆约 629 个点.
const DRAW_STEP_RAD: f64 = 0.01;

/// FOV 操作的运行时错误.
#[derive(Clone, Debug, PartialEq)]
pub enum FovError {
    /// 几何长度参数必须为正且有限. 载荷为 (参数名, 实际值).
    NonPositiveParam(&'static str, f64),

    /// 裁剪半径必须 >= 1. 载荷为实际值.
    InvalidRadius(usize),
}

/// FOV 操作结果.
pub type FovResult<T> = Result<T, FovError>;

/// 求重建体数据中有效圆形 FOV 的半径, 以重建像素为单位.
///
/// # 几何参数
///
/// 1. `sod`: source object distance, 射线源到旋转中心的距离.
/// 2. `sdd`: source detector distance, 射线源到探测器的距离.
/// 3. `det_width`: 探测器总宽度, 即探元个数乘以单个探元宽度.
/// 4. `recon_pix_size`: 重建图像单个像素对应的物理尺寸.
///
/// 四个参数必须使用同一长度单位 (推荐 mm), 返回值与单位选择无关.
///
/// # 算法
///
/// 把探测器足迹分别按弧 / 平面 / 切线三种模型换算到旋转中心处, 得到三个
/// 独立的半径估计, 返回三者的最小值. 对物理合法的几何, 三个估计满足
/// 切线 <= 弧 <= 平面 (即 `sin x <= x <= tan x`), 但这里不依赖该性质,
/// 始终取三者最小.
///
/// 任一参数非正或非有限时返回 [`FovError::NonPositiveParam`].
pub fn fov_crop_radius(sod: f64, sdd: f64, det_width: f64, recon_pix_size: f64) -> FovResult<f64> {
    let named = [
        ("sod", sod),
        ("sdd", sdd),
        ("det_width", det_width),
        ("recon_pix_size", recon_pix_size),
    ];
    for (name, value) in named {
        if !value.is_finite() || value <= 0.0 {
            return Err(FovError::NonPositiveParam(name, value));
        }
    }

    let half_dw = det_width / 2.0;
    let l = half_dw.hypot(sdd);

    // 弧模型.
    let arc = sod * (half_dw / l).asin() / recon_pix_size;

    // 平面模型.
    let flat = sod / (sdd / det_width) / 2.0 / recon_pix_size;

    // 切线模型.
    let tangent = sod / (l / half_dw) / recon_pix_size;

    // 数组非空, 可直接 unwrap.
    let min = [arc, flat, tangent]
        .into_iter()
        .map(OrderedFloat)
        .min()
        .unwrap();
    Ok(min.0)
}

/// 对体数据做圆形 FOV 裁剪: 圆外体素全部置为 `fill`, 所有切片共用同一掩码.
///
/// 圆心取切片几何中心 `(n / 2 - 0.5, m / 2 - 0.5)` (像素中心位于整数格点,
/// 偶数边长时圆心落在半整数处). 到圆心的平方距离严格大于
/// `radius * radius` 的像素视为圆外, 恰好落在半径上的像素保留.
///
/// 返回新的体数据, 不修改输入. `radius` 必须 >= 1, 否则返回
/// [`FovError::InvalidRadius`].
pub fn fov_crop<T: Copy>(
    volume: ArrayView3<'_, T>,
    radius: usize,
    fill: T,
) -> FovResult<Array3<T>> {
    let outside = outside_mask(volume.dim(), radius)?;
    let mut cropped = volume.to_owned();
    for mut sli in cropped.outer_iter_mut() {
        for (pix, out) in izip!(sli.iter_mut(), outside.iter()) {
            if *out {
                *pix = fill;
            }
        }
    }
    Ok(cropped)
}

/// 借助 `rayon`, 并行地对每个切片实施圆形 FOV 裁剪.
///
/// 行为与 [`fov_crop`] 完全一致.
#[cfg(feature = "rayon")]
pub fn par_fov_crop<T>(volume: ArrayView3<'_, T>, radius: usize, fill: T) -> FovResult<Array3<T>>
where
    T: Copy + Send + Sync,
{
    let outside = outside_mask(volume.dim(), radius)?;
    let mut cropped = volume.to_owned();
    cropped
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .for_each(|mut sli| {
            for (pix, out) in izip!(sli.iter_mut(), outside.iter()) {
                if *out {
                    *pix = fill;
                }
            }
        });
    Ok(cropped)
}

/// 构建与切片同形状的圆外掩码. 掩码对所有切片共用.
fn outside_mask((_, n, m): Idx3d, radius: usize) -> FovResult<Array2<bool>> {
    if radius < 1 {
        return Err(FovError::InvalidRadius(radius));
    }
    let center_h = n as f64 / 2.0 - 0.5;
    let center_w = m as f64 / 2.0 - 0.5;
    let r2 = (radius * radius) as f64;
    Ok(Array2::from_shape_fn((n, m), |(h, w)| {
        let x = h as f64 - center_h;
        let y = w as f64 - center_w;
        x * x + y * y > r2
    }))
}

/// 以固定角步长 (0.01 rad) 采样圆周, 返回按角度递增排列的 `(x, y)` 点列.
///
/// `center` 为 `None` 时取 `(shape.0 / 2, shape.1 / 2)`. 该函数只服务于
/// 裁剪结果的可视化叠加, 不参与任何数值流程.
///
/// `radius` 必须 >= 1, 否则返回 [`FovError::InvalidRadius`].
pub fn draw_circle(shape: Idx2d, radius: usize, center: Option<Idx2d>) -> FovResult<Vec<Idx2dF>> {
    if radius < 1 {
        return Err(FovError::InvalidRadius(radius));
    }
    let (ch, cw) = center.unwrap_or((shape.0 / 2, shape.1 / 2));
    let r = radius as f64;
    let points = (0..)
        .map(|i| i as f64 * DRAW_STEP_RAD)
        .take_while(|theta| *theta < std::f64::consts::TAU)
        .map(|theta| (ch as f64 + r * theta.cos(), cw as f64 + r * theta.sin()))
        .collect();
    Ok(points)
}
