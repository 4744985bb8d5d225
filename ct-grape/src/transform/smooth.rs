//! 高斯平滑.
//!
//! 可分离实现: 先沿列后沿行做一维卷积. 边界按 reflect-101 (以边缘像素为
//! 对称轴镜像, 不重复边缘) 处理; 未显式给出核大小时按 4σ 截断取最近奇数.

use super::{TransformError, TransformResult};
use crate::Idx2d;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3};

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use ndarray::Axis;
        use rayon::iter::{IntoParallelIterator, ParallelIterator};
    }
}

/// 高斯 σ 配置. 标量经 `From<f64>` 广播到两个轴.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Sigma {
    /// 两轴同 σ.
    Iso(f64),

    /// 按 (高, 宽) 方向分别给定 σ.
    PerAxis(f64, f64),
}

impl From<f64> for Sigma {
    fn from(sigma: f64) -> Self {
        Self::Iso(sigma)
    }
}

impl From<(f64, f64)> for Sigma {
    fn from((sigma_h, sigma_w): (f64, f64)) -> Self {
        Self::PerAxis(sigma_h, sigma_w)
    }
}

impl Sigma {
    /// 展开成 `(σ_h, σ_w)` 并校验为正且有限.
    fn per_axis(self) -> TransformResult<(f64, f64)> {
        let (sh, sw) = match self {
            Self::Iso(s) => (s, s),
            Self::PerAxis(sh, sw) => (sh, sw),
        };
        if !sh.is_finite() || sh <= 0.0 || !sw.is_finite() || sw <= 0.0 {
            return Err(TransformError::BadSigma(sh, sw));
        }
        Ok((sh, sw))
    }
}

/// 对 2D 图像做高斯平滑.
///
/// `sigma` 接受标量 (两轴同 σ) 或 `(σ_h, σ_w)` 元组; `ksize` 为
/// `(高, 宽)` 方向的核大小, 必须为正奇数, `None` 时按 4σ 截断自动推导.
///
/// σ 非正或非有限返回 [`TransformError::BadSigma`], 核大小非正奇数返回
/// [`TransformError::BadKernelSize`].
pub fn gaussian_smooth(
    img: ArrayView2<'_, f32>,
    sigma: impl Into<Sigma>,
    ksize: Option<Idx2d>,
) -> TransformResult<Array2<f32>> {
    let (kernel_h, kernel_w) = kernels(sigma.into(), ksize)?;
    Ok(smooth_slice(img, &kernel_h, &kernel_w))
}

/// 对体数据逐切片做高斯平滑, 所有切片共用同一组核.
pub fn gaussian_smooth_stack(
    volume: ArrayView3<'_, f32>,
    sigma: impl Into<Sigma>,
    ksize: Option<Idx2d>,
) -> TransformResult<Array3<f32>> {
    let (kernel_h, kernel_w) = kernels(sigma.into(), ksize)?;
    let mut out = volume.to_owned();
    for mut sli in out.outer_iter_mut() {
        let smoothed = smooth_slice(sli.view(), &kernel_h, &kernel_w);
        sli.assign(&smoothed);
    }
    Ok(out)
}

/// 借助 `rayon`, 并行逐切片高斯平滑.
///
/// 行为与 [`gaussian_smooth_stack`] 完全一致.
#[cfg(feature = "rayon")]
pub fn par_gaussian_smooth_stack(
    volume: ArrayView3<'_, f32>,
    sigma: impl Into<Sigma>,
    ksize: Option<Idx2d>,
) -> TransformResult<Array3<f32>> {
    let (kernel_h, kernel_w) = kernels(sigma.into(), ksize)?;
    let mut out = volume.to_owned();
    out.axis_iter_mut(Axis(0)).into_par_iter().for_each(|mut sli| {
        let smoothed = smooth_slice(sli.view(), &kernel_h, &kernel_w);
        sli.assign(&smoothed);
    });
    Ok(out)
}

/// 两个一维核先后作用于列 / 行方向.
fn smooth_slice(img: ArrayView2<'_, f32>, kernel_h: &[f64], kernel_w: &[f64]) -> Array2<f32> {
    let pass = convolve_cols(img, kernel_w);
    convolve_cols(pass.t(), kernel_h)
        .reversed_axes()
        .as_standard_layout()
        .to_owned()
}

/// 沿列方向 (axis 1) 一维卷积, 输出与输入同形状.
fn convolve_cols(img: ArrayView2<'_, f32>, kernel: &[f64]) -> Array2<f32> {
    let (h, w) = img.dim();
    let radius = (kernel.len() / 2) as isize;
    let mut out = Array2::zeros((h, w));
    for (src_row, mut dst_row) in img.outer_iter().zip(out.outer_iter_mut()) {
        for x in 0..w {
            let mut acc = 0.0_f64;
            for (k, weight) in kernel.iter().enumerate() {
                let idx = mirror101(x as isize + k as isize - radius, w as isize);
                acc += src_row[idx] as f64 * weight;
            }
            dst_row[x] = acc as f32;
        }
    }
    out
}

/// Reflect-101 边界下标: 以边缘像素为对称轴镜像.
#[inline]
fn mirror101(pos: isize, len: isize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let mut pos = pos.rem_euclid(period);
    if pos >= len {
        pos = period - pos;
    }
    pos as usize
}

/// 求两个方向的一维核. `ksize` 缺省时按 4σ 截断推导.
fn kernels(sigma: Sigma, ksize: Option<Idx2d>) -> TransformResult<(Vec<f64>, Vec<f64>)> {
    let (sigma_h, sigma_w) = sigma.per_axis()?;
    let (kh, kw) = match ksize {
        Some((kh, kw)) => {
            if kh % 2 == 0 || kw % 2 == 0 {
                return Err(TransformError::BadKernelSize(kh, kw));
            }
            (kh, kw)
        }
        None => (auto_ksize(sigma_h), auto_ksize(sigma_w)),
    };
    Ok((gaussian_kernel(sigma_h, kh), gaussian_kernel(sigma_w, kw)))
}

/// 归一化的一维高斯核.
fn gaussian_kernel(sigma: f64, ksize: usize) -> Vec<f64> {
    let radius = (ksize / 2) as isize;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|x| {
            let x2 = (x * x) as f64;
            (-x2 / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// 4σ 截断对应的核大小, 恒为正奇数.
#[inline]
fn auto_ksize(sigma: f64) -> usize {
    2 * (4.0 * sigma).ceil() as usize + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    fn f32_eq(f1: f32, f2: f32) -> bool {
        (f1 - f2).abs() < 1e-4
    }

    #[test]
    fn test_sigma_validation() {
        assert_eq!(
            gaussian_smooth(Array2::<f32>::zeros((4, 4)).view(), 0.0, None).unwrap_err(),
            TransformError::BadSigma(0.0, 0.0)
        );
        assert_eq!(
            gaussian_smooth(Array2::<f32>::zeros((4, 4)).view(), (1.0, -2.0), None).unwrap_err(),
            TransformError::BadSigma(1.0, -2.0)
        );
        assert!(gaussian_smooth(Array2::<f32>::zeros((4, 4)).view(), f64::NAN, None).is_err());
    }

    #[test]
    fn test_ksize_validation() {
        let img = Array2::<f32>::zeros((4, 4));
        assert_eq!(
            gaussian_smooth(img.view(), 1.0, Some((4, 3))).unwrap_err(),
            TransformError::BadKernelSize(4, 3)
        );
        assert_eq!(
            gaussian_smooth(img.view(), 1.0, Some((3, 0))).unwrap_err(),
            TransformError::BadKernelSize(3, 0)
        );
        assert!(gaussian_smooth(img.view(), 1.0, Some((3, 5))).is_ok());
    }

    #[test]
    fn test_auto_ksize() {
        assert_eq!(auto_ksize(1.0), 9);
        assert_eq!(auto_ksize(0.5), 5);
        assert_eq!(auto_ksize(2.0), 17);
    }

    /// 核归一化: 常数图像平滑后不变.
    #[test]
    fn test_smooth_preserves_constant() {
        let img = Array2::from_elem((16, 16), 100.0_f32);
        let out = gaussian_smooth(img.view(), 2.0, None).unwrap();
        assert_eq!(out.dim(), (16, 16));
        assert!(out.iter().all(|&v| f32_eq(v, 100.0)));
    }

    /// 1x1 核等价于恒等变换.
    #[test]
    fn test_smooth_unit_kernel_identity() {
        let img = Array2::from_shape_fn((4, 6), |(i, j)| (i * 6 + j) as f32);
        let out = gaussian_smooth(img.view(), 1.0, Some((1, 1))).unwrap();
        assert_eq!(out, img);
    }

    /// 脉冲响应关于中心对称, 峰值在中心.
    #[test]
    fn test_smooth_impulse_symmetry() {
        let mut img = Array2::<f32>::zeros((15, 15));
        img[(7, 7)] = 1.0;
        let out = gaussian_smooth(img.view(), 1.5, None).unwrap();

        let peak = out[(7, 7)];
        for ((i, j), &v) in out.indexed_iter() {
            assert!(v <= peak);
            assert!(f32_eq(v, out[(14 - i, j)]));
            assert!(f32_eq(v, out[(i, 14 - j)]));
        }
        // 沿中心行 / 列向外单调衰减.
        for d in 7..14 {
            assert!(out[(7, d)] >= out[(7, d + 1)]);
            assert!(out[(d, 7)] >= out[(d + 1, 7)]);
        }
        // 核归一化, 总能量近似不变 (镜像边界会重读少量质量).
        let sum: f32 = out.iter().sum();
        assert!((sum - 1.0).abs() < 1e-3);
    }

    /// 标量与元组 σ 的等价性.
    #[test]
    fn test_sigma_broadcast() {
        let img = Array2::from_shape_fn((9, 9), |(i, j)| ((i * 31 + j * 17) % 7) as f32);
        let iso = gaussian_smooth(img.view(), 1.2, None).unwrap();
        let per_axis = gaussian_smooth(img.view(), (1.2, 1.2), None).unwrap();
        assert_eq!(iso, per_axis);
    }

    /// 各向异性 σ: 宽方向 σ 更大时, 行内衰减比列内更慢.
    #[test]
    fn test_smooth_anisotropic() {
        let mut img = Array2::<f32>::zeros((21, 21));
        img[(10, 10)] = 1.0;
        let out = gaussian_smooth(img.view(), (0.8, 3.0), None).unwrap();
        assert!(out[(10, 13)] > out[(13, 10)]);
    }

    /// 体数据平滑与逐切片平滑一致.
    #[test]
    fn test_smooth_stack_matches_slices() {
        let volume = Array3::from_shape_fn((3, 8, 8), |(s, i, j)| {
            ((s * 64 + i * 8 + j) % 11) as f32
        });
        let out = gaussian_smooth_stack(volume.view(), 1.0, None).unwrap();
        for (sli, out_sli) in volume.outer_iter().zip(out.outer_iter()) {
            let expected = gaussian_smooth(sli, 1.0, None).unwrap();
            assert_eq!(out_sli, expected);
        }
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_par_smooth_matches_serial() {
        let volume = Array3::from_shape_fn((5, 17, 13), |(s, i, j)| {
            ((s * 221 + i * 13 + j) % 19) as f32 - 9.0
        });
        let serial = gaussian_smooth_stack(volume.view(), (1.0, 2.0), Some((5, 7))).unwrap();
        let parallel = par_gaussian_smooth_stack(volume.view(), (1.0, 2.0), Some((5, 7))).unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_mirror101() {
        assert_eq!(mirror101(-1, 5), 1);
        assert_eq!(mirror101(-2, 5), 2);
        assert_eq!(mirror101(0, 5), 0);
        assert_eq!(mirror101(4, 5), 4);
        assert_eq!(mirror101(5, 5), 3);
        assert_eq!(mirror101(6, 5), 2);
        assert_eq!(mirror101(-9, 5), 1);
        assert_eq!(mirror101(3, 1), 0);
    }
}
