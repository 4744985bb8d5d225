//! 平面内缩放.
//!
//! 重采样按像素中心对齐: `src = (dst + 0.5) * scale - 0.5`, 越界抽头取最近
//! 边缘像素. 三种插值都以可分离方式逐轴执行, 双三次核取 `A = -0.75`.

use super::{TransformError, TransformResult};
use crate::Idx2d;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3};
use std::str::FromStr;

/// 插值方式.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Interp {
    /// 双三次插值, 每轴 4 抽头.
    Bicubic,

    /// 双线性插值, 每轴 2 抽头.
    Linear,

    /// 最近邻.
    Nearest,
}

impl FromStr for Interp {
    type Err = TransformError;

    /// 仅接受全小写的 `"bicubic"` / `"linear"` / `"nearest"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bicubic" => Ok(Self::Bicubic),
            "linear" => Ok(Self::Linear),
            "nearest" => Ok(Self::Nearest),
            other => Err(TransformError::UnknownInterp(other.to_string())),
        }
    }
}

/// 缩放目标. 绝对尺寸与缩放比例二者必居其一, 由枚举本身保证.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ResizeTo {
    /// 绝对目标尺寸 (高, 宽).
    Size(Idx2d),

    /// 高 / 宽方向的缩放比例. 目标尺寸按四舍五入取整.
    Scale(f64, f64),
}

impl ResizeTo {
    /// 解析出目标 (高, 宽), 同时完成参数校验.
    fn dsize(self, (h, w): Idx2d) -> TransformResult<Idx2d> {
        match self {
            Self::Size((th, tw)) => {
                if th == 0 || tw == 0 {
                    return Err(TransformError::BadSize(th, tw));
                }
                Ok((th, tw))
            }
            Self::Scale(fh, fw) => {
                if !fh.is_finite() || fh <= 0.0 || !fw.is_finite() || fw <= 0.0 {
                    return Err(TransformError::BadScale(fh, fw));
                }
                let th = (h as f64 * fh).round() as usize;
                let tw = (w as f64 * fw).round() as usize;
                if th == 0 || tw == 0 {
                    return Err(TransformError::BadSize(th, tw));
                }
                Ok((th, tw))
            }
        }
    }
}

/// 缩放 2D 图像到 `to` 规定的目标尺寸.
///
/// 目标由绝对尺寸或缩放比例给出 ([`ResizeTo`]), 比例路径先换算成尺寸,
/// 此后两条路径完全一致. 非法目标返回 [`TransformError::BadSize`] 或
/// [`TransformError::BadScale`].
pub fn resize(
    img: ArrayView2<'_, f32>,
    to: ResizeTo,
    interp: Interp,
) -> TransformResult<Array2<f32>> {
    let (h, w) = img.dim();
    if h == 0 || w == 0 {
        return Err(TransformError::BadSize(h, w));
    }
    let (th, tw) = to.dsize((h, w))?;
    // 先重采样列方向, 再经转置把行方向同样按列处理.
    let pass = resample_cols(img, tw, interp);
    let out = resample_cols(pass.t(), th, interp);
    Ok(out.reversed_axes().as_standard_layout().to_owned())
}

/// 对体数据的每个切片做同一缩放.
pub fn resize_stack(
    volume: ArrayView3<'_, f32>,
    to: ResizeTo,
    interp: Interp,
) -> TransformResult<Array3<f32>> {
    let (z, h, w) = volume.dim();
    if h == 0 || w == 0 {
        return Err(TransformError::BadSize(h, w));
    }
    let (th, tw) = to.dsize((h, w))?;
    let mut out = Array3::zeros((z, th, tw));
    for (sli, mut dst) in volume.outer_iter().zip(out.outer_iter_mut()) {
        let resized = resize(sli, ResizeTo::Size((th, tw)), interp)?;
        dst.assign(&resized);
    }
    Ok(out)
}

/// 沿列方向 (axis 1) 重采样到 `dst_len` 列.
fn resample_cols(img: ArrayView2<'_, f32>, dst_len: usize, interp: Interp) -> Array2<f32> {
    let (h, w) = img.dim();
    let taps = axis_taps(w, dst_len, interp);
    let mut out = Array2::zeros((h, dst_len));
    for (src_row, mut dst_row) in img.outer_iter().zip(out.outer_iter_mut()) {
        for (dst_x, tap) in taps.iter().enumerate() {
            let mut acc = 0.0_f64;
            for &(idx, weight) in tap {
                acc += src_row[idx] as f64 * weight;
            }
            dst_row[dst_x] = acc as f32;
        }
    }
    out
}

/// 为一个轴上的每个输出下标预计算抽头 (源下标 + 权重).
///
/// 每组权重之和恒为 1, 边缘处的越界抽头钳位后权重合并到边缘像素,
/// 因此常数图像经任何插值都保持常数.
fn axis_taps(src_len: usize, dst_len: usize, interp: Interp) -> Vec<Vec<(usize, f64)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|dst| {
            // 像素中心对齐.
            let src = (dst as f64 + 0.5) * scale - 0.5;
            match interp {
                Interp::Nearest => vec![(clamp_index(src.round(), src_len), 1.0)],
                Interp::Linear => {
                    let base = src.floor();
                    let t = src - base;
                    vec![
                        (clamp_index(base, src_len), 1.0 - t),
                        (clamp_index(base + 1.0, src_len), t),
                    ]
                }
                Interp::Bicubic => {
                    let base = src.floor();
                    let t = src - base;
                    (-1..=2)
                        .map(|k| {
                            let idx = clamp_index(base + k as f64, src_len);
                            (idx, cubic_weight(k as f64 - t))
                        })
                        .collect()
                }
            }
        })
        .collect()
}

/// 钳位到合法源下标 (边缘复制).
#[inline]
fn clamp_index(pos: f64, len: usize) -> usize {
    pos.max(0.0).min((len - 1) as f64) as usize
}

/// Keys 三次卷积核, `A = -0.75`.
#[inline]
fn cubic_weight(t: f64) -> f64 {
    const A: f64 = -0.75;
    let t = t.abs();
    if t <= 1.0 {
        ((A + 2.0) * t - (A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        (((t - 5.0) * t + 8.0) * t - 4.0) * A
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr2, Array2, Array3};

    const ALL_INTERP: [Interp; 3] = [Interp::Bicubic, Interp::Linear, Interp::Nearest];

    fn f32_eq(f1: f32, f2: f32) -> bool {
        (f1 - f2).abs() < 1e-4
    }

    #[test]
    fn test_interp_from_str() {
        assert_eq!("bicubic".parse::<Interp>().unwrap(), Interp::Bicubic);
        assert_eq!("linear".parse::<Interp>().unwrap(), Interp::Linear);
        assert_eq!("nearest".parse::<Interp>().unwrap(), Interp::Nearest);
        assert_eq!(
            "cubic".parse::<Interp>().unwrap_err(),
            TransformError::UnknownInterp("cubic".to_string())
        );
    }

    #[test]
    fn test_resize_rejects_bad_target() {
        let img = Array2::<f32>::zeros((4, 4));
        assert_eq!(
            resize(img.view(), ResizeTo::Size((0, 5)), Interp::Linear).unwrap_err(),
            TransformError::BadSize(0, 5)
        );
        assert_eq!(
            resize(img.view(), ResizeTo::Scale(-1.0, 1.0), Interp::Linear).unwrap_err(),
            TransformError::BadScale(-1.0, 1.0)
        );
        assert!(resize(img.view(), ResizeTo::Scale(f64::NAN, 1.0), Interp::Linear).is_err());
        // 比例过小, 取整后目标尺寸为零.
        assert_eq!(
            resize(img.view(), ResizeTo::Scale(0.01, 1.0), Interp::Linear).unwrap_err(),
            TransformError::BadSize(0, 4)
        );
        // 空源图像同样拒绝.
        let empty = Array2::<f32>::zeros((0, 4));
        assert_eq!(
            resize(empty.view(), ResizeTo::Size((2, 2)), Interp::Linear).unwrap_err(),
            TransformError::BadSize(0, 4)
        );
    }

    /// 目标尺寸等于原尺寸时三种插值都精确还原.
    #[test]
    fn test_resize_identity() {
        let img = Array2::from_shape_fn((5, 7), |(i, j)| (i * 7 + j) as f32 * 1.5 - 3.0);
        for interp in ALL_INTERP {
            let out = resize(img.view(), ResizeTo::Size((5, 7)), interp).unwrap();
            assert_eq!(out, img);
        }
    }

    /// 常数图像缩放后仍为常数.
    #[test]
    fn test_resize_preserves_constant() {
        let img = Array2::from_elem((6, 5), -123.25_f32);
        for interp in ALL_INTERP {
            for to in [
                ResizeTo::Size((3, 9)),
                ResizeTo::Size((13, 2)),
                ResizeTo::Scale(2.0, 0.5),
            ] {
                let out = resize(img.view(), to, interp).unwrap();
                assert!(out.iter().all(|&v| f32_eq(v, -123.25)));
            }
        }
    }

    /// 比例路径与等价的绝对尺寸路径一致.
    #[test]
    fn test_resize_scale_matches_size() {
        let img = Array2::from_shape_fn((3, 4), |(i, j)| (i * 4 + j) as f32);
        for interp in ALL_INTERP {
            let by_scale = resize(img.view(), ResizeTo::Scale(2.0, 2.0), interp).unwrap();
            let by_size = resize(img.view(), ResizeTo::Size((6, 8)), interp).unwrap();
            assert_eq!(by_scale, by_size);
        }
    }

    /// 最近邻 2 倍下采样的抽取位置.
    #[test]
    fn test_resize_nearest_downscale() {
        let img = arr2(&[[0.0_f32, 10.0, 20.0, 30.0]]);
        let out = resize(img.view(), ResizeTo::Size((1, 2)), Interp::Nearest).unwrap();
        // src = 2 * dst + 0.5, 四舍五入到 1 和 3.
        assert_eq!(out, arr2(&[[10.0, 30.0]]));
    }

    /// 双线性 2 倍上采样的精确值.
    #[test]
    fn test_resize_linear_upscale() {
        let img = arr2(&[[0.0_f32, 10.0]]);
        let out = resize(img.view(), ResizeTo::Size((1, 4)), Interp::Linear).unwrap();
        let expected = arr2(&[[0.0_f32, 2.5, 7.5, 10.0]]);
        for (a, b) in out.iter().zip(expected.iter()) {
            assert!(f32_eq(*a, *b));
        }
    }

    /// 3 倍上采样时 dst = 3k + 1 恰好落在源样本上, 双三次插值精确穿过样本点.
    #[test]
    fn test_resize_bicubic_passes_through_samples() {
        let img = Array2::from_shape_fn((1, 8), |(_, j)| (j * j) as f32);
        let out = resize(img.view(), ResizeTo::Size((1, 24)), Interp::Bicubic).unwrap();
        for k in 0..8 {
            assert_eq!(out[(0, 3 * k + 1)], img[(0, k)]);
        }
    }

    /// 体数据缩放与逐切片缩放一致.
    #[test]
    fn test_resize_stack_matches_slices() {
        let volume = Array3::from_shape_fn((3, 4, 5), |(s, i, j)| (s * 100 + i * 10 + j) as f32);
        let out = resize_stack(volume.view(), ResizeTo::Scale(0.5, 2.0), Interp::Linear).unwrap();
        assert_eq!(out.dim(), (3, 2, 10));
        for (sli, out_sli) in volume.outer_iter().zip(out.outer_iter()) {
            let expected = resize(sli, ResizeTo::Size((2, 10)), Interp::Linear).unwrap();
            assert_eq!(out_sli, expected);
        }
    }
}
