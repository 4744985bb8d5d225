//! 几何变换与平滑.
//!
//! 旋转 / 翻转只调整轴次序与方向, 不触碰像素值; 缩放与高斯平滑是重采样
//! 类算子, 固定作用于 `f32` 图像; 下采样按步长抽取, 对元素类型泛型.

mod binning;
mod orient;
mod resize;
mod smooth;

pub use binning::{binning, binning_3d, BinAxis};
pub use orient::{horizontal_flip, rotate, rotate_stack, stack_flip, vertical_flip};
pub use resize::{resize, resize_stack, Interp, ResizeTo};
pub use smooth::{gaussian_smooth, gaussian_smooth_stack, Sigma};

#[cfg(feature = "rayon")]
pub use smooth::par_gaussian_smooth_stack;

/// 几何变换的参数错误.
#[derive(Clone, Debug, PartialEq)]
pub enum TransformError {
    /// 旋转角度必须是 90 的整数倍. 载荷为原始角度.
    BadRotation(i32),

    /// 缩放比例必须为正且有限. 载荷为 (高方向比例, 宽方向比例).
    BadScale(f64, f64),

    /// 缩放的源与目标尺寸高宽都不能为零. 载荷为 (高, 宽).
    BadSize(usize, usize),

    /// 未知的插值方式名. 载荷为原始字符串.
    UnknownInterp(String),

    /// 高斯 σ 必须为正且有限. 载荷为 (σ_h, σ_w).
    BadSigma(f64, f64),

    /// 高斯核大小必须为正奇数. 载荷为 (高, 宽).
    BadKernelSize(usize, usize),

    /// 下采样率必须 >= 1. 载荷为实际值.
    BadRate(usize),

    /// 2D 图像没有 z 轴可供下采样.
    NoZAxis,
}

/// 几何变换结果.
pub type TransformResult<T> = Result<T, TransformError>;
