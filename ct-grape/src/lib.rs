#![warn(missing_docs)] // <= 合适时移除它.

//! 核心库. 提供锥束 CT 重建图像与投影的预处理 / 后处理基础算子.
//!
//! 所有算子都是对内存中 `ndarray` 数组的无状态纯变换: 2D 数组表示单张投影
//! 或单张切片, 3D 数组表示切片堆叠成的体数据 (axis 0 为堆叠方向).
//! 算子之间没有流水线编排, 也没有共享可变状态, 可在用户脚本里按需独立调用.
//!
//! # 注意
//!
//! 1. 本 crate 不负责 CT 数据文件格式 (DICOM / nii / raw) 的读写, 也不包含
//!    重建算法本身, 输入输出均为内存数组.
//! 2. 所有参数校验发生在任何计算之前, 校验失败立即返回携带具体参数值的错误,
//!    不产生部分结果.
//! 3. 2D 图像序列统一先经 [`stack_images`] 适配成体数据再处理, 各算子内部
//!    不重复做这层转换.
//!
//! # 功能
//!
//! ### 有效 FOV 半径推导与圆形裁剪 ✅
//!
//! 由锥束扫描几何 (SOD / SDD / 探测器宽度 / 重建像素尺寸) 推导完整采样的
//! 圆形视野半径, 并按该半径对体数据做圆形裁剪; 另附圆周采样点生成,
//! 便于可视化叠加.
//!
//! 实现位于 `ct-grape/src/fov.rs`.
//!
//! ### 解剖方向重切片 ✅
//!
//! 矢状位 / 冠状位 / 横断位三个观察方向之间的轴次序变换, 以及底层的
//! 2D / 3D 任意轴转置原语. 全部零拷贝.
//!
//! 实现位于 `ct-grape/src/reslice.rs`.
//!
//! ### 几何变换 ✅
//!
//! 90 度级旋转, 垂直 / 水平 / 切片序翻转 (视图或拷贝语义可选), 三种插值
//! 方式的平面内缩放, 以及按轴下采样.
//!
//! 实现位于 `ct-grape/src/transform`.
//!
//! ### 高斯平滑 ✅
//!
//! 可分离高斯滤波, 两轴可独立给定 σ, 核大小可显式指定或按 4σ 截断自动推导.
//!
//! 实现位于 `ct-grape/src/transform/smooth.rs`.
//!
//! ### CT 值与投影域转换 ✅
//!
//! μ 图与 HU 图互转, 线性重标定的逆变换, postlog 图像还原为原始投影.
//!
//! 实现位于 `ct-grape/src/convert.rs`.
//!
//! ### 序列与体数据互转 ✅
//!
//! 2D 图像序列与 3D 体数据之间的堆叠 / 拆分适配.
//!
//! 实现位于 `ct-grape/src/stack.rs`.

pub mod consts;
pub mod convert;
pub mod fov;
pub mod prelude;
pub mod reslice;
pub mod stack;
pub mod transform;

pub use convert::{
    hu_no_rescale, hu_to_mu, mu_to_hu, postlog_to_proj, postlog_to_proj_2d, ConvertError,
};
pub use fov::{draw_circle, fov_crop, fov_crop_radius, FovError, FovResult};
pub use reslice::{permutation, permute, transpose_2d, transpose_3d, Direction, ResliceError};
pub use stack::{split_images, stack_images, StackError};
pub use transform::{
    binning, binning_3d, gaussian_smooth, gaussian_smooth_stack, horizontal_flip, resize,
    resize_stack, rotate, rotate_stack, stack_flip, vertical_flip, BinAxis, Interp, ResizeTo,
    Sigma, TransformError, TransformResult,
};

#[cfg(feature = "rayon")]
pub use fov::par_fov_crop;

#[cfg(feature = "rayon")]
pub use transform::par_gaussian_smooth_stack;

/// 二维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx2d = (usize, usize);

/// 三维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx3d = (usize, usize, usize);

/// 高精度二维坐标, 亦可用作二维向量.
pub type Idx2dF = (f64, f64);
