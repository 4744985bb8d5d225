//! 🍇欢迎光临🍓
//!
//! 汇总本 crate 最常用的算子与类型, 方便一次性导入.

pub use crate::{Idx2d, Idx2dF, Idx3d};

pub use crate::consts::hu;
pub use crate::convert::{
    hu_no_rescale, hu_to_mu, mu_to_hu, postlog_to_proj, postlog_to_proj_2d, ConvertError,
};
pub use crate::fov::{draw_circle, fov_crop, fov_crop_radius, FovError, FovResult};
pub use crate::reslice::{permutation, permute, transpose_2d, transpose_3d, Direction, ResliceError};
pub use crate::stack::{split_images, stack_images, StackError};
pub use crate::transform::{
    binning, binning_3d, gaussian_smooth, gaussian_smooth_stack, horizontal_flip, resize,
    resize_stack, rotate, rotate_stack, stack_flip, vertical_flip, BinAxis, Interp, ResizeTo,
    Sigma, TransformError, TransformResult,
};

#[cfg(feature = "rayon")]
pub use crate::fov::par_fov_crop;

#[cfg(feature = "rayon")]
pub use crate::transform::par_gaussian_smooth_stack;
