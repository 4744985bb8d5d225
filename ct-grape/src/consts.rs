//! 通用常量.

/// Hounsfield 标度.
pub mod hu {
    /// 空气的 CT 值 (HU).
    pub const AIR: f64 = -1000.0;

    /// 水的 CT 值 (HU).
    pub const WATER: f64 = 0.0;

    /// `μ <-> HU` 转换的惯用标度系数 `b`.
    pub const SCALE: f64 = 1000.0;

    /// 线性重标定 `HU = k * raw + b` 的惯用截距 `b`.
    pub const RESCALE_INTERCEPT: f64 = -1000.0;

    /// 线性重标定 `HU = k * raw + b` 的惯用斜率 `k`.
    pub const RESCALE_SLOPE: f64 = 1.0;

    /// 约 70 keV 下水的线性衰减系数参考值 (mm^-1). 供测试与演示取用.
    pub const MU_WATER_REF_MM: f64 = 0.02;
}
