//! 一维插值剖面
//!
//! 机动在距离域内按进度 `p ∈ [0, 1]` 插值，剖面只关心归一化进度。
//!
//! # 算法
//!
//! 三次多项式插值：
//! ```text
//! x(p) = a0 + a1*p + a2*p² + a3*p³
//! x'(p) = a1 + 2*a2*p + 3*a3*p²
//! ```
//!
//! 换道使用起止导数为 0 的边界条件（`3p² − 2p³`），保证横向偏移在起点和终点
//! 都平滑地进入/离开车道中心线。

/// 三次多项式系数
///
/// 表示 `x(p) = a0 + a1*p + a2*p² + a3*p³`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicProfile {
    a0: f64,
    a1: f64,
    a2: f64,
    a3: f64,
}

impl CubicProfile {
    /// 由边界条件 `x(0) = x0`, `x'(0) = d0`, `x(1) = x1`, `x'(1) = d1` 求系数
    pub fn from_boundary(x0: f64, d0: f64, x1: f64, d1: f64) -> Self {
        // a2 + a3 = x1 - x0 - d0
        // 2*a2 + 3*a3 = d1 - d0
        let a2 = 3.0 * (x1 - x0) - 2.0 * d0 - d1;
        let a3 = -2.0 * (x1 - x0) + d0 + d1;

        CubicProfile {
            a0: x0,
            a1: d0,
            a2,
            a3,
        }
    }

    /// 起止导数为 0 的平滑过渡
    pub fn smooth_step(x0: f64, x1: f64) -> Self {
        Self::from_boundary(x0, 0.0, x1, 0.0)
    }

    /// 在进度 `p` 处取值，`p` 钳位到 [0, 1]
    pub fn value(&self, p: f64) -> f64 {
        let p = p.clamp(0.0, 1.0);
        self.a0 + self.a1 * p + self.a2 * p * p + self.a3 * p * p * p
    }

    /// 在进度 `p` 处对归一化进度求导
    ///
    /// 注意：这是对归一化进度的导数，换算到距离域需要除以区间长度
    pub fn derivative(&self, p: f64) -> f64 {
        let p = p.clamp(0.0, 1.0);
        self.a1 + 2.0 * self.a2 * p + 3.0 * self.a3 * p * p
    }
}
