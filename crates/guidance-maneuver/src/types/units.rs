//! 强类型单位系统
//!
//! 使用 NewType 模式区分路径距离、速度和加速度，在编译期防止单位混淆。
//!
//! 所有单位均为 SI：距离为米（自路径起点起算），速度为 m/s，加速度为 m/s²。
//!
//! # 示例
//!
//! ```rust
//! use guidance_maneuver::types::{Meters, MetersPerSecond};
//!
//! let start = Meters(100.0);
//! let end = start + Meters(25.0);
//! assert_eq!(end - start, Meters(25.0));
//!
//! let v = MetersPerSecond(10.0);
//! assert_eq!(v.squared(), 100.0);
//!
//! // 类型安全：以下代码无法编译
//! // let _ = Meters(1.0) + MetersPerSecond(1.0);  // ❌ 类型不匹配
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// 为标量单位生成通用的运算符重载
macro_rules! impl_scalar_unit {
    ($unit:ident) => {
        impl $unit {
            /// 零值常量
            pub const ZERO: Self = $unit(0.0);

            /// 创建新的值
            #[inline]
            pub const fn new(value: f64) -> Self {
                $unit(value)
            }

            /// 获取原始值
            #[inline]
            pub fn value(self) -> f64 {
                self.0
            }

            /// 取绝对值
            #[inline]
            pub fn abs(self) -> Self {
                $unit(self.0.abs())
            }

            /// 是否为有限值（非 NaN、非无穷）
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// 限制范围
            #[inline]
            pub fn clamp(self, min: Self, max: Self) -> Self {
                $unit(self.0.clamp(min.0, max.0))
            }

            /// 取较小值
            #[inline]
            pub fn min(self, other: Self) -> Self {
                $unit(self.0.min(other.0))
            }

            /// 取较大值
            #[inline]
            pub fn max(self, other: Self) -> Self {
                $unit(self.0.max(other.0))
            }
        }

        impl Add for $unit {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                $unit(self.0 + rhs.0)
            }
        }

        impl Sub for $unit {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                $unit(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $unit {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: f64) -> Self {
                $unit(self.0 * rhs)
            }
        }

        impl Mul<$unit> for f64 {
            type Output = $unit;
            #[inline]
            fn mul(self, rhs: $unit) -> $unit {
                $unit(self * rhs.0)
            }
        }

        impl Div<f64> for $unit {
            type Output = Self;
            #[inline]
            fn div(self, rhs: f64) -> Self {
                $unit(self.0 / rhs)
            }
        }

        impl Div<$unit> for $unit {
            type Output = f64;
            #[inline]
            fn div(self, rhs: $unit) -> f64 {
                self.0 / rhs.0
            }
        }

        impl Neg for $unit {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                $unit(-self.0)
            }
        }

        impl AddAssign for $unit {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl SubAssign for $unit {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }
    };
}

/// 路径距离（NewType）
///
/// 自路径起点起算的距离，单位米。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl_scalar_unit!(Meters);

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} m", self.0)
    }
}

/// 速度（NewType）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetersPerSecond(pub f64);

impl_scalar_unit!(MetersPerSecond);

impl MetersPerSecond {
    /// 速度平方（m²/s²），用于匀加速运动学公式 `v² = v0² + 2·a·d`
    #[inline]
    pub fn squared(self) -> f64 {
        self.0 * self.0
    }

    /// 从速度平方恢复速度，负值钳位到 0
    #[inline]
    pub fn from_squared(v_squared: f64) -> Self {
        MetersPerSecond(v_squared.max(0.0).sqrt())
    }
}

impl fmt::Display for MetersPerSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} m/s", self.0)
    }
}

/// 加速度（NewType）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetersPerSecondSquared(pub f64);

impl_scalar_unit!(MetersPerSecondSquared);

impl fmt::Display for MetersPerSecondSquared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} m/s²", self.0)
    }
}

/// 车道编号
///
/// 编号约定由路径输入提供者决定，这里只保证是整数。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LaneIndex(pub i32);

impl LaneIndex {
    /// 获取原始值
    #[inline]
    pub fn value(self) -> i32 {
        self.0
    }

    /// 到目标车道需要跨越的车道数（带符号）
    #[inline]
    pub fn offset_to(self, target: LaneIndex) -> i32 {
        target.0 - self.0
    }
}

impl From<i32> for LaneIndex {
    fn from(value: i32) -> Self {
        LaneIndex(value)
    }
}

impl fmt::Display for LaneIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lane {}", self.0)
    }
}
