//! 错误类型体系
//!
//! 机动层的错误都属于编程/集成错误：机动本身不尝试恢复，错误原样返回给调用者，
//! 由制导执行层决定中止当前计划并进入安全回退。
//!
//! 错误分为三类：
//!
//! - **契约违反**: 目标未设置、变体不匹配、生命周期阶段非法
//! - **规划错误**: 区间或目标值非法、区间内不可行
//! - **位置错误**: 执行时车辆不在机动的距离区间内
//!
//! # 示例
//!
//! ```rust
//! use guidance_maneuver::types::{ManeuverError, Meters};
//!
//! fn handle_error(err: ManeuverError) {
//!     if err.is_position_error() {
//!         eprintln!("车辆不在机动区间内: {}", err);
//!     } else if err.is_contract_violation() {
//!         eprintln!("调用顺序错误: {}", err);
//!     } else {
//!         eprintln!("规划失败: {}", err);
//!     }
//! }
//!
//! handle_error(ManeuverError::PositionOutOfRange {
//!     position: Meters(90.0),
//!     start: Meters(100.0),
//!     end: Meters(150.0),
//! });
//! ```

use super::lifecycle::{ManeuverVariant, Phase};
use super::units::{Meters, MetersPerSecondSquared};
use thiserror::Error;

/// 机动错误类型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ManeuverError {
    // ==================== Contract Violations ====================
    /// 规划前未设置必需的目标量
    #[error("Required target '{target}' is not set before planning")]
    PreconditionUnset {
        /// 目标量名称
        target: &'static str,
    },

    /// 在不支持的变体上调用了操作
    #[error("Operation '{operation}' is not supported by a {variant} maneuver")]
    VariantMismatch {
        /// 操作名
        operation: &'static str,
        /// 当前机动的变体
        variant: ManeuverVariant,
    },

    /// 在非法的生命周期阶段调用了操作
    #[error("Operation '{operation}' is not allowed in phase '{phase}'")]
    InvalidPhase {
        /// 操作名
        operation: &'static str,
        /// 当前阶段
        phase: Phase,
    },

    // ==================== Position Errors ====================
    /// 当前路径位置不在机动区间内
    #[error("Route position {position} is outside maneuver interval [{start}, {end}]")]
    PositionOutOfRange {
        /// 当前路径位置
        position: Meters,
        /// 区间起点
        start: Meters,
        /// 区间终点
        end: Meters,
    },

    // ==================== Planning Errors ====================
    /// 距离区间非法（负起点、终点小于起点或非有限值）
    #[error("Invalid distance interval [{start}, {end}]")]
    InvalidInterval {
        /// 起点
        start: Meters,
        /// 终点
        end: Meters,
    },

    /// 目标量非法
    #[error("Invalid target '{target}': {reason}")]
    InvalidTarget {
        /// 目标量名称
        target: &'static str,
        /// 原因
        reason: String,
    },

    /// 调用方给定的区间需要的加速度超过限制
    #[error("Interval requires acceleration {required} exceeding limit {limit}")]
    InfeasibleInterval {
        /// 所需加速度
        required: MetersPerSecondSquared,
        /// 配置的加速度上限
        limit: MetersPerSecondSquared,
    },
}

impl ManeuverError {
    /// 是否为契约违反（调用顺序或变体错误）
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::PreconditionUnset { .. } | Self::VariantMismatch { .. } | Self::InvalidPhase { .. }
        )
    }

    /// 是否为规划错误
    pub fn is_planning_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInterval { .. } | Self::InvalidTarget { .. } | Self::InfeasibleInterval { .. }
        )
    }

    /// 是否为执行时的位置错误
    pub fn is_position_error(&self) -> bool {
        matches!(self, Self::PositionOutOfRange { .. })
    }

    /// 创建变体不匹配错误
    pub fn variant_mismatch(operation: &'static str, variant: ManeuverVariant) -> Self {
        Self::VariantMismatch { operation, variant }
    }

    /// 创建阶段错误
    pub fn invalid_phase(operation: &'static str, phase: Phase) -> Self {
        Self::InvalidPhase { operation, phase }
    }

    /// 创建目标量非法错误
    pub fn invalid_target(target: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            target,
            reason: reason.into(),
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ManeuverError>;
