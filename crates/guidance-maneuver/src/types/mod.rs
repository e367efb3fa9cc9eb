//! 基础类型
//!
//! - 强类型单位（`Meters`、`MetersPerSecond`、`MetersPerSecondSquared`、`LaneIndex`）
//! - 变体标签与生命周期阶段（`ManeuverVariant`、`Phase`）
//! - 错误类型（`ManeuverError`）

pub mod error;
pub mod lifecycle;
pub mod units;

pub use error::{ManeuverError, Result};
pub use lifecycle::{ManeuverVariant, Phase};
pub use units::{LaneIndex, Meters, MetersPerSecond, MetersPerSecondSquared};
