//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use guidance_maneuver::prelude::*;
//! ```

// 机动
pub use crate::maneuver::{
    ExecutableManeuver, LateralManeuver, LongitudinalManeuver, Maneuver, PlannedManeuver,
};

// 能力接口
pub use crate::capability::{
    GuidanceCommands, LateralCommand, LongitudinalCommand, ManeuverInputs,
};

// 类型系统
pub use crate::types::{
    LaneIndex, ManeuverError, ManeuverVariant, Meters, MetersPerSecond, MetersPerSecondSquared,
    Phase,
};

// 配置与执行循环
pub use crate::config::ManeuverConfig;
pub use crate::control::{LoopConfig, run_maneuver};
