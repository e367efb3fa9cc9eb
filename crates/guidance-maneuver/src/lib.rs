//! Guidance Maneuver - 协同自动驾驶制导中的机动抽象
//!
//! 机动是沿路径距离 `[start, end]` 的一段有界车辆控制。上层规划器先 **规划**
//! （解析距离区间与内部轨迹），然后由控制循环反复 **执行**，每个周期根据车辆当前的
//! 路径位置计算瞬时指令，直到机动报告完成。
//!
//! # 架构设计
//!
//! 从底层到高层：
//!
//! - **类型层** (`types`): 强类型单位、变体标签、生命周期阶段、错误类型
//! - **能力层** (`capability`): 路径输入与指令接收端两个外部协作者接口
//! - **机动层** (`maneuver`): 纵向/横向机动、可执行句柄、运行时变体兼容接口
//! - **控制层** (`control`): 插值剖面与执行循环
//! - **配置** (`config`): 从 TOML 加载的规划与执行限制
//!
//! # 快速开始
//!
//! ```rust
//! use guidance_maneuver::prelude::*;
//! ```
//!
//! 需要在运行时选择变体的集成场景：
//!
//! ```rust
//! use guidance_maneuver::maneuver::DynamicManeuver;
//! ```

pub mod capability;
pub mod config;
pub mod control;
pub mod maneuver;
pub mod types;

// Prelude 模块
pub mod prelude;

// 常用类型
pub use capability::{GuidanceCommands, LateralCommand, LongitudinalCommand, ManeuverInputs};
pub use config::{ConfigError, ManeuverConfig};
pub use control::{LoopConfig, RunError, RunSummary, run_maneuver};
pub use maneuver::{
    DynamicManeuver, ExecutableManeuver, LateralManeuver, LongitudinalManeuver, Maneuver,
    PlannedManeuver,
};
pub use types::{
    LaneIndex, ManeuverError, ManeuverVariant, Meters, MetersPerSecond, MetersPerSecondSquared,
    Phase,
};
