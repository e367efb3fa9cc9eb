//! 控制模块
//!
//! - `CubicProfile` - 距离域三次插值剖面
//! - Loop Runner - 驱动已规划机动的执行循环

pub mod loop_runner;
pub mod profile;

// 重新导出常用类型
pub use loop_runner::{LoopConfig, RunError, RunSummary, run_maneuver};
pub use profile::CubicProfile;
