//! 机动（Maneuver）
//!
//! 机动是沿路径的一段有界车辆控制，分两个阶段：
//!
//! 1. **规划**：`plan` / `plan_to_target_distance` 消耗未规划的机动，解析出距离区间
//!    `[start, end]` 和内部轨迹，返回可执行句柄 [`PlannedManeuver`]
//! 2. **执行**：控制循环每个周期调用 `execute_time_step()`，直到返回 `true`
//!
//! # 变体
//!
//! - [`LongitudinalManeuver`]：速度整形（保持 / 加速 / 减速），目标在构造时给出
//! - [`LateralManeuver`]：换道，目标车道在构造时给出
//!
//! 两者只共享生命周期操作（[`Maneuver`] trait）。速度访问器只存在于纵向类型上，
//! 车道访问器只存在于横向类型上，变体不匹配在编译期即被拒绝。
//!
//! 需要在运行时选择变体的集成场景使用 [`DynamicManeuver`]，它保留了基于 setter
//! 的接口，并以 `VariantMismatch` 报告变体错误。
//!
//! # 示例
//!
//! ```rust
//! use guidance_maneuver::prelude::*;
//!
//! # struct Route;
//! # impl ManeuverInputs for Route {
//! #     fn distance_from_route_start(&self) -> Meters { Meters(100.0) }
//! #     fn current_speed(&self) -> MetersPerSecond { MetersPerSecond(10.0) }
//! #     fn current_lane(&self) -> LaneIndex { LaneIndex(1) }
//! # }
//! # struct Sink;
//! # impl GuidanceCommands for Sink {
//! #     fn send_longitudinal(&mut self, _: LongitudinalCommand) {}
//! #     fn send_lateral(&mut self, _: LateralCommand) {}
//! # }
//! # fn main() -> guidance_maneuver::types::Result<()> {
//! let maneuver = LongitudinalManeuver::new(MetersPerSecond(10.0), MetersPerSecond(15.0))?;
//! let mut planned = maneuver.plan(Route, Sink, Meters(100.0))?;
//!
//! assert_eq!(planned.start_distance(), Meters(100.0));
//! assert!(planned.end_distance() > Meters(100.0));
//!
//! let done = planned.execute_time_step()?;
//! assert!(!done);
//! # Ok(())
//! # }
//! ```

pub mod dynamic;
pub mod lateral;
pub mod longitudinal;
pub mod planned;

pub use dynamic::DynamicManeuver;
pub use lateral::{LateralManeuver, LateralTrajectory};
pub use longitudinal::{
    LongitudinalManeuver, LongitudinalManeuverBuilder, LongitudinalTrajectory, SpeedChange,
};
pub use planned::{ExecutableManeuver, PlannedManeuver};

use crate::capability::{GuidanceCommands, ManeuverInputs};
use crate::types::{ManeuverError, ManeuverVariant, Meters, Result};
use tracing::debug;

/// 路径距离区间 `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceInterval {
    start: Meters,
    end: Meters,
}

impl DistanceInterval {
    /// 创建并校验区间
    ///
    /// # 错误
    ///
    /// 起点为负、终点小于起点或任一值非有限时返回 `InvalidInterval`。
    pub fn new(start: Meters, end: Meters) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() || start < Meters::ZERO || end < start {
            return Err(ManeuverError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// 起点
    pub fn start(&self) -> Meters {
        self.start
    }

    /// 终点
    pub fn end(&self) -> Meters {
        self.end
    }

    /// 区间长度
    pub fn length(&self) -> Meters {
        self.end - self.start
    }

    /// 位置是否在区间内（两端放宽 `tolerance`）
    pub fn contains(&self, position: Meters, tolerance: Meters) -> bool {
        position >= self.start - tolerance && position <= self.end + tolerance
    }

    /// 位置对应的归一化进度，钳位到 [0, 1]；零长度区间视为已完成
    pub fn progress(&self, position: Meters) -> f64 {
        let length = self.length();
        if length <= Meters::ZERO {
            return 1.0;
        }
        ((position - self.start) / length).clamp(0.0, 1.0)
    }
}

/// 规划得到的轨迹
///
/// 轨迹只依赖路径位置，不依赖时间：给定当前位置即可算出瞬时指令。
pub trait Trajectory {
    /// 轨迹所属的变体
    fn variant(&self) -> ManeuverVariant;

    /// 距离区间
    fn interval(&self) -> DistanceInterval;

    /// 计算位置 `position` 处的瞬时指令并写入接收端
    fn emit<C: GuidanceCommands + ?Sized>(&self, position: Meters, commands: &mut C);
}

/// 机动的公共生命周期能力
///
/// 实现者只需提供两个轨迹求解方法；`plan` / `plan_to_target_distance` 负责区间校验，
/// 并把能力参数与轨迹一起装进可执行句柄。
pub trait Maneuver: Sized {
    /// 规划产物
    type Trajectory: Trajectory;

    /// 变体标签
    const VARIANT: ManeuverVariant;

    /// 执行时的距离容差
    fn position_tolerance(&self) -> Meters;

    /// 从 `start_distance` 开始求解轨迹，终点由机动自行计算
    fn solve<I: ManeuverInputs + ?Sized>(
        &self,
        inputs: &I,
        start_distance: Meters,
    ) -> Result<Self::Trajectory>;

    /// 在调用方给定的区间内求解轨迹
    fn solve_interval<I: ManeuverInputs + ?Sized>(
        &self,
        inputs: &I,
        interval: DistanceInterval,
    ) -> Result<Self::Trajectory>;

    /// 规划机动，返回可执行句柄
    ///
    /// # 错误
    ///
    /// - `InvalidInterval`: `start_distance` 为负或非有限值
    /// - `VariantMismatch`: 此机动不支持自行计算终点
    /// - 其他规划错误由具体机动决定
    fn plan<I, C>(
        self,
        inputs: I,
        commands: C,
        start_distance: Meters,
    ) -> Result<PlannedManeuver<Self::Trajectory, I, C>>
    where
        I: ManeuverInputs,
        C: GuidanceCommands,
    {
        DistanceInterval::new(start_distance, start_distance)?;
        let trajectory = self.solve(&inputs, start_distance)?;
        debug!(
            "Planned {} maneuver over [{}, {}]",
            Self::VARIANT,
            trajectory.interval().start(),
            trajectory.interval().end()
        );
        Ok(PlannedManeuver::new(
            trajectory,
            inputs,
            commands,
            self.position_tolerance(),
        ))
    }

    /// 规划到调用方指定的终点距离
    ///
    /// # 错误
    ///
    /// - `InvalidInterval`: `end_distance < start_distance` 或其他非法区间
    /// - 其他规划错误由具体机动决定
    fn plan_to_target_distance<I, C>(
        self,
        inputs: I,
        commands: C,
        start_distance: Meters,
        end_distance: Meters,
    ) -> Result<PlannedManeuver<Self::Trajectory, I, C>>
    where
        I: ManeuverInputs,
        C: GuidanceCommands,
    {
        let interval = DistanceInterval::new(start_distance, end_distance)?;
        let trajectory = self.solve_interval(&inputs, interval)?;
        debug!(
            "Planned {} maneuver to target distance over [{}, {}]",
            Self::VARIANT,
            interval.start(),
            interval.end()
        );
        Ok(PlannedManeuver::new(
            trajectory,
            inputs,
            commands,
            self.position_tolerance(),
        ))
    }
}
