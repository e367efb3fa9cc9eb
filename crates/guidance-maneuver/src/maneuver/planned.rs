//! 已规划的机动（可执行句柄）
//!
//! 只有规划成功的机动才拥有 `execute_time_step()`，"未规划即执行"在类型层面不存在。
//!
//! # 状态流转
//!
//! ```text
//! Planned --execute(false)--> Executing --execute(true)--> Complete
//! ```
//!
//! 完成后再次调用 `execute_time_step()` 返回 `InvalidPhase`，不会再向接收端写入指令。

use super::{DistanceInterval, Trajectory};
use crate::capability::{GuidanceCommands, ManeuverInputs};
use crate::types::{ManeuverError, ManeuverVariant, Meters, Phase, Result};
use tracing::{info, trace, warn};

/// 可执行机动的公共接口
///
/// 对象安全，执行层可以用 `Box<dyn ExecutableManeuver>` 统一驱动两种变体。
pub trait ExecutableManeuver {
    /// 变体标签
    fn variant(&self) -> ManeuverVariant;

    /// 当前阶段
    fn phase(&self) -> Phase;

    /// 机动起点距离
    fn start_distance(&self) -> Meters;

    /// 机动终点距离
    fn end_distance(&self) -> Meters;

    /// 执行一个控制周期
    ///
    /// 返回 `true` 表示机动已完成。
    fn execute_time_step(&mut self) -> Result<bool>;

    /// 是否已完成
    fn is_complete(&self) -> bool {
        self.phase() == Phase::Complete
    }
}

/// 已规划的机动
///
/// 持有规划得到的轨迹以及规划时传入的两个能力。
pub struct PlannedManeuver<T, I, C> {
    trajectory: T,
    inputs: I,
    commands: C,
    phase: Phase,
    tolerance: Meters,
    ticks: u64,
}

impl<T, I, C> PlannedManeuver<T, I, C>
where
    T: Trajectory,
    I: ManeuverInputs,
    C: GuidanceCommands,
{
    pub(crate) fn new(trajectory: T, inputs: I, commands: C, tolerance: Meters) -> Self {
        Self {
            trajectory,
            inputs,
            commands,
            phase: Phase::Planned,
            tolerance,
            ticks: 0,
        }
    }

    /// 执行一个控制周期
    ///
    /// 1. 从路径输入读取当前位置
    /// 2. 检查位置在 `[start, end]` 内
    /// 3. 计算瞬时指令并写入接收端
    /// 4. 位置到达终点时进入 `Complete` 并返回 `true`
    ///
    /// 不对周期长度或均匀性做任何假设。
    ///
    /// # 错误
    ///
    /// - `PositionOutOfRange`: 当前位置不在区间内（阶段不变，不写指令）
    /// - `InvalidPhase`: 机动已完成
    pub fn execute_time_step(&mut self) -> Result<bool> {
        if !self.phase.is_executable() {
            return Err(ManeuverError::invalid_phase("execute_time_step", self.phase));
        }

        let interval = self.trajectory.interval();
        let position = self.inputs.distance_from_route_start();
        if !interval.contains(position, self.tolerance) {
            warn!(
                "Rejected execute: position {} outside [{}, {}]",
                position,
                interval.start(),
                interval.end()
            );
            return Err(ManeuverError::PositionOutOfRange {
                position,
                start: interval.start(),
                end: interval.end(),
            });
        }

        self.trajectory.emit(position, &mut self.commands);
        self.ticks += 1;

        if position >= interval.end() - self.tolerance {
            self.phase = Phase::Complete;
            info!(
                "{} maneuver complete at {} after {} ticks",
                self.trajectory.variant(),
                position,
                self.ticks
            );
            Ok(true)
        } else {
            self.phase = Phase::Executing;
            trace!("Tick {} at {}", self.ticks, position);
            Ok(false)
        }
    }

    /// 当前阶段
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 机动起点距离
    pub fn start_distance(&self) -> Meters {
        self.trajectory.interval().start()
    }

    /// 机动终点距离
    pub fn end_distance(&self) -> Meters {
        self.trajectory.interval().end()
    }

    /// 距离区间
    pub fn interval(&self) -> DistanceInterval {
        self.trajectory.interval()
    }

    /// 规划得到的轨迹
    pub fn trajectory(&self) -> &T {
        &self.trajectory
    }

    /// 已执行的周期数
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// 路径输入
    pub fn inputs(&self) -> &I {
        &self.inputs
    }

    /// 指令接收端
    pub fn commands(&self) -> &C {
        &self.commands
    }

    /// 取回两个能力（机动完成或被放弃后）
    pub fn into_parts(self) -> (I, C) {
        (self.inputs, self.commands)
    }
}

impl<T, I, C> ExecutableManeuver for PlannedManeuver<T, I, C>
where
    T: Trajectory,
    I: ManeuverInputs,
    C: GuidanceCommands,
{
    fn variant(&self) -> ManeuverVariant {
        self.trajectory.variant()
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn start_distance(&self) -> Meters {
        PlannedManeuver::start_distance(self)
    }

    fn end_distance(&self) -> Meters {
        PlannedManeuver::end_distance(self)
    }

    fn execute_time_step(&mut self) -> Result<bool> {
        PlannedManeuver::execute_time_step(self)
    }
}

impl<T: std::fmt::Debug, I, C> std::fmt::Debug for PlannedManeuver<T, I, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannedManeuver")
            .field("trajectory", &self.trajectory)
            .field("phase", &self.phase)
            .field("tolerance", &self.tolerance)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}
