//! 外部协作者能力接口
//!
//! 机动只通过两个能力与外界交互：
//!
//! - [`ManeuverInputs`]：只读的路径相对车辆状态（距离、速度、车道）
//! - [`GuidanceCommands`]：执行器指令接收端
//!
//! 两者都在 `plan` 时以参数形式传入，由返回的可执行句柄持有，
//! 机动完成或被放弃后可以通过 `into_parts()` 取回。
//!
//! 对 `&T`、`Arc<T>`、`Rc<T>`、`Box<T>` 均提供了转发实现，调用方可以按需选择
//! 共享方式。

use crate::types::{LaneIndex, Meters, MetersPerSecond, MetersPerSecondSquared};
use std::rc::Rc;
use std::sync::Arc;

/// 路径输入能力（只读）
///
/// 每次调用都应返回一致的快照；机动在每个执行步都会重新读取位置，
/// 不对步长或步长均匀性做任何假设。
pub trait ManeuverInputs {
    /// 车辆当前距路径起点的距离
    fn distance_from_route_start(&self) -> Meters;

    /// 车辆当前速度
    fn current_speed(&self) -> MetersPerSecond;

    /// 车辆当前所在车道
    fn current_lane(&self) -> LaneIndex;
}

/// 纵向指令
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongitudinalCommand {
    /// 目标速度
    pub speed: MetersPerSecond,
    /// 允许的最大加速度（绝对值）
    pub max_acceleration: MetersPerSecondSquared,
}

/// 横向指令
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LateralCommand {
    /// 换道起始车道
    pub start_lane: LaneIndex,
    /// 换道目标车道
    pub target_lane: LaneIndex,
    /// 相对起始车道中心线的期望横向偏移（正方向为车道编号增大的方向）
    pub lateral_offset: Meters,
    /// 换道进度 [0, 1]
    pub progress: f64,
}

/// 指令接收端能力
///
/// 执行器层面的失败由接收端自行处理，这里不建模。
pub trait GuidanceCommands {
    /// 写入纵向（速度）指令
    fn send_longitudinal(&mut self, command: LongitudinalCommand);

    /// 写入横向（车道/转向）指令
    fn send_lateral(&mut self, command: LateralCommand);
}

// ==================== 转发实现 ====================

impl<T: ManeuverInputs + ?Sized> ManeuverInputs for &T {
    fn distance_from_route_start(&self) -> Meters {
        (**self).distance_from_route_start()
    }

    fn current_speed(&self) -> MetersPerSecond {
        (**self).current_speed()
    }

    fn current_lane(&self) -> LaneIndex {
        (**self).current_lane()
    }
}

impl<T: ManeuverInputs + ?Sized> ManeuverInputs for Arc<T> {
    fn distance_from_route_start(&self) -> Meters {
        (**self).distance_from_route_start()
    }

    fn current_speed(&self) -> MetersPerSecond {
        (**self).current_speed()
    }

    fn current_lane(&self) -> LaneIndex {
        (**self).current_lane()
    }
}

impl<T: ManeuverInputs + ?Sized> ManeuverInputs for Rc<T> {
    fn distance_from_route_start(&self) -> Meters {
        (**self).distance_from_route_start()
    }

    fn current_speed(&self) -> MetersPerSecond {
        (**self).current_speed()
    }

    fn current_lane(&self) -> LaneIndex {
        (**self).current_lane()
    }
}

impl<T: ManeuverInputs + ?Sized> ManeuverInputs for Box<T> {
    fn distance_from_route_start(&self) -> Meters {
        (**self).distance_from_route_start()
    }

    fn current_speed(&self) -> MetersPerSecond {
        (**self).current_speed()
    }

    fn current_lane(&self) -> LaneIndex {
        (**self).current_lane()
    }
}

impl<T: GuidanceCommands + ?Sized> GuidanceCommands for &mut T {
    fn send_longitudinal(&mut self, command: LongitudinalCommand) {
        (**self).send_longitudinal(command)
    }

    fn send_lateral(&mut self, command: LateralCommand) {
        (**self).send_lateral(command)
    }
}

impl<T: GuidanceCommands + ?Sized> GuidanceCommands for Box<T> {
    fn send_longitudinal(&mut self, command: LongitudinalCommand) {
        (**self).send_longitudinal(command)
    }

    fn send_lateral(&mut self, command: LateralCommand) {
        (**self).send_lateral(command)
    }
}
