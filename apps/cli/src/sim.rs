//! 仿真车辆
//!
//! 一维运动学模型：速度以不超过指令给出的最大加速度逼近设定值，
//! 横向偏移直接跟随指令。同一辆车同时充当机动的路径输入和指令接收端，
//! 克隆出的句柄共享状态。

use guidance_maneuver::capability::{
    GuidanceCommands, LateralCommand, LongitudinalCommand, ManeuverInputs,
};
use guidance_maneuver::types::{LaneIndex, Meters, MetersPerSecond};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// 车辆状态快照
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    pub position: Meters,
    pub speed: MetersPerSecond,
    pub lane: LaneIndex,
    pub lateral_offset: Meters,
    pub longitudinal: Option<LongitudinalCommand>,
}

/// 仿真车辆（可克隆，共享状态）
#[derive(Debug, Clone)]
pub struct SimVehicle {
    state: Arc<Mutex<VehicleState>>,
}

impl SimVehicle {
    pub fn new(position: Meters, speed: MetersPerSecond, lane: LaneIndex) -> Self {
        Self {
            state: Arc::new(Mutex::new(VehicleState {
                position,
                speed,
                lane,
                lateral_offset: Meters::ZERO,
                longitudinal: None,
            })),
        }
    }

    pub fn snapshot(&self) -> VehicleState {
        *self.state.lock()
    }

    /// 推进 `dt`，位置不超过 `horizon`
    ///
    /// 没有纵向指令时保持当前速度。
    pub fn advance(&self, dt: Duration, horizon: Meters) {
        let mut state = self.state.lock();
        let dt = dt.as_secs_f64();

        if let Some(command) = state.longitudinal {
            let max_dv = command.max_acceleration.value() * dt;
            let dv = (command.speed - state.speed).value().clamp(-max_dv, max_dv);
            state.speed = (state.speed + MetersPerSecond(dv)).max(MetersPerSecond::ZERO);
        }

        let next = state.position + Meters(state.speed.value() * dt);
        state.position = next.min(horizon.max(state.position));
    }
}

impl ManeuverInputs for SimVehicle {
    fn distance_from_route_start(&self) -> Meters {
        self.state.lock().position
    }

    fn current_speed(&self) -> MetersPerSecond {
        self.state.lock().speed
    }

    fn current_lane(&self) -> LaneIndex {
        self.state.lock().lane
    }
}

impl GuidanceCommands for SimVehicle {
    fn send_longitudinal(&mut self, command: LongitudinalCommand) {
        self.state.lock().longitudinal = Some(command);
    }

    fn send_lateral(&mut self, command: LateralCommand) {
        let mut state = self.state.lock();
        if command.progress >= 1.0 {
            state.lane = command.target_lane;
            state.lateral_offset = Meters::ZERO;
        } else {
            state.lateral_offset = command.lateral_offset;
        }
    }
}

/// 一个周期的记录
#[derive(Debug, Clone, Serialize)]
pub struct TickRecord {
    pub tick: usize,
    pub time_s: f64,
    pub position_m: f64,
    pub speed_mps: f64,
    pub lane: i32,
    pub lateral_offset_m: f64,
}

impl TickRecord {
    pub fn new(tick: usize, time: Duration, state: &VehicleState) -> Self {
        Self {
            tick,
            time_s: time.as_secs_f64(),
            position_m: state.position.value(),
            speed_mps: state.speed.value(),
            lane: state.lane.value(),
            lateral_offset_m: state.lateral_offset.value(),
        }
    }
}
