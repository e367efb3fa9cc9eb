//! 测试公共设施
//!
//! - `MockRoute`: 可共享的路径输入，测试中随时改写位置/速度/车道
//! - `RecordingCommands`: 记录所有写入指令的接收端
//!
//! 两者内部都是 `Arc<Mutex<..>>`，克隆后与原对象共享状态，
//! 所以可以把一份交给机动，另一份留在测试里观察。

#![allow(dead_code)]

use guidance_maneuver::capability::{
    GuidanceCommands, LateralCommand, LongitudinalCommand, ManeuverInputs,
};
use guidance_maneuver::types::{LaneIndex, Meters, MetersPerSecond};
use parking_lot::Mutex;
use std::sync::Arc;

/// 路径状态快照
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteState {
    pub position: Meters,
    pub speed: MetersPerSecond,
    pub lane: LaneIndex,
}

impl Default for RouteState {
    fn default() -> Self {
        Self {
            position: Meters(0.0),
            speed: MetersPerSecond(10.0),
            lane: LaneIndex(1),
        }
    }
}

/// 模拟路径输入
#[derive(Debug, Clone, Default)]
pub struct MockRoute {
    state: Arc<Mutex<RouteState>>,
}

impl MockRoute {
    pub fn new(position: f64, speed: f64, lane: i32) -> Self {
        Self {
            state: Arc::new(Mutex::new(RouteState {
                position: Meters(position),
                speed: MetersPerSecond(speed),
                lane: LaneIndex(lane),
            })),
        }
    }

    pub fn at(position: f64) -> Self {
        let route = Self::default();
        route.set_position(position);
        route
    }

    pub fn set_position(&self, position: f64) {
        self.state.lock().position = Meters(position);
    }

    pub fn advance(&self, distance: f64) {
        self.state.lock().position += Meters(distance);
    }

    pub fn set_speed(&self, speed: f64) {
        self.state.lock().speed = MetersPerSecond(speed);
    }

    pub fn set_lane(&self, lane: i32) {
        self.state.lock().lane = LaneIndex(lane);
    }

    pub fn snapshot(&self) -> RouteState {
        *self.state.lock()
    }
}

impl ManeuverInputs for MockRoute {
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

/// 记录下来的指令
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordedCommand {
    Longitudinal(LongitudinalCommand),
    Lateral(LateralCommand),
}

/// 记录指令的接收端
#[derive(Debug, Clone, Default)]
pub struct RecordingCommands {
    log: Arc<Mutex<Vec<RecordedCommand>>>,
}

impl RecordingCommands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.log.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.lock().is_empty()
    }

    pub fn all(&self) -> Vec<RecordedCommand> {
        self.log.lock().clone()
    }

    pub fn longitudinal(&self) -> Vec<LongitudinalCommand> {
        self.log
            .lock()
            .iter()
            .filter_map(|command| match command {
                RecordedCommand::Longitudinal(c) => Some(*c),
                RecordedCommand::Lateral(_) => None,
            })
            .collect()
    }

    pub fn lateral(&self) -> Vec<LateralCommand> {
        self.log
            .lock()
            .iter()
            .filter_map(|command| match command {
                RecordedCommand::Lateral(c) => Some(*c),
                RecordedCommand::Longitudinal(_) => None,
            })
            .collect()
    }
}

impl GuidanceCommands for RecordingCommands {
    fn send_longitudinal(&mut self, command: LongitudinalCommand) {
        self.log.lock().push(RecordedCommand::Longitudinal(command));
    }

    fn send_lateral(&mut self, command: LateralCommand) {
        self.log.lock().push(RecordedCommand::Lateral(command));
    }
}
