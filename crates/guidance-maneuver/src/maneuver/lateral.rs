//! 横向机动（换道）
//!
//! 起始车道在规划时从路径输入读取，目标车道在构造时给出。
//! 横向偏移沿距离按 `3p² − 2p³` 平滑过渡，起止处横向速度为 0。
//!
//! 默认配置下横向机动没有标称时长，`plan` 返回 `VariantMismatch`，
//! 必须使用 `plan_to_target_distance` 由调用方给出终点距离。

use super::{DistanceInterval, Maneuver, Trajectory};
use crate::capability::{GuidanceCommands, LateralCommand, ManeuverInputs};
use crate::config::{LateralLimits, ManeuverConfig};
use crate::control::profile::CubicProfile;
use crate::types::{LaneIndex, ManeuverError, ManeuverVariant, Meters, Result};
use std::time::Duration;
use tracing::trace;

/// 横向机动（未规划）
#[derive(Debug, Clone, PartialEq)]
pub struct LateralManeuver {
    target_lane: LaneIndex,
    limits: LateralLimits,
    tolerance: Meters,
}

impl LateralManeuver {
    /// 使用默认配置创建横向机动
    pub fn new(target_lane: LaneIndex) -> Self {
        Self::with_config(target_lane, &ManeuverConfig::default())
    }

    /// 使用指定配置创建横向机动
    pub fn with_config(target_lane: LaneIndex, config: &ManeuverConfig) -> Self {
        Self {
            target_lane,
            limits: config.lateral.clone(),
            tolerance: config.execution.position_tolerance(),
        }
    }

    /// 目标车道
    pub fn target_lane(&self) -> LaneIndex {
        self.target_lane
    }

    /// 横向限制
    pub fn limits(&self) -> &LateralLimits {
        &self.limits
    }

    fn trajectory(&self, start_lane: LaneIndex, interval: DistanceInterval) -> LateralTrajectory {
        let lanes = f64::from(start_lane.offset_to(self.target_lane));
        let total_offset = self.limits.lane_width * lanes;
        LateralTrajectory {
            interval,
            start_lane,
            target_lane: self.target_lane,
            profile: CubicProfile::smooth_step(0.0, total_offset),
        }
    }
}

impl Maneuver for LateralManeuver {
    type Trajectory = LateralTrajectory;

    const VARIANT: ManeuverVariant = ManeuverVariant::Lateral;

    fn position_tolerance(&self) -> Meters {
        self.tolerance
    }

    fn solve<I: ManeuverInputs + ?Sized>(
        &self,
        inputs: &I,
        start_distance: Meters,
    ) -> Result<Self::Trajectory> {
        let secs = self
            .limits
            .nominal_duration_secs
            .ok_or_else(|| ManeuverError::variant_mismatch("plan", ManeuverVariant::Lateral))?;
        // 字段是公开的，可能绕过配置校验
        if secs <= 0.0 || Duration::try_from_secs_f64(secs).is_err() {
            return Err(ManeuverError::invalid_target(
                "nominal_duration_secs",
                format!("must be a positive, representable duration, got {}", secs),
            ));
        }

        let speed = inputs.current_speed().max(self.limits.min_speed());
        let length = Meters(speed.0 * secs);
        let interval = DistanceInterval::new(start_distance, start_distance + length)?;

        Ok(self.trajectory(inputs.current_lane(), interval))
    }

    fn solve_interval<I: ManeuverInputs + ?Sized>(
        &self,
        inputs: &I,
        interval: DistanceInterval,
    ) -> Result<Self::Trajectory> {
        Ok(self.trajectory(inputs.current_lane(), interval))
    }
}

/// 横向轨迹
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LateralTrajectory {
    interval: DistanceInterval,
    start_lane: LaneIndex,
    target_lane: LaneIndex,
    profile: CubicProfile,
}

impl LateralTrajectory {
    /// 起始车道
    pub fn start_lane(&self) -> LaneIndex {
        self.start_lane
    }

    /// 目标车道
    pub fn target_lane(&self) -> LaneIndex {
        self.target_lane
    }

    /// 位置对应的换道进度 [0, 1]
    pub fn progress_at(&self, position: Meters) -> f64 {
        self.interval.progress(position)
    }

    /// 位置对应的横向偏移（相对起始车道中心线）
    pub fn lateral_offset_at(&self, position: Meters) -> Meters {
        Meters(self.profile.value(self.progress_at(position)))
    }
}

impl Trajectory for LateralTrajectory {
    fn variant(&self) -> ManeuverVariant {
        ManeuverVariant::Lateral
    }

    fn interval(&self) -> DistanceInterval {
        self.interval
    }

    fn emit<C: GuidanceCommands + ?Sized>(&self, position: Meters, commands: &mut C) {
        let progress = self.progress_at(position);
        let lateral_offset = self.lateral_offset_at(position);
        trace!(
            "Lateral command at {}: {} -> {}, offset {}",
            position, self.start_lane, self.target_lane, lateral_offset
        );
        commands.send_lateral(LateralCommand {
            start_lane: self.start_lane,
            target_lane: self.target_lane,
            lateral_offset,
            progress,
        });
    }
}
