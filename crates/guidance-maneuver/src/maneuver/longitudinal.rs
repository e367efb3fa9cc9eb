//! 纵向机动
//!
//! 在距离域内以恒定加速度把速度从 `start_speed` 整形到 `target_speed`：
//!
//! ```text
//! v(s)² = v0² ± 2·a·(s − s0)
//! ```
//!
//! - `plan`：长度取运动学长度 `|v1² − v0²| / (2·a_max)` 与 `min_length` 的较大者
//! - `plan_to_target_distance`：长度由调用方给出，所需加速度超过 `a_max` 时拒绝
//!
//! 起止速度在构造时给出（`new` / `builder`），规划前不再可变。

use super::{DistanceInterval, Maneuver, Trajectory};
use crate::capability::{GuidanceCommands, LongitudinalCommand, ManeuverInputs};
use crate::config::{LongitudinalLimits, ManeuverConfig};
use crate::types::{
    ManeuverError, ManeuverVariant, Meters, MetersPerSecond, MetersPerSecondSquared, Result,
};
use tracing::trace;

/// 速度差小于此值视为匀速（m/s）
const STEADY_SPEED_EPSILON: f64 = 1e-3;

/// 纵向机动种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedChange {
    /// 匀速保持
    SteadySpeed,
    /// 加速
    SpeedUp,
    /// 减速
    SlowDown,
}

impl SpeedChange {
    /// 根据起止速度分类
    pub fn classify(start_speed: MetersPerSecond, target_speed: MetersPerSecond) -> Self {
        let delta = target_speed.0 - start_speed.0;
        if delta.abs() <= STEADY_SPEED_EPSILON {
            SpeedChange::SteadySpeed
        } else if delta > 0.0 {
            SpeedChange::SpeedUp
        } else {
            SpeedChange::SlowDown
        }
    }
}

fn validate_speed(target: &'static str, speed: MetersPerSecond) -> Result<()> {
    if !speed.is_finite() {
        return Err(ManeuverError::invalid_target(target, "must be finite"));
    }
    if speed < MetersPerSecond::ZERO {
        return Err(ManeuverError::invalid_target(
            target,
            format!("must be non-negative, got {}", speed),
        ));
    }
    Ok(())
}

/// 纵向机动（未规划）
#[derive(Debug, Clone, PartialEq)]
pub struct LongitudinalManeuver {
    start_speed: MetersPerSecond,
    target_speed: MetersPerSecond,
    limits: LongitudinalLimits,
    tolerance: Meters,
}

impl LongitudinalManeuver {
    /// 使用默认配置创建纵向机动
    ///
    /// # 错误
    ///
    /// 速度为负或非有限值时返回 `InvalidTarget`。
    pub fn new(start_speed: MetersPerSecond, target_speed: MetersPerSecond) -> Result<Self> {
        Self::with_config(start_speed, target_speed, &ManeuverConfig::default())
    }

    /// 使用指定配置创建纵向机动
    pub fn with_config(
        start_speed: MetersPerSecond,
        target_speed: MetersPerSecond,
        config: &ManeuverConfig,
    ) -> Result<Self> {
        validate_speed("start_speed", start_speed)?;
        validate_speed("target_speed", target_speed)?;

        Ok(Self {
            start_speed,
            target_speed,
            limits: config.longitudinal.clone(),
            tolerance: config.execution.position_tolerance(),
        })
    }

    /// 创建构建器
    pub fn builder() -> LongitudinalManeuverBuilder {
        LongitudinalManeuverBuilder::default()
    }

    /// 机动起点处的预期速度
    pub fn start_speed(&self) -> MetersPerSecond {
        self.start_speed
    }

    /// 机动终点处的目标速度
    pub fn target_speed(&self) -> MetersPerSecond {
        self.target_speed
    }

    /// 机动种类
    pub fn kind(&self) -> SpeedChange {
        SpeedChange::classify(self.start_speed, self.target_speed)
    }

    /// 纵向限制
    pub fn limits(&self) -> &LongitudinalLimits {
        &self.limits
    }

    /// 以 `a` 完成速度变化所需的距离
    fn distance_for(&self, acceleration: MetersPerSecondSquared) -> Meters {
        let dv2 = (self.target_speed.squared() - self.start_speed.squared()).abs();
        Meters(dv2 / (2.0 * acceleration.0))
    }

    /// 在 `length` 内完成速度变化所需的加速度
    fn acceleration_for(&self, length: Meters) -> MetersPerSecondSquared {
        if self.kind() == SpeedChange::SteadySpeed {
            return MetersPerSecondSquared::ZERO;
        }
        if length <= Meters::ZERO {
            return MetersPerSecondSquared(f64::INFINITY);
        }
        let dv2 = (self.target_speed.squared() - self.start_speed.squared()).abs();
        MetersPerSecondSquared(dv2 / (2.0 * length.0))
    }

    fn trajectory(
        &self,
        interval: DistanceInterval,
        acceleration: MetersPerSecondSquared,
    ) -> LongitudinalTrajectory {
        LongitudinalTrajectory {
            interval,
            start_speed: self.start_speed,
            target_speed: self.target_speed,
            acceleration,
            max_acceleration: self.limits.max_acceleration(),
            kind: self.kind(),
        }
    }
}

impl Maneuver for LongitudinalManeuver {
    type Trajectory = LongitudinalTrajectory;

    const VARIANT: ManeuverVariant = ManeuverVariant::Longitudinal;

    fn position_tolerance(&self) -> Meters {
        self.tolerance
    }

    fn solve<I: ManeuverInputs + ?Sized>(
        &self,
        inputs: &I,
        start_distance: Meters,
    ) -> Result<Self::Trajectory> {
        trace!(
            "Planning {:?}: {} -> {}, vehicle at {}",
            self.kind(),
            self.start_speed,
            self.target_speed,
            inputs.current_speed()
        );

        let kinematic = self.distance_for(self.limits.max_acceleration());
        let length = kinematic.max(self.limits.min_length());
        let interval = DistanceInterval::new(start_distance, start_distance + length)?;

        Ok(self.trajectory(interval, self.acceleration_for(length)))
    }

    fn solve_interval<I: ManeuverInputs + ?Sized>(
        &self,
        _inputs: &I,
        interval: DistanceInterval,
    ) -> Result<Self::Trajectory> {
        let required = self.acceleration_for(interval.length());
        let limit = self.limits.max_acceleration();
        if required > limit {
            return Err(ManeuverError::InfeasibleInterval { required, limit });
        }

        Ok(self.trajectory(interval, required))
    }
}

/// 纵向机动构建器
///
/// 缺少必需目标时 `build()` 返回 `PreconditionUnset`。
///
/// ```rust
/// use guidance_maneuver::maneuver::LongitudinalManeuver;
/// use guidance_maneuver::types::{ManeuverError, MetersPerSecond};
///
/// let err = LongitudinalManeuver::builder()
///     .target_speed(MetersPerSecond(15.0))
///     .build()
///     .unwrap_err();
/// assert_eq!(err, ManeuverError::PreconditionUnset { target: "start_speed" });
/// ```
#[derive(Debug, Clone, Default)]
pub struct LongitudinalManeuverBuilder {
    start_speed: Option<MetersPerSecond>,
    target_speed: Option<MetersPerSecond>,
    config: Option<ManeuverConfig>,
}

impl LongitudinalManeuverBuilder {
    /// 设置起点速度
    pub fn start_speed(mut self, speed: MetersPerSecond) -> Self {
        self.start_speed = Some(speed);
        self
    }

    /// 设置目标速度
    pub fn target_speed(mut self, speed: MetersPerSecond) -> Self {
        self.target_speed = Some(speed);
        self
    }

    /// 设置配置（默认使用 `ManeuverConfig::default()`）
    pub fn config(mut self, config: &ManeuverConfig) -> Self {
        self.config = Some(config.clone());
        self
    }

    /// 构建纵向机动
    pub fn build(self) -> Result<LongitudinalManeuver> {
        let start_speed = self.start_speed.ok_or(ManeuverError::PreconditionUnset {
            target: "start_speed",
        })?;
        let target_speed = self.target_speed.ok_or(ManeuverError::PreconditionUnset {
            target: "target_speed",
        })?;
        let config = self.config.unwrap_or_default();

        LongitudinalManeuver::with_config(start_speed, target_speed, &config)
    }
}

/// 纵向轨迹（距离域速度剖面）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongitudinalTrajectory {
    interval: DistanceInterval,
    start_speed: MetersPerSecond,
    target_speed: MetersPerSecond,
    acceleration: MetersPerSecondSquared,
    max_acceleration: MetersPerSecondSquared,
    kind: SpeedChange,
}

impl LongitudinalTrajectory {
    /// 起点速度
    pub fn start_speed(&self) -> MetersPerSecond {
        self.start_speed
    }

    /// 目标速度
    pub fn target_speed(&self) -> MetersPerSecond {
        self.target_speed
    }

    /// 规划使用的加速度（绝对值）
    pub fn acceleration(&self) -> MetersPerSecondSquared {
        self.acceleration
    }

    /// 机动种类
    pub fn kind(&self) -> SpeedChange {
        self.kind
    }

    /// 位置 `position` 处的速度设定值
    ///
    /// 区间外的位置钳位到区间端点。
    pub fn speed_at(&self, position: Meters) -> MetersPerSecond {
        if self.kind == SpeedChange::SteadySpeed {
            return self.target_speed;
        }

        let travelled =
            (position - self.interval.start()).clamp(Meters::ZERO, self.interval.length());
        let sign = match self.kind {
            SpeedChange::SpeedUp => 1.0,
            _ => -1.0,
        };
        let v2 = self.start_speed.squared() + sign * 2.0 * self.acceleration.0 * travelled.0;

        let low = self.start_speed.min(self.target_speed);
        let high = self.start_speed.max(self.target_speed);
        MetersPerSecond::from_squared(v2).clamp(low, high)
    }
}

impl Trajectory for LongitudinalTrajectory {
    fn variant(&self) -> ManeuverVariant {
        ManeuverVariant::Longitudinal
    }

    fn interval(&self) -> DistanceInterval {
        self.interval
    }

    fn emit<C: GuidanceCommands + ?Sized>(&self, position: Meters, commands: &mut C) {
        let speed = self.speed_at(position);
        trace!("Longitudinal command at {}: {}", position, speed);
        commands.send_longitudinal(LongitudinalCommand {
            speed,
            max_acceleration: self.max_acceleration,
        });
    }
}
