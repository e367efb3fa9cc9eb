//! 运行时变体的机动（兼容接口）
//!
//! 保留基于 setter 的经典接口：先创建指定变体的机动，再通过 `set_speeds` /
//! `set_target_lane` 注入目标，然后 `plan`，最后反复 `execute_time_step`。
//!
//! 与类型化接口不同，这里的变体错误只能在运行时发现，以 `VariantMismatch` 报告；
//! 阶段错误（规划后再设置目标、重复规划、未规划即执行）以 `InvalidPhase` 报告。
//!
//! 新代码应优先使用 [`LongitudinalManeuver`] / [`LateralManeuver`]。
//!
//! ```rust
//! use guidance_maneuver::maneuver::DynamicManeuver;
//! use guidance_maneuver::types::{LaneIndex, ManeuverError, ManeuverVariant};
//!
//! let mut maneuver = DynamicManeuver::lateral();
//! maneuver.set_target_lane(LaneIndex(2)).unwrap();
//!
//! let err = maneuver.target_speed().unwrap_err();
//! assert_eq!(
//!     err,
//!     ManeuverError::VariantMismatch {
//!         operation: "target_speed",
//!         variant: ManeuverVariant::Lateral,
//!     }
//! );
//! ```

use super::planned::ExecutableManeuver;
use super::{LateralManeuver, LongitudinalManeuver, Maneuver};
use crate::capability::{GuidanceCommands, ManeuverInputs};
use crate::config::ManeuverConfig;
use crate::types::{
    LaneIndex, ManeuverError, ManeuverVariant, Meters, MetersPerSecond, Phase, Result,
};

/// 运行时变体的机动
///
/// `'a` 是规划时传入的路径输入和指令接收端的生命周期，可以借用调用方的对象。
pub struct DynamicManeuver<'a> {
    variant: ManeuverVariant,
    config: ManeuverConfig,
    speeds: Option<(MetersPerSecond, MetersPerSecond)>,
    target_lane: Option<LaneIndex>,
    planned: Option<Box<dyn ExecutableManeuver + 'a>>,
}

impl<'a> DynamicManeuver<'a> {
    /// 创建指定变体的机动（默认配置）
    pub fn new(variant: ManeuverVariant) -> Self {
        Self::with_config(variant, ManeuverConfig::default())
    }

    /// 创建指定变体的机动
    pub fn with_config(variant: ManeuverVariant, config: ManeuverConfig) -> Self {
        Self {
            variant,
            config,
            speeds: None,
            target_lane: None,
            planned: None,
        }
    }

    /// 创建纵向机动
    pub fn longitudinal() -> Self {
        Self::new(ManeuverVariant::Longitudinal)
    }

    /// 创建横向机动
    pub fn lateral() -> Self {
        Self::new(ManeuverVariant::Lateral)
    }

    /// 变体标签
    pub fn variant(&self) -> ManeuverVariant {
        self.variant
    }

    /// 当前阶段
    pub fn phase(&self) -> Phase {
        self.planned
            .as_ref()
            .map_or(Phase::Unplanned, |planned| planned.phase())
    }

    fn require_variant(&self, operation: &'static str, variant: ManeuverVariant) -> Result<()> {
        if self.variant != variant {
            return Err(ManeuverError::variant_mismatch(operation, self.variant));
        }
        Ok(())
    }

    fn require_unplanned(&self, operation: &'static str) -> Result<()> {
        let phase = self.phase();
        if phase != Phase::Unplanned {
            return Err(ManeuverError::invalid_phase(operation, phase));
        }
        Ok(())
    }

    /// 设置起止速度（仅纵向，规划前）
    pub fn set_speeds(
        &mut self,
        start_speed: MetersPerSecond,
        target_speed: MetersPerSecond,
    ) -> Result<()> {
        self.require_variant("set_speeds", ManeuverVariant::Longitudinal)?;
        self.require_unplanned("set_speeds")?;
        self.speeds = Some((start_speed, target_speed));
        Ok(())
    }

    /// 起点速度（仅纵向）
    ///
    /// # 错误
    ///
    /// - `VariantMismatch`: 横向机动
    /// - `PreconditionUnset`: 尚未设置速度
    pub fn start_speed(&self) -> Result<MetersPerSecond> {
        self.require_variant("start_speed", ManeuverVariant::Longitudinal)?;
        self.speeds
            .map(|(start, _)| start)
            .ok_or(ManeuverError::PreconditionUnset {
                target: "start_speed",
            })
    }

    /// 目标速度（仅纵向）
    pub fn target_speed(&self) -> Result<MetersPerSecond> {
        self.require_variant("target_speed", ManeuverVariant::Longitudinal)?;
        self.speeds
            .map(|(_, target)| target)
            .ok_or(ManeuverError::PreconditionUnset {
                target: "target_speed",
            })
    }

    /// 设置目标车道（仅横向，规划前）
    pub fn set_target_lane(&mut self, lane: LaneIndex) -> Result<()> {
        self.require_variant("set_target_lane", ManeuverVariant::Lateral)?;
        self.require_unplanned("set_target_lane")?;
        self.target_lane = Some(lane);
        Ok(())
    }

    /// 目标车道（仅横向）
    pub fn target_lane(&self) -> Result<LaneIndex> {
        self.require_variant("target_lane", ManeuverVariant::Lateral)?;
        self.target_lane.ok_or(ManeuverError::PreconditionUnset {
            target: "target_lane",
        })
    }

    /// 规划机动，终点由机动自行计算
    ///
    /// # 错误
    ///
    /// - `InvalidPhase`: 已规划过
    /// - `PreconditionUnset`: 变体所需目标未设置
    /// - `VariantMismatch`: 横向机动未配置标称时长
    pub fn plan<I, C>(&mut self, inputs: I, commands: C, start_distance: Meters) -> Result<()>
    where
        I: ManeuverInputs + 'a,
        C: GuidanceCommands + 'a,
    {
        self.require_unplanned("plan")?;
        let planned: Box<dyn ExecutableManeuver + 'a> = match self.variant {
            ManeuverVariant::Longitudinal => {
                Box::new(self.typed_longitudinal()?.plan(inputs, commands, start_distance)?)
            },
            ManeuverVariant::Lateral => {
                Box::new(self.typed_lateral()?.plan(inputs, commands, start_distance)?)
            },
        };
        self.planned = Some(planned);
        Ok(())
    }

    /// 规划到调用方指定的终点距离
    ///
    /// # 错误
    ///
    /// - `InvalidPhase`: 已规划过
    /// - `PreconditionUnset`: 变体所需目标未设置
    /// - `InvalidInterval`: `end_distance < start_distance`
    pub fn plan_to_target_distance<I, C>(
        &mut self,
        inputs: I,
        commands: C,
        start_distance: Meters,
        end_distance: Meters,
    ) -> Result<()>
    where
        I: ManeuverInputs + 'a,
        C: GuidanceCommands + 'a,
    {
        self.require_unplanned("plan_to_target_distance")?;
        let planned: Box<dyn ExecutableManeuver + 'a> = match self.variant {
            ManeuverVariant::Longitudinal => {
                let maneuver = self.typed_longitudinal()?;
                Box::new(maneuver.plan_to_target_distance(
                    inputs,
                    commands,
                    start_distance,
                    end_distance,
                )?)
            },
            ManeuverVariant::Lateral => {
                let maneuver = self.typed_lateral()?;
                Box::new(maneuver.plan_to_target_distance(
                    inputs,
                    commands,
                    start_distance,
                    end_distance,
                )?)
            },
        };
        self.planned = Some(planned);
        Ok(())
    }

    /// 执行一个控制周期
    ///
    /// # 错误
    ///
    /// - `InvalidPhase`: 尚未规划或已完成
    /// - `PositionOutOfRange`: 当前位置不在区间内
    pub fn execute_time_step(&mut self) -> Result<bool> {
        match self.planned.as_mut() {
            Some(planned) => planned.execute_time_step(),
            None => Err(ManeuverError::invalid_phase(
                "execute_time_step",
                Phase::Unplanned,
            )),
        }
    }

    /// 起点距离，规划前为 `None`
    pub fn start_distance(&self) -> Option<Meters> {
        self.planned.as_ref().map(|planned| planned.start_distance())
    }

    /// 终点距离，规划前为 `None`
    pub fn end_distance(&self) -> Option<Meters> {
        self.planned.as_ref().map(|planned| planned.end_distance())
    }

    fn typed_longitudinal(&self) -> Result<LongitudinalManeuver> {
        let (start_speed, target_speed) = self.speeds.ok_or(ManeuverError::PreconditionUnset {
            target: "start_speed",
        })?;
        LongitudinalManeuver::with_config(start_speed, target_speed, &self.config)
    }

    fn typed_lateral(&self) -> Result<LateralManeuver> {
        let target_lane = self.target_lane.ok_or(ManeuverError::PreconditionUnset {
            target: "target_lane",
        })?;
        Ok(LateralManeuver::with_config(target_lane, &self.config))
    }
}

impl std::fmt::Debug for DynamicManeuver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicManeuver")
            .field("variant", &self.variant)
            .field("phase", &self.phase())
            .field("speeds", &self.speeds)
            .field("target_lane", &self.target_lane)
            .field("start_distance", &self.start_distance())
            .field("end_distance", &self.end_distance())
            .finish()
    }
}
