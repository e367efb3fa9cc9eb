//! Loop Runner - 机动执行循环
//!
//! 反复调用 `execute_time_step()` 直到机动完成，处理定时与 dt 钳位。
//!
//! # 两种模式
//!
//! - **仿真**（`realtime = false`）：不休眠，每个周期的 dt 等于标称周期，适合离线仿真和测试
//! - **实时**（`realtime = true`）：使用 `spin_sleep` 按标称频率定时，dt 为实测值并做钳位
//!
//! 每个周期先调用 `on_tick(dt)`（由调用方推进车辆或刷新输入），再执行机动。
//! 第一个周期的 dt 为 0。
//!
//! 机动错误原样向上传播；放弃机动即调用方停止循环，不存在单独的取消接口。
//!
//! ```rust,ignore
//! use guidance_maneuver::control::{LoopConfig, run_maneuver};
//!
//! let config = LoopConfig {
//!     frequency_hz: 50.0,
//!     max_iterations: Some(10_000),
//!     ..Default::default()
//! };
//!
//! let summary = run_maneuver(&mut planned, &config, |dt| vehicle.advance(dt))?;
//! assert!(summary.completed);
//! ```

use crate::config::ConfigError;
use crate::maneuver::ExecutableManeuver;
use crate::types::ManeuverError;
use spin_sleep::SpinSleeper;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// 执行循环错误
#[derive(Debug, Error)]
pub enum RunError {
    /// 循环配置无效
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 机动执行失败
    #[error(transparent)]
    Maneuver(#[from] ManeuverError),
}

/// 执行循环配置
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    /// 控制频率（Hz）
    pub frequency_hz: f64,

    /// dt 钳位倍数
    ///
    /// 实时模式下实测 dt 超过 `dt_clamp_multiplier / frequency_hz` 时被钳位。
    pub dt_clamp_multiplier: f64,

    /// 最大迭代次数（None 表示运行到完成为止）
    pub max_iterations: Option<usize>,

    /// 是否按墙钟时间定时
    pub realtime: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            frequency_hz: 100.0,
            dt_clamp_multiplier: 2.0,
            max_iterations: None,
            realtime: false,
        }
    }
}

impl LoopConfig {
    /// 校验参数
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frequency_hz.is_finite() && self.frequency_hz > 0.0) {
            return Err(ConfigError::Invalid {
                field: "frequency_hz",
                reason: format!("must be > 0, got {}", self.frequency_hz),
            });
        }
        if !(self.dt_clamp_multiplier.is_finite() && self.dt_clamp_multiplier > 0.0) {
            return Err(ConfigError::Invalid {
                field: "dt_clamp_multiplier",
                reason: format!("must be > 0, got {}", self.dt_clamp_multiplier),
            });
        }
        self.nominal_period()?;
        self.max_dt()?;
        if self.frequency_hz > 10000.0 {
            warn!(
                "Very high control frequency: {} Hz. This may cause performance issues.",
                self.frequency_hz
            );
        }
        Ok(())
    }

    /// 标称周期
    ///
    /// 周期必须能表示为非零的 `Duration`。
    pub fn nominal_period(&self) -> Result<Duration, ConfigError> {
        match Duration::try_from_secs_f64(1.0 / self.frequency_hz) {
            Ok(period) if !period.is_zero() => Ok(period),
            _ => Err(ConfigError::Invalid {
                field: "frequency_hz",
                reason: format!("period out of range at {} Hz", self.frequency_hz),
            }),
        }
    }

    /// 实时模式下 dt 的上限：`nominal_period * dt_clamp_multiplier`
    pub fn max_dt(&self) -> Result<Duration, ConfigError> {
        let period = self.nominal_period()?;
        Duration::try_from_secs_f64(period.as_secs_f64() * self.dt_clamp_multiplier).map_err(
            |_| ConfigError::Invalid {
                field: "dt_clamp_multiplier",
                reason: format!(
                    "clamp {} x {:?} is out of range",
                    self.dt_clamp_multiplier, period
                ),
            },
        )
    }
}

/// 执行循环结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// 执行的周期数
    pub ticks: usize,

    /// 机动是否完成（`false` 表示达到 `max_iterations`）
    pub completed: bool,

    /// 传给 `on_tick` 的 dt 累计值
    pub elapsed: Duration,
}

/// 运行机动直到完成
///
/// # 参数
///
/// - `maneuver`: 已规划的机动
/// - `config`: 循环配置
/// - `on_tick`: 每个周期在执行机动之前调用，参数为本周期 dt
///
/// # 返回
///
/// - `Ok(RunSummary)`: 机动完成，或达到 `max_iterations`
/// - `Err(RunError::Config)`: 配置无效（未执行任何周期）
/// - `Err(RunError::Maneuver)`: 机动执行失败
pub fn run_maneuver<M, F>(
    maneuver: &mut M,
    config: &LoopConfig,
    mut on_tick: F,
) -> Result<RunSummary, RunError>
where
    M: ExecutableManeuver + ?Sized,
    F: FnMut(Duration),
{
    config.validate()?;

    let nominal_period = config.nominal_period()?;
    let max_dt = config.max_dt()?;
    let sleeper = SpinSleeper::default();

    debug!(
        "Running {} maneuver over [{}, {}] at {} Hz",
        maneuver.variant(),
        maneuver.start_distance(),
        maneuver.end_distance(),
        config.frequency_hz
    );

    let mut last_time = Instant::now();
    let mut elapsed = Duration::ZERO;
    let mut ticks = 0;

    loop {
        if let Some(max_iter) = config.max_iterations
            && ticks >= max_iter
        {
            warn!(
                "Maneuver not complete after {} iterations, stopping loop",
                max_iter
            );
            return Ok(RunSummary {
                ticks,
                completed: false,
                elapsed,
            });
        }

        // 1. 计算 dt
        let now = Instant::now();
        let dt = if ticks == 0 {
            Duration::ZERO
        } else if config.realtime {
            let real_dt = now - last_time;
            if real_dt > max_dt {
                warn!("Time jump detected: {:?} > {:?}, clamping dt", real_dt, max_dt);
                max_dt
            } else {
                real_dt
            }
        } else {
            nominal_period
        };
        last_time = now;

        // 2. 推进外部状态
        on_tick(dt);
        elapsed += dt;

        // 3. 执行机动
        let done = maneuver.execute_time_step()?;
        ticks += 1;

        if done {
            return Ok(RunSummary {
                ticks,
                completed: true,
                elapsed,
            });
        }

        // 4. 休眠到下一个周期
        if config.realtime {
            let spent = now.elapsed();
            if spent < nominal_period {
                sleeper.sleep(nominal_period - spent);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ManeuverVariant, Meters, Phase, Result};

    /// 在第 `finish_at` 次执行时完成的假机动
    struct CountingManeuver {
        calls: usize,
        finish_at: usize,
        fail_at: Option<usize>,
        phase: Phase,
    }

    impl CountingManeuver {
        fn new(finish_at: usize) -> Self {
            Self {
                calls: 0,
                finish_at,
                fail_at: None,
                phase: Phase::Planned,
            }
        }
    }

    impl ExecutableManeuver for CountingManeuver {
        fn variant(&self) -> ManeuverVariant {
            ManeuverVariant::Longitudinal
        }

        fn phase(&self) -> Phase {
            self.phase
        }

        fn start_distance(&self) -> Meters {
            Meters(0.0)
        }

        fn end_distance(&self) -> Meters {
            Meters(10.0)
        }

        fn execute_time_step(&mut self) -> Result<bool> {
            self.calls += 1;
            if self.fail_at == Some(self.calls) {
                return Err(ManeuverError::PositionOutOfRange {
                    position: Meters(11.0),
                    start: Meters(0.0),
                    end: Meters(10.0),
                });
            }
            if self.calls >= self.finish_at {
                self.phase = Phase::Complete;
                Ok(true)
            } else {
                self.phase = Phase::Executing;
                Ok(false)
            }
        }
    }

    #[test]
    fn test_loop_config_default() {
        let config = LoopConfig::default();
        assert_eq!(config.frequency_hz, 100.0);
        assert_eq!(config.dt_clamp_multiplier, 2.0);
        assert!(config.max_iterations.is_none());
        assert!(!config.realtime);
        assert_eq!(config.nominal_period().unwrap(), Duration::from_millis(10));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut maneuver = CountingManeuver::new(1);
        for config in [
            LoopConfig {
                frequency_hz: 0.0,
                ..Default::default()
            },
            LoopConfig {
                dt_clamp_multiplier: -1.0,
                ..Default::default()
            },
        ] {
            let err = run_maneuver(&mut maneuver, &config, |_| {}).unwrap_err();
            assert!(matches!(err, RunError::Config(_)), "unexpected: {:?}", err);
        }
        assert_eq!(maneuver.calls, 0);
    }

    #[test]
    fn test_unrepresentable_period_rejected() {
        let mut maneuver = CountingManeuver::new(1);
        for (config, field) in [
            (
                LoopConfig {
                    frequency_hz: 1e-300,
                    ..Default::default()
                },
                "frequency_hz",
            ),
            (
                LoopConfig {
                    frequency_hz: 1e300,
                    ..Default::default()
                },
                "frequency_hz",
            ),
            (
                LoopConfig {
                    dt_clamp_multiplier: 1e300,
                    ..Default::default()
                },
                "dt_clamp_multiplier",
            ),
        ] {
            let err = run_maneuver(&mut maneuver, &config, |_| {}).unwrap_err();
            match err {
                RunError::Config(ConfigError::Invalid { field: f, .. }) => assert_eq!(f, field),
                other => panic!("unexpected: {:?}", other),
            }
        }
        assert_eq!(maneuver.calls, 0);
    }

    #[test]
    fn test_runs_until_complete() {
        let mut maneuver = CountingManeuver::new(5);
        let mut dts = Vec::new();
        let summary =
            run_maneuver(&mut maneuver, &LoopConfig::default(), |dt| dts.push(dt)).unwrap();

        assert!(summary.completed);
        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.elapsed, Duration::from_millis(40));
        assert_eq!(dts[0], Duration::ZERO);
        assert!(dts[1..].iter().all(|dt| *dt == Duration::from_millis(10)));
        assert!(maneuver.is_complete());
    }

    #[test]
    fn test_stops_at_max_iterations() {
        let mut maneuver = CountingManeuver::new(100);
        let config = LoopConfig {
            max_iterations: Some(3),
            ..Default::default()
        };
        let summary = run_maneuver(&mut maneuver, &config, |_| {}).unwrap();

        assert!(!summary.completed);
        assert_eq!(summary.ticks, 3);
        assert_eq!(maneuver.phase(), Phase::Executing);
    }

    #[test]
    fn test_maneuver_error_propagates() {
        let mut maneuver = CountingManeuver::new(10);
        maneuver.fail_at = Some(2);
        let err = run_maneuver(&mut maneuver, &LoopConfig::default(), |_| {}).unwrap_err();

        match err {
            RunError::Maneuver(inner) => assert!(inner.is_position_error()),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(maneuver.calls, 2);
    }

    #[test]
    fn test_realtime_dt_is_clamped() {
        let mut maneuver = CountingManeuver::new(3);
        let config = LoopConfig {
            frequency_hz: 1000.0,
            dt_clamp_multiplier: 2.0,
            max_iterations: Some(10),
            realtime: true,
        };
        let mut dts = Vec::new();
        let summary = run_maneuver(&mut maneuver, &config, |dt| {
            dts.push(dt);
            std::thread::sleep(Duration::from_millis(5));
        })
        .unwrap();

        assert!(summary.completed);
        // on_tick 休眠 5ms，超过 2ms 上限，之后的 dt 都被钳位
        assert!(dts[1..].iter().all(|dt| *dt <= Duration::from_millis(2)));
    }

    #[test]
    fn test_boxed_maneuver() {
        let mut boxed: Box<dyn ExecutableManeuver> = Box::new(CountingManeuver::new(2));
        let summary = run_maneuver(boxed.as_mut(), &LoopConfig::default(), |_| {}).unwrap();
        assert_eq!(summary.ticks, 2);
    }
}
