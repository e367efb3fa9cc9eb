//! # 机动配置
//!
//! 规划与执行使用的限制参数，可从 TOML 文件加载。
//!
//! ```toml
//! [longitudinal]
//! max_acceleration = 2.0
//! min_length = 5.0
//!
//! [lateral]
//! lane_width = 3.7
//! nominal_duration_secs = 4.0
//! min_speed = 2.0
//!
//! [execution]
//! position_tolerance = 0.0
//! ```
//!
//! 所有字段都有默认值，缺省的段或字段使用默认配置。

use crate::types::{Meters, MetersPerSecond, MetersPerSecondSquared};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读写配置文件失败
    #[error("Failed to access config file: {0}")]
    Io(#[from] io::Error),

    /// TOML 解析失败
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML 序列化失败
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// 参数无效
    #[error("Invalid config field '{field}': {reason}")]
    Invalid {
        /// 字段名
        field: &'static str,
        /// 原因
        reason: String,
    },
}

/// 机动配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManeuverConfig {
    /// 纵向机动限制
    pub longitudinal: LongitudinalLimits,

    /// 横向机动限制
    pub lateral: LateralLimits,

    /// 执行设置
    pub execution: ExecutionSettings,
}

impl ManeuverConfig {
    /// 从 TOML 字符串解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ManeuverConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// 校验参数
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive finite number, got {}", value),
                })
            }
        }

        fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a non-negative finite number, got {}", value),
                })
            }
        }

        positive("longitudinal.max_acceleration", self.longitudinal.max_acceleration)?;
        non_negative("longitudinal.min_length", self.longitudinal.min_length)?;
        positive("lateral.lane_width", self.lateral.lane_width)?;
        if let Some(secs) = self.lateral.nominal_duration_secs {
            positive("lateral.nominal_duration_secs", secs)?;
            if Duration::try_from_secs_f64(secs).is_err() {
                return Err(ConfigError::Invalid {
                    field: "lateral.nominal_duration_secs",
                    reason: format!("out of range, got {}", secs),
                });
            }
        }
        non_negative("lateral.min_speed", self.lateral.min_speed)?;
        non_negative("execution.position_tolerance", self.execution.position_tolerance)?;
        Ok(())
    }
}

/// 纵向机动限制
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongitudinalLimits {
    /// 速度变化的最大加速度（m/s²，绝对值）
    pub max_acceleration: f64,

    /// 计算得到的机动长度下限（m）
    ///
    /// 匀速机动的运动学长度为 0，使用此值作为其长度。
    pub min_length: f64,
}

impl LongitudinalLimits {
    /// 最大加速度
    pub fn max_acceleration(&self) -> MetersPerSecondSquared {
        MetersPerSecondSquared(self.max_acceleration)
    }

    /// 机动长度下限
    pub fn min_length(&self) -> Meters {
        Meters(self.min_length)
    }
}

impl Default for LongitudinalLimits {
    fn default() -> Self {
        Self {
            max_acceleration: 2.0, // m/s²
            min_length: 5.0,       // m
        }
    }
}

/// 横向机动限制
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LateralLimits {
    /// 车道宽度（m）
    pub lane_width: f64,

    /// 换道的标称时长（s）
    ///
    /// 未设置时横向机动不支持 `plan`，必须使用 `plan_to_target_distance`
    /// 由调用方给出终点距离。
    pub nominal_duration_secs: Option<f64>,

    /// 计算换道长度时使用的最低速度（m/s），避免低速时长度趋近于 0
    pub min_speed: f64,
}

impl LateralLimits {
    /// 车道宽度
    pub fn lane_width(&self) -> Meters {
        Meters(self.lane_width)
    }

    /// 换道标称时长
    ///
    /// 未设置或无法表示为 `Duration`（负数、非有限值、溢出）时为 `None`。
    pub fn nominal_duration(&self) -> Option<Duration> {
        self.nominal_duration_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// 最低速度
    pub fn min_speed(&self) -> MetersPerSecond {
        MetersPerSecond(self.min_speed)
    }
}

impl Default for LateralLimits {
    fn default() -> Self {
        Self {
            lane_width: 3.7, // m
            nominal_duration_secs: None,
            min_speed: 2.0, // m/s
        }
    }
}

/// 执行设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionSettings {
    /// 区间检查和完成判定的距离容差（m）
    ///
    /// 默认为 0，区间为闭区间 `[start, end]`。
    pub position_tolerance: f64,
}

impl ExecutionSettings {
    /// 距离容差
    pub fn position_tolerance(&self) -> Meters {
        Meters(self.position_tolerance)
    }
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            position_tolerance: 0.0,
        }
    }
}
