//! 配置管理命令
//!
//! 机动配置默认存放在 `<config_dir>/guidance/maneuver.toml`，
//! 所有命令都可以用 `--config` 覆盖路径。

use anyhow::{Context, Result};
use clap::Subcommand;
use guidance_maneuver::ManeuverConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 默认配置文件路径
pub fn default_config_file() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
    path.push("guidance");
    path.push("maneuver.toml");
    Ok(path)
}

/// 加载配置
///
/// - 显式给出的路径必须存在
/// - 未给出时尝试默认路径，不存在则使用默认配置
pub fn load_config(explicit: Option<&Path>) -> Result<ManeuverConfig> {
    if let Some(path) = explicit {
        return ManeuverConfig::load_from_file(path)
            .with_context(|| format!("加载配置文件失败: {}", path.display()));
    }

    let path = default_config_file()?;
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(ManeuverConfig::default());
    }

    ManeuverConfig::load_from_file(&path)
        .with_context(|| format!("加载配置文件失败: {}", path.display()))
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 写入默认配置
    Init {
        /// 配置文件路径（默认使用用户配置目录）
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },

    /// 显示生效的配置
    Show {
        /// 配置文件路径
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// 校验配置文件
    Check {
        /// 配置文件路径
        path: PathBuf,
    },
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            ConfigCommand::Init { config, force } => Self::init_(config, force),

            ConfigCommand::Show { config } => Self::show_(config.as_deref()),

            ConfigCommand::Check { path } => Self::check_(&path),
        }
    }

    fn init_(config: Option<PathBuf>, force: bool) -> Result<()> {
        let path = match config {
            Some(path) => path,
            None => default_config_file()?,
        };

        if path.exists() && !force {
            anyhow::bail!("配置文件已存在: {}（使用 --force 覆盖）", path.display());
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("创建配置目录失败")?;
        }

        ManeuverConfig::default()
            .save_to_file(&path)
            .context("写入配置文件失败")?;
        println!("✅ 已写入默认配置: {}", path.display());
        Ok(())
    }

    fn show_(config: Option<&Path>) -> Result<()> {
        let config = load_config(config)?;
        print!("{}", config.to_toml_string()?);
        Ok(())
    }

    fn check_(path: &Path) -> Result<()> {
        let config = ManeuverConfig::load_from_file(path)
            .with_context(|| format!("配置无效: {}", path.display()))?;

        println!("✅ 配置有效: {}", path.display());
        println!("  最大加速度: {}", config.longitudinal.max_acceleration());
        println!("  最小长度: {}", config.longitudinal.min_length());
        println!("  车道宽度: {}", config.lateral.lane_width());
        match config.lateral.nominal_duration() {
            Some(duration) => println!("  换道标称时长: {:?}", duration),
            None => println!("  换道标称时长: (未设置，横向机动需指定 --end)"),
        }
        Ok(())
    }
}
