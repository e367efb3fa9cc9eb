//! # Guidance CLI
//!
//! Command-line maneuver simulator.
//!
//! 针对一维运动学车辆规划并执行单个机动，输出逐周期记录。
//!
//! ```bash
//! # 纵向：10 m/s 加速到 15 m/s，从 100 m 处开始
//! guidance-cli simulate --start 100 longitudinal --start-speed 10 --target-speed 15
//!
//! # 横向：车道 1 换到车道 2，终点 140 m，JSON 输出
//! guidance-cli simulate --start 100 --end 140 --format json lateral --from-lane 1 --to-lane 2
//!
//! # 配置管理
//! guidance-cli config init
//! guidance-cli config show
//! ```
//!
//! 日志级别由 `RUST_LOG` 控制，默认 `guidance_cli=info,guidance_maneuver=info`。

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod sim;

use commands::{ConfigCommand, RunArgs, SimulateCommand};

/// Guidance CLI - 机动仿真命令行工具
#[derive(Parser, Debug)]
#[command(name = "guidance-cli")]
#[command(about = "Command-line maneuver simulator for automated vehicle guidance", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 仿真一个机动
    Simulate {
        #[command(flatten)]
        args: RunArgs,

        #[command(subcommand)]
        maneuver: SimulateCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("guidance_cli=info".parse()?)
                .add_directive("guidance_maneuver=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { args, maneuver } => maneuver.execute(&args),

        Commands::Config(cmd) => cmd.execute(),
    }
}
