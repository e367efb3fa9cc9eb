//! 仿真命令
//!
//! 针对仿真车辆规划一个机动，用执行循环跑到完成，并输出逐周期记录。

use crate::commands::config::load_config;
use crate::sim::{SimVehicle, TickRecord};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use guidance_maneuver::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// 公共运行参数
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 机动起点距离（m）
    #[arg(long, default_value_t = 0.0, global = true)]
    pub start: f64,

    /// 机动终点距离（m），给出时使用 plan_to_target_distance
    #[arg(long, global = true)]
    pub end: Option<f64>,

    /// 控制频率（Hz）
    #[arg(short, long, default_value_t = 20.0, global = true)]
    pub frequency: f64,

    /// 最大周期数
    #[arg(long, default_value_t = 100_000, global = true)]
    pub max_ticks: usize,

    /// 按墙钟时间运行
    #[arg(long, global = true)]
    pub realtime: bool,

    /// 输出格式（table / json）
    #[arg(long, default_value = "table", global = true)]
    pub format: String,
}

/// 仿真命令
#[derive(Subcommand, Debug)]
pub enum SimulateCommand {
    /// 纵向机动（速度整形）
    Longitudinal {
        /// 起点速度（m/s）
        #[arg(long)]
        start_speed: f64,

        /// 目标速度（m/s）
        #[arg(long)]
        target_speed: f64,

        /// 所在车道
        #[arg(long, default_value_t = 1)]
        lane: i32,
    },

    /// 横向机动（换道）
    Lateral {
        /// 起始车道
        #[arg(long)]
        from_lane: i32,

        /// 目标车道
        #[arg(long)]
        to_lane: i32,

        /// 车速（m/s）
        #[arg(long, default_value_t = 10.0)]
        speed: f64,
    },
}

impl SimulateCommand {
    pub fn execute(self, args: &RunArgs) -> Result<()> {
        let config = load_config(args.config.as_deref())?;
        let records = self.run(args, &config)?;
        print_records(&records, &args.format)
    }

    /// 规划并运行机动，返回逐周期记录
    pub fn run(self, args: &RunArgs, config: &ManeuverConfig) -> Result<Vec<TickRecord>> {
        let start = Meters(args.start);

        match self {
            SimulateCommand::Longitudinal {
                start_speed,
                target_speed,
                lane,
            } => {
                let vehicle =
                    SimVehicle::new(start, MetersPerSecond(start_speed), LaneIndex(lane));
                let maneuver = LongitudinalManeuver::with_config(
                    MetersPerSecond(start_speed),
                    MetersPerSecond(target_speed),
                    config,
                )?;
                info!(
                    "Simulating {:?}: {} -> {}",
                    maneuver.kind(),
                    maneuver.start_speed(),
                    maneuver.target_speed()
                );

                let mut planned = match args.end {
                    Some(end) => maneuver.plan_to_target_distance(
                        vehicle.clone(),
                        vehicle.clone(),
                        start,
                        Meters(end),
                    )?,
                    None => maneuver.plan(vehicle.clone(), vehicle.clone(), start)?,
                };
                drive(&mut planned, &vehicle, args)
            },

            SimulateCommand::Lateral {
                from_lane,
                to_lane,
                speed,
            } => {
                let vehicle =
                    SimVehicle::new(start, MetersPerSecond(speed), LaneIndex(from_lane));
                let maneuver = LateralManeuver::with_config(LaneIndex(to_lane), config);
                info!("Simulating lane change: lane {} -> lane {}", from_lane, to_lane);

                let mut planned = match args.end {
                    Some(end) => maneuver.plan_to_target_distance(
                        vehicle.clone(),
                        vehicle.clone(),
                        start,
                        Meters(end),
                    )?,
                    None => maneuver
                        .plan(vehicle.clone(), vehicle.clone(), start)
                        .context("横向机动需要配置 lateral.nominal_duration_secs 或指定 --end")?,
                };
                drive(&mut planned, &vehicle, args)
            },
        }
    }
}

/// 用执行循环把机动跑到完成
fn drive<M>(maneuver: &mut M, vehicle: &SimVehicle, args: &RunArgs) -> Result<Vec<TickRecord>>
where
    M: ExecutableManeuver + ?Sized,
{
    let config = LoopConfig {
        frequency_hz: args.frequency,
        max_iterations: Some(args.max_ticks),
        realtime: args.realtime,
        ..Default::default()
    };
    let horizon = maneuver.end_distance();

    // 每条记录是一次执行之后的车辆状态
    let mut records = Vec::new();
    let mut time = Duration::ZERO;
    let mut first = true;
    let summary = run_maneuver(maneuver, &config, |dt| {
        if !first {
            records.push(TickRecord::new(records.len(), time, &vehicle.snapshot()));
        }
        first = false;
        vehicle.advance(dt, horizon);
        time += dt;
    })?;
    records.push(TickRecord::new(records.len(), time, &vehicle.snapshot()));

    if !summary.completed {
        anyhow::bail!(
            "机动未在 {} 个周期内完成（当前位置 {}，终点 {}）",
            summary.ticks,
            vehicle.snapshot().position,
            horizon
        );
    }

    info!(
        "Maneuver complete: {} ticks, {:.2} s simulated",
        summary.ticks,
        summary.elapsed.as_secs_f64()
    );
    Ok(records)
}

fn print_records(records: &[TickRecord], format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(records)?);
        },
        "table" => {
            println!(
                "{:>6} {:>9} {:>12} {:>11} {:>5} {:>10}",
                "tick", "time[s]", "position[m]", "speed[m/s]", "lane", "offset[m]"
            );
            for r in records {
                println!(
                    "{:>6} {:>9.2} {:>12.3} {:>11.3} {:>5} {:>10.3}",
                    r.tick, r.time_s, r.position_m, r.speed_mps, r.lane, r.lateral_offset_m
                );
            }
        },
        other => anyhow::bail!("未知输出格式: {}（支持 table / json）", other),
    }
    Ok(())
}
