//! 机动生命周期集成测试
//!
//! 覆盖规划 → 执行的完整流程，包括类型化接口与运行时变体接口。

mod common;

use common::{MockRoute, RecordedCommand, RecordingCommands};
use guidance_maneuver::maneuver::DynamicManeuver;
use guidance_maneuver::prelude::*;

// ==================== Planning ====================

#[test]
fn test_longitudinal_speed_up_plan() {
    let route = MockRoute::at(100.0);
    let maneuver =
        LongitudinalManeuver::new(MetersPerSecond(10.0), MetersPerSecond(15.0)).unwrap();
    assert_eq!(maneuver.target_speed(), MetersPerSecond(15.0));

    let planned = maneuver
        .plan(route, RecordingCommands::new(), Meters(100.0))
        .unwrap();

    assert_eq!(planned.start_distance(), Meters(100.0));
    assert!(planned.end_distance() > Meters(100.0));
    assert_eq!(planned.trajectory().target_speed(), MetersPerSecond(15.0));
    assert_eq!(planned.phase(), Phase::Planned);
}

#[test]
fn test_dynamic_longitudinal_plan() {
    let mut maneuver = DynamicManeuver::longitudinal();
    maneuver
        .set_speeds(MetersPerSecond(10.0), MetersPerSecond(15.0))
        .unwrap();
    maneuver
        .plan(MockRoute::at(100.0), RecordingCommands::new(), Meters(100.0))
        .unwrap();

    assert_eq!(maneuver.start_distance(), Some(Meters(100.0)));
    assert!(maneuver.end_distance().unwrap() > Meters(100.0));
    assert_eq!(maneuver.target_speed(), Ok(MetersPerSecond(15.0)));
    assert_eq!(maneuver.phase(), Phase::Planned);
}

#[test]
fn test_plan_without_speeds() {
    let mut maneuver = DynamicManeuver::longitudinal();
    let err = maneuver
        .plan(MockRoute::default(), RecordingCommands::new(), Meters(0.0))
        .unwrap_err();

    assert!(matches!(err, ManeuverError::PreconditionUnset { .. }));
    assert_eq!(maneuver.phase(), Phase::Unplanned);

    // 类型化接口在构建时报告同样的错误
    let err = LongitudinalManeuver::builder().build().unwrap_err();
    assert!(matches!(err, ManeuverError::PreconditionUnset { .. }));
}

#[test]
fn test_lateral_plan_without_target_lane() {
    let mut maneuver = DynamicManeuver::lateral();
    let err = maneuver
        .plan_to_target_distance(
            MockRoute::default(),
            RecordingCommands::new(),
            Meters(0.0),
            Meters(30.0),
        )
        .unwrap_err();
    assert_eq!(
        err,
        ManeuverError::PreconditionUnset {
            target: "target_lane"
        }
    );
}

#[test]
fn test_lateral_calls_speed_getter() {
    let mut maneuver = DynamicManeuver::lateral();
    maneuver.set_target_lane(LaneIndex(2)).unwrap();

    let err = maneuver.target_speed().unwrap_err();
    assert!(matches!(
        err,
        ManeuverError::VariantMismatch {
            variant: ManeuverVariant::Lateral,
            ..
        }
    ));
}

#[test]
fn test_plan_to_target_distance_honors_caller_end() {
    let maneuver = LateralManeuver::new(LaneIndex(1));
    let planned = maneuver
        .plan_to_target_distance(
            MockRoute::new(50.0, 10.0, 0),
            RecordingCommands::new(),
            Meters(50.0),
            Meters(90.0),
        )
        .unwrap();

    assert_eq!(planned.start_distance(), Meters(50.0));
    assert_eq!(planned.end_distance(), Meters(90.0));

    let mut dynamic = DynamicManeuver::lateral();
    dynamic.set_target_lane(LaneIndex(1)).unwrap();
    dynamic
        .plan_to_target_distance(
            MockRoute::new(50.0, 10.0, 0),
            RecordingCommands::new(),
            Meters(50.0),
            Meters(90.0),
        )
        .unwrap();
    assert_eq!(dynamic.start_distance(), Some(Meters(50.0)));
    assert_eq!(dynamic.end_distance(), Some(Meters(90.0)));
}

#[test]
fn test_plan_to_target_distance_rejects_reversed_interval() {
    let maneuver =
        LongitudinalManeuver::new(MetersPerSecond(10.0), MetersPerSecond(10.0)).unwrap();
    let err = maneuver
        .plan_to_target_distance(
            MockRoute::default(),
            RecordingCommands::new(),
            Meters(90.0),
            Meters(50.0),
        )
        .unwrap_err();
    assert!(matches!(err, ManeuverError::InvalidInterval { .. }));
    assert!(err.is_planning_error());
}

// ==================== Execution ====================

#[test]
fn test_execute_before_position_reached() {
    let route = MockRoute::at(90.0);
    let commands = RecordingCommands::new();
    let maneuver =
        LongitudinalManeuver::new(MetersPerSecond(10.0), MetersPerSecond(10.0)).unwrap();
    let mut planned = maneuver
        .plan_to_target_distance(route.clone(), commands.clone(), Meters(100.0), Meters(150.0))
        .unwrap();

    let err = planned.execute_time_step().unwrap_err();
    assert_eq!(
        err,
        ManeuverError::PositionOutOfRange {
            position: Meters(90.0),
            start: Meters(100.0),
            end: Meters(150.0),
        }
    );
    assert!(commands.is_empty());
}

#[test]
fn test_execute_past_end_rejected() {
    let route = MockRoute::at(150.5);
    let maneuver =
        LongitudinalManeuver::new(MetersPerSecond(10.0), MetersPerSecond(10.0)).unwrap();
    let mut planned = maneuver
        .plan_to_target_distance(route, RecordingCommands::new(), Meters(100.0), Meters(150.0))
        .unwrap();

    assert!(planned.execute_time_step().unwrap_err().is_position_error());
}

#[test]
fn test_execute_to_completion() {
    let route = MockRoute::at(0.0);
    let commands = RecordingCommands::new();
    let maneuver =
        LongitudinalManeuver::new(MetersPerSecond(10.0), MetersPerSecond(10.0)).unwrap();
    let mut planned = maneuver
        .plan_to_target_distance(route.clone(), commands.clone(), Meters(0.0), Meters(20.0))
        .unwrap();

    for position in [0.0, 3.0, 7.5, 12.0, 19.0] {
        route.set_position(position);
        assert!(!planned.execute_time_step().unwrap(), "at {}", position);
        assert_eq!(planned.phase(), Phase::Executing);
    }

    route.set_position(20.0);
    assert!(planned.execute_time_step().unwrap());
    assert_eq!(planned.phase(), Phase::Complete);

    // 每个成功的周期写入一条匀速指令
    let sent = commands.longitudinal();
    assert_eq!(sent.len(), 6);
    assert!(sent.iter().all(|c| c.speed == MetersPerSecond(10.0)));
}

#[test]
fn test_execute_with_irregular_ticks() {
    let route = MockRoute::at(0.0);
    let mut planned = LongitudinalManeuver::new(MetersPerSecond(10.0), MetersPerSecond(10.0))
        .unwrap()
        .plan_to_target_distance(
            route.clone(),
            RecordingCommands::new(),
            Meters(0.0),
            Meters(20.0),
        )
        .unwrap();

    // 周期不均匀，位置可能停滞
    for position in [0.0, 0.0, 0.1, 9.9, 9.9, 19.99] {
        route.set_position(position);
        assert!(!planned.execute_time_step().unwrap());
    }
    route.set_position(20.0);
    assert!(planned.execute_time_step().unwrap());
    assert_eq!(planned.ticks(), 7);
}

#[test]
fn test_speed_up_commands_increase_monotonically() {
    let route = MockRoute::at(0.0);
    let commands = RecordingCommands::new();
    let mut planned = LongitudinalManeuver::new(MetersPerSecond(10.0), MetersPerSecond(15.0))
        .unwrap()
        .plan(route.clone(), commands.clone(), Meters(0.0))
        .unwrap();
    let end = planned.end_distance().value();

    let mut position = 0.0;
    loop {
        route.set_position(position);
        if planned.execute_time_step().unwrap() {
            break;
        }
        position = (position + 10.0).min(end);
    }

    let speeds: Vec<f64> = commands.longitudinal().iter().map(|c| c.speed.0).collect();
    assert!((speeds[0] - 10.0).abs() < 1e-9);
    assert!((speeds[speeds.len() - 1] - 15.0).abs() < 1e-9);
    assert!(speeds.windows(2).all(|w| w[1] >= w[0]));
    assert!(
        commands
            .longitudinal()
            .iter()
            .all(|c| c.max_acceleration == MetersPerSecondSquared(2.0))
    );
}

#[test]
fn test_lateral_execution_commands() {
    let route = MockRoute::new(50.0, 10.0, 0);
    let commands = RecordingCommands::new();
    let mut planned = LateralManeuver::new(LaneIndex(1))
        .plan_to_target_distance(route.clone(), commands.clone(), Meters(50.0), Meters(90.0))
        .unwrap();

    assert!(!planned.execute_time_step().unwrap());
    route.set_position(70.0);
    assert!(!planned.execute_time_step().unwrap());
    route.set_position(90.0);
    assert!(planned.execute_time_step().unwrap());

    let sent = commands.lateral();
    assert_eq!(sent.len(), 3);
    assert!(sent.iter().all(|c| c.start_lane == LaneIndex(0)));
    assert!(sent.iter().all(|c| c.target_lane == LaneIndex(1)));
    assert_eq!(sent[0].progress, 0.0);
    assert!((sent[1].lateral_offset.0 - 1.85).abs() < 1e-9);
    assert!((sent[2].lateral_offset.0 - 3.7).abs() < 1e-9);

    // 横向机动只写横向指令
    assert!(
        commands
            .all()
            .iter()
            .all(|c| matches!(c, RecordedCommand::Lateral(_)))
    );
}

#[test]
fn test_distances_stable_during_execution() {
    let route = MockRoute::at(10.0);
    let mut planned = LongitudinalManeuver::new(MetersPerSecond(20.0), MetersPerSecond(0.0))
        .unwrap()
        .plan(route.clone(), RecordingCommands::new(), Meters(10.0))
        .unwrap();
    let (start, end) = (planned.start_distance(), planned.end_distance());
    // 20 m/s 以 2 m/s² 减速到 0 需要 100 m
    assert_eq!(end, Meters(110.0));

    for position in [10.0, 40.0, 80.0] {
        route.set_position(position);
        planned.execute_time_step().unwrap();
        assert_eq!(planned.start_distance(), start);
        assert_eq!(planned.end_distance(), end);
    }
}

#[test]
fn test_dynamic_execute_to_completion() {
    let route = MockRoute::at(0.0);
    let mut maneuver = DynamicManeuver::longitudinal();
    maneuver
        .set_speeds(MetersPerSecond(8.0), MetersPerSecond(8.0))
        .unwrap();
    maneuver
        .plan_to_target_distance(
            route.clone(),
            RecordingCommands::new(),
            Meters(0.0),
            Meters(20.0),
        )
        .unwrap();

    assert!(!maneuver.execute_time_step().unwrap());
    route.set_position(20.0);
    assert!(maneuver.execute_time_step().unwrap());
    assert_eq!(maneuver.phase(), Phase::Complete);
    assert!(matches!(
        maneuver.execute_time_step(),
        Err(ManeuverError::InvalidPhase { .. })
    ));
}

#[test]
fn test_capabilities_returned_after_completion() {
    let commands = RecordingCommands::new();
    let mut planned = LongitudinalManeuver::new(MetersPerSecond(5.0), MetersPerSecond(5.0))
        .unwrap()
        .plan_to_target_distance(MockRoute::at(5.0), commands.clone(), Meters(0.0), Meters(5.0))
        .unwrap();
    assert!(planned.execute_time_step().unwrap());

    let (route, sink) = planned.into_parts();
    assert_eq!(route.snapshot().position, Meters(5.0));
    assert_eq!(sink.len(), 1);
    assert_eq!(commands.len(), 1);
}
