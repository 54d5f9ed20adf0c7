//! 整形器与调度器的属性测试
//!
//! 使用 proptest 验证数值不变量。

use carctl_controller::longitudinal::{COAST_ACCEL_TABLE, accel_hysteresis};
use carctl_controller::{
    CarController, ControlIntent, VehicleState, VisualAlert, coast_accel, compute_gb_pedal,
};
use carctl_params::{CarModel, ControllerParams, EpsSteerState, PcmCruiseState, VehicleProfile};
use proptest::prelude::*;

const GAP: f64 = 0.06;

/// 单周期随机输入
#[derive(Debug, Clone)]
struct CycleInput {
    enabled: bool,
    gas: f64,
    brake: f64,
    steer: f64,
    speed: f64,
    measured: f64,
    fault: bool,
    standstill: bool,
    cruise: u8,
    alert: u8,
    cancel: bool,
}

fn cycle_input() -> impl Strategy<Value = CycleInput> {
    (
        any::<bool>(),
        0.0..1.0f64,
        0.0..1.0f64,
        -1.5..1.5f64,
        0.0..40.0f64,
        -2000.0..2000.0f64,
        prop::bool::weighted(0.05),
        any::<bool>(),
        prop::sample::select(vec![0u8, 1, 7, 8]),
        0u8..8,
        prop::bool::weighted(0.05),
    )
        .prop_map(
            |(enabled, gas, brake, steer, speed, measured, fault, standstill, cruise, alert, cancel)| {
                CycleInput {
                    enabled,
                    gas,
                    brake,
                    steer,
                    speed,
                    measured,
                    fault,
                    standstill,
                    cruise,
                    alert,
                    cancel,
                }
            },
        )
}

fn vehicle(input: &CycleInput) -> VehicleState {
    VehicleState {
        v_ego: input.speed,
        standstill: input.standstill,
        steer_torque_eps: input.measured,
        cruise_state: PcmCruiseState::from(input.cruise),
        steer_state: if input.fault {
            EpsSteerState::TemporaryFault
        } else {
            EpsSteerState::Active
        },
    }
}

fn intent(input: &CycleInput) -> ControlIntent {
    ControlIntent {
        gas: input.gas,
        brake: input.brake,
        steer: input.steer,
        cancel: input.cancel,
        hud_alert: VisualAlert::from(input.alert),
        ..Default::default()
    }
}

proptest! {
    /// 踏板开度总在 [0, 1]，且不高于滑行加速度时为 0
    #[test]
    fn gb_pedal_bounded(accel in -6.0..6.0f64, speed in 0.0..40.0f64) {
        let gas = compute_gb_pedal(accel, speed);
        prop_assert!((0.0..=1.0).contains(&gas));
        if accel <= coast_accel(speed) {
            prop_assert_eq!(gas, 0.0);
        }
    }

    /// 插值结果落在相邻标定点之间
    #[test]
    fn coast_accel_between_knots(speed in 0.0..10.0f64) {
        let value = coast_accel(speed);
        let lo = COAST_ACCEL_TABLE.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let hi = COAST_ACCEL_TABLE.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(value >= lo && value <= hi);

        for pair in COAST_ACCEL_TABLE.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            if speed >= x0 && speed <= x1 {
                prop_assert!(value >= y0.min(y1) - 1e-12 && value <= y0.max(y1) + 1e-12);
            }
        }
    }

    /// 带内输入不改变输出
    #[test]
    fn hysteresis_constant_inside_band(
        anchor in -1.0..1.0f64,
        offsets in prop::collection::vec(-GAP..GAP, 1..50),
    ) {
        let mut steady = anchor;
        for offset in offsets {
            let out = accel_hysteresis(anchor + offset, &mut steady, true, GAP);
            prop_assert_eq!(out, anchor);
        }
    }

    /// 超过 2 倍带宽的阶跃一个周期内跟上
    #[test]
    fn hysteresis_tracks_step(
        anchor in -1.0..1.0f64,
        step in (2.0 * GAP + 1e-6)..2.0f64,
        up in any::<bool>(),
    ) {
        let mut steady = anchor;
        let target = if up { anchor + step } else { anchor - step };
        let out = accel_hysteresis(target, &mut steady, true, GAP);
        let expected = if up { target - GAP } else { target + GAP };
        prop_assert!((out - expected).abs() < 1e-12);
    }

    /// 相邻周期的转向力矩变化不超过单步上限；失能或故障时为 0
    #[test]
    fn steer_rate_bounded(inputs in prop::collection::vec(cycle_input(), 1..200)) {
        let profile = VehicleProfile::for_model(CarModel::Rav4);
        let params = ControllerParams::default();
        let mut controller = CarController::new(&profile).unwrap();
        let mut last = 0i32;

        for (frame, input) in inputs.iter().enumerate() {
            controller.update(input.enabled, &vehicle(input), frame as u64, &intent(input)).unwrap();
            let torque = controller.state().last_steer;

            if !input.enabled || input.fault {
                prop_assert_eq!(torque, 0);
            } else {
                prop_assert!((torque - last).abs() <= params.max_steer_delta());
                prop_assert!(torque.abs() <= params.steer_max);
            }
            last = torque;
        }
    }

    /// 加速度与踏板指令总在限幅内
    #[test]
    fn longitudinal_outputs_bounded(inputs in prop::collection::vec(cycle_input(), 1..200)) {
        let profile = VehicleProfile::for_model(CarModel::Corolla).with_gas_interceptor(true);
        let params = ControllerParams::default();
        let mut controller = CarController::new(&profile).unwrap();

        for (frame, input) in inputs.iter().enumerate() {
            let messages = controller
                .update(input.enabled, &vehicle(input), frame as u64, &intent(input))
                .unwrap();
            let accel = controller.last_accel();
            prop_assert!(accel >= params.accel_min && accel <= params.accel_max);
            if !input.enabled {
                prop_assert_eq!(accel, 0.0);
            }
            for message in &messages {
                if let carctl_protocol::OutboundMessage::Gas(cmd) = message {
                    prop_assert!((0.0..=1.0).contains(&cmd.gas));
                }
            }
        }
    }

    /// 相同输入序列产生相同报文序列
    #[test]
    fn schedule_deterministic(inputs in prop::collection::vec(cycle_input(), 1..150)) {
        let profile = VehicleProfile::for_model(CarModel::Prius).with_gas_interceptor(true);
        let mut a = CarController::new(&profile).unwrap();
        let mut b = CarController::new(&profile).unwrap();

        for (frame, input) in inputs.iter().enumerate() {
            let out_a = a.update(input.enabled, &vehicle(input), frame as u64, &intent(input)).unwrap();
            let out_b = b.update(input.enabled, &vehicle(input), frame as u64, &intent(input)).unwrap();
            prop_assert_eq!(out_a, out_b);
        }
    }
}
