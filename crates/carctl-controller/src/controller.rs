//! 控制器入口
//!
//! [`CarController`] 每个控制周期调用一次，内部按固定顺序执行：
//!
//! ```text
//! 纵向整形 → 横向整形 → 模式状态机 → 报文调度 →（可选）编码
//! ```
//!
//! 控制器不做任何 IO，也不计时；帧序号由调用方提供并保证递增。

use carctl_params::{ControllerParams, VehicleProfile};
use carctl_protocol::{CanFrame, CanPacker};
use smallvec::SmallVec;
use tracing::{info, trace, warn};

use crate::error::{ControllerError, CycleError};
use crate::intent::{ControlIntent, VehicleState};
use crate::lateral::{LateralInputs, shape_lateral};
use crate::longitudinal::{LongitudinalInputs, shape_longitudinal};
use crate::scheduler::{MessageScheduler, OutboundMessageSet, ScheduleInputs};
use crate::state::{ModeInputs, ShaperState, update_mode};

/// 单周期编码后的帧
pub type FrameSet = SmallVec<[CanFrame; 16]>;

/// Toyota 车辆控制器
///
/// # 示例
///
/// ```rust
/// use carctl_controller::{CarController, ControlIntent, VehicleState};
/// use carctl_params::{CarModel, VehicleProfile};
///
/// let profile = VehicleProfile::for_model(CarModel::Rav4).with_roles(true, false);
/// let mut controller = CarController::new(&profile).unwrap();
///
/// let state = VehicleState::cruising(20.0);
/// let intent = ControlIntent::actuators(0.2, 0.0, 0.1);
/// let messages = controller.update(true, &state, 0, &intent).unwrap();
/// assert_eq!(messages[0].name(), "STEERING_LKA");
/// ```
#[derive(Debug)]
pub struct CarController {
    params: ControllerParams,
    has_interceptor: bool,
    no_stop_timer: bool,
    scheduler: MessageScheduler,
    state: ShaperState,
    steer_rate_limited: bool,
    last_accel: f64,
    /// 上周期是否处于强制取消（只用于日志去重）
    forced_cancel: bool,
}

impl CarController {
    /// 创建控制器
    ///
    /// # 错误
    ///
    /// - 角色集合为空，或替代 DSU 却不替代前视摄像头
    /// - 声明了踏板拦截器但不负责纵向控制
    /// - 可调常量或保活报文表非法
    pub fn new(profile: &VehicleProfile) -> Result<Self, ControllerError> {
        profile.validate()?;

        let roles = profile.roles();
        if roles.is_empty() {
            return Err(ControllerError::NoRoles);
        }
        if roles.has_dsu() && !roles.has_camera() {
            return Err(ControllerError::DsuWithoutCamera);
        }
        if profile.has_gas_interceptor && !profile.owns_longitudinal {
            return Err(ControllerError::InterceptorWithoutLongitudinal);
        }

        let scheduler = MessageScheduler::new(profile)?;
        info!(
            "Car controller created: model={}, roles={:?}, longitudinal={}, interceptor={}, statics={}",
            profile.car_model,
            roles,
            profile.owns_longitudinal,
            profile.has_gas_interceptor,
            scheduler.static_count()
        );

        Ok(Self {
            params: profile.params.clone(),
            has_interceptor: profile.has_gas_interceptor,
            no_stop_timer: profile.has_no_stop_timer(),
            scheduler,
            state: ShaperState::default(),
            steer_rate_limited: false,
            last_accel: 0.0,
            forced_cancel: false,
        })
    }

    /// 执行一个控制周期
    ///
    /// 输入含非有限数时返回 [`CycleError::NonFiniteInput`]，此时状态不变。
    pub fn update(
        &mut self,
        enabled: bool,
        vehicle: &VehicleState,
        frame: u64,
        intent: &ControlIntent,
    ) -> Result<OutboundMessageSet, CycleError> {
        check_finite(vehicle, intent)?;

        let longitudinal = shape_longitudinal(
            &LongitudinalInputs {
                gas: intent.gas,
                brake: intent.brake,
                enabled,
                speed: vehicle.v_ego,
                has_interceptor: self.has_interceptor,
            },
            &mut self.state,
            &self.params,
        );

        let lateral = shape_lateral(
            &LateralInputs {
                steer: intent.steer,
                enabled,
                measured_torque: vehicle.steer_torque_eps,
                steer_state: vehicle.steer_state,
            },
            &mut self.state,
            &self.params,
        );

        let flags = update_mode(
            &mut self.state,
            &ModeInputs {
                enabled,
                cancel_requested: intent.cancel,
                standstill: vehicle.standstill,
                cruise_state: vehicle.cruise_state,
                hud_alert: intent.hud_alert,
                no_stop_timer: self.no_stop_timer,
            },
        );

        if flags.forced_cancel && !self.forced_cancel {
            warn!(
                "Controller disabled while cruise is active (state {}), forcing cancel",
                vehicle.cruise_state.code()
            );
        }
        self.forced_cancel = flags.forced_cancel;
        self.steer_rate_limited = lateral.rate_limited;
        self.last_accel = longitudinal.accel;

        let messages = self.scheduler.schedule(&ScheduleInputs {
            frame,
            speed: vehicle.v_ego,
            longitudinal,
            lateral,
            flags,
            intent,
        });
        trace!(
            "Frame {}: {} messages, accel={:.3}, steer={}",
            frame,
            messages.len(),
            longitudinal.accel,
            lateral.torque
        );

        Ok(messages)
    }

    /// 执行一个控制周期并编码
    ///
    /// 任意一条报文编码失败时不返回任何帧，控制器状态回滚到本周期之前。
    pub fn update_frames<P: CanPacker + ?Sized>(
        &mut self,
        enabled: bool,
        vehicle: &VehicleState,
        frame: u64,
        intent: &ControlIntent,
        packer: &mut P,
    ) -> Result<FrameSet, CycleError> {
        let snapshot = (
            self.state,
            self.steer_rate_limited,
            self.last_accel,
            self.forced_cancel,
        );
        let messages = self.update(enabled, vehicle, frame, intent)?;

        let encoded: Result<FrameSet, _> = messages.iter().map(|m| m.encode(&mut *packer)).collect();
        match encoded {
            Ok(frames) => Ok(frames),
            Err(e) => {
                (
                    self.state,
                    self.steer_rate_limited,
                    self.last_accel,
                    self.forced_cancel,
                ) = snapshot;
                warn!("Frame {}: encoding failed, cycle discarded: {}", frame, e);
                Err(e.into())
            },
        }
    }

    /// 上周期限幅器是否改动了转向请求
    pub fn steer_rate_limited(&self) -> bool {
        self.steer_rate_limited
    }

    /// 上周期下发的加速度（m/s²）
    pub fn last_accel(&self) -> f64 {
        self.last_accel
    }

    /// 持久状态快照
    pub fn state(&self) -> ShaperState {
        self.state
    }

    pub fn params(&self) -> &ControllerParams {
        &self.params
    }

    pub fn scheduler(&self) -> &MessageScheduler {
        &self.scheduler
    }
}

fn check_finite(vehicle: &VehicleState, intent: &ControlIntent) -> Result<(), CycleError> {
    let values = [
        ("gas", intent.gas),
        ("brake", intent.brake),
        ("steer", intent.steer),
        ("v_ego", vehicle.v_ego),
        ("steer_torque_eps", vehicle.steer_torque_eps),
    ];
    for (field, value) in values {
        if !value.is_finite() {
            return Err(CycleError::NonFiniteInput { field, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use carctl_params::{CarModel, ControllerParams, PcmCruiseState};
    use carctl_protocol::{OutboundMessage, ProtocolError, Signal};

    struct FailingPacker;

    impl CanPacker for FailingPacker {
        fn make_can_msg(
            &mut self,
            name: &str,
            _bus: u8,
            _signals: &[Signal],
            _counter: Option<u64>,
        ) -> Result<CanFrame, ProtocolError> {
            Err(ProtocolError::UnknownMessage(name.to_string()))
        }
    }

    fn camera_only(model: CarModel) -> VehicleProfile {
        VehicleProfile::for_model(model).with_roles(true, false)
    }

    #[test]
    fn test_new_rejects_empty_roles() {
        let profile = VehicleProfile::for_model(CarModel::Rav4).with_roles(false, false);
        assert!(matches!(
            CarController::new(&profile),
            Err(ControllerError::NoRoles)
        ));
    }

    #[test]
    fn test_new_rejects_dsu_without_camera() {
        let profile = VehicleProfile::for_model(CarModel::Rav4).with_roles(false, true);
        assert!(matches!(
            CarController::new(&profile),
            Err(ControllerError::DsuWithoutCamera)
        ));
    }

    #[test]
    fn test_new_rejects_interceptor_without_longitudinal() {
        let profile = camera_only(CarModel::Corolla)
            .with_gas_interceptor(true)
            .with_longitudinal(false);
        assert!(matches!(
            CarController::new(&profile),
            Err(ControllerError::InterceptorWithoutLongitudinal)
        ));
    }

    #[test]
    fn test_new_rejects_invalid_params() {
        let profile = camera_only(CarModel::Corolla).with_params(ControllerParams {
            steer_max: 0,
            ..Default::default()
        });
        assert!(matches!(
            CarController::new(&profile),
            Err(ControllerError::Params(_))
        ));
    }

    #[test]
    fn test_non_finite_input_leaves_state() {
        let mut controller = CarController::new(&camera_only(CarModel::Rav4)).unwrap();
        let vehicle = VehicleState::cruising(20.0);
        controller
            .update(true, &vehicle, 0, &ControlIntent::actuators(0.5, 0.0, 0.5))
            .unwrap();
        let before = controller.state();

        let err = controller
            .update(true, &vehicle, 1, &ControlIntent::actuators(f64::NAN, 0.0, 0.5))
            .unwrap_err();
        assert!(matches!(err, CycleError::NonFiniteInput { field: "gas", .. }));

        let bad_vehicle = VehicleState {
            v_ego: f64::INFINITY,
            ..vehicle
        };
        let err = controller
            .update(true, &bad_vehicle, 1, &ControlIntent::default())
            .unwrap_err();
        assert!(matches!(err, CycleError::NonFiniteInput { field: "v_ego", .. }));

        assert_eq!(controller.state(), before);
    }

    #[test]
    fn test_telemetry_accessors() {
        let mut controller = CarController::new(&camera_only(CarModel::Rav4)).unwrap();
        let vehicle = VehicleState::cruising(20.0);
        controller
            .update(true, &vehicle, 0, &ControlIntent::actuators(0.3, 0.0, 0.5))
            .unwrap();
        assert!(controller.steer_rate_limited());
        assert!((controller.last_accel() - 0.72).abs() < 1e-9);
        assert_eq!(controller.state().last_steer, 10);
    }

    #[test]
    fn test_update_frames_all_or_nothing() {
        let mut controller = CarController::new(&camera_only(CarModel::Rav4)).unwrap();
        let vehicle = VehicleState::cruising(20.0);
        let before = controller.state();

        let err = controller
            .update_frames(
                true,
                &vehicle,
                0,
                &ControlIntent::actuators(0.3, 0.0, 0.5),
                &mut FailingPacker,
            )
            .unwrap_err();
        assert!(matches!(err, CycleError::Protocol(_)));
        assert_eq!(controller.state(), before);
        assert_eq!(controller.last_accel(), 0.0);
    }

    #[test]
    fn test_forced_cancel_on_disable() {
        let mut controller =
            CarController::new(&camera_only(CarModel::Rav4).with_longitudinal(false)).unwrap();
        let vehicle = VehicleState {
            cruise_state: PcmCruiseState::Other(1),
            ..VehicleState::cruising(20.0)
        };
        let messages = controller
            .update(false, &vehicle, 1, &ControlIntent::default())
            .unwrap();
        assert!(messages.iter().any(|m| matches!(
            m,
            OutboundMessage::Accel(cmd) if cmd.cancel
        )));
    }
}
