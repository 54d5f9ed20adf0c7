//! 持久状态与模式/故障状态机
//!
//! # 设计
//!
//! 所有跨周期的状态集中在 [`ShaperState`]，由控制器独占，
//! 每周期以 `&mut` 传入各整形器与 [`update_mode`] 恰好更新一次。
//!
//! 状态机只维护三个布尔量：
//! - 静止保持请求：静止上升沿置位（无静止计时器的车型除外），巡航离开静止状态即清除
//! - 取消请求：不存储，每周期由使能与巡航状态推导
//! - 告警锁存：应显示告警与锁存值不一致时翻转，并强制发送 HUD

use crate::intent::VisualAlert;
use carctl_params::PcmCruiseState;
use tracing::debug;

/// 跨周期持久状态
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShaperState {
    /// 上周期下发的转向力矩
    pub last_steer: i32,
    /// 加速度滞回锚点
    pub accel_steady: f64,
    /// 告警锁存
    pub alert_active: bool,
    /// 静止保持请求
    pub standstill_req: bool,
    /// 上周期是否静止
    pub last_standstill: bool,
    /// 踏板拦截器模式锁存
    pub use_interceptor: bool,
}

/// 状态机输入
#[derive(Debug, Clone, Copy)]
pub struct ModeInputs {
    pub enabled: bool,
    /// 上游显式取消请求
    pub cancel_requested: bool,
    pub standstill: bool,
    pub cruise_state: PcmCruiseState,
    pub hud_alert: VisualAlert,
    /// 车型不发送静止保持请求
    pub no_stop_timer: bool,
}

/// 状态机输出，供调度器使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeFlags {
    /// 本周期取消原厂巡航
    pub cancel: bool,
    /// 因失能而强制取消（上游未请求）
    pub forced_cancel: bool,
    pub standstill_req: bool,
    /// 本周期必须发送 HUD
    pub send_ui: bool,
    pub fcw_alert: bool,
    pub steer_alert: bool,
}

/// 取消请求
///
/// 上游请求，或者系统失能但原厂巡航仍处于激活状态。
#[inline]
pub fn cancel_request(cancel_requested: bool, enabled: bool, cruise_state: PcmCruiseState) -> bool {
    cancel_requested || (!enabled && cruise_state.is_active())
}

/// 更新模式状态
pub fn update_mode(state: &mut ShaperState, inputs: &ModeInputs) -> ModeFlags {
    let forced_cancel = !inputs.enabled && inputs.cruise_state.is_active();
    let cancel = cancel_request(inputs.cancel_requested, inputs.enabled, inputs.cruise_state);

    // 静止保持
    let was_requested = state.standstill_req;
    if inputs.standstill && !state.last_standstill && !inputs.no_stop_timer {
        state.standstill_req = true;
    }
    if !inputs.cruise_state.is_standstill() {
        state.standstill_req = false;
    }
    state.last_standstill = inputs.standstill;
    if state.standstill_req != was_requested {
        debug!("Standstill request {}", if state.standstill_req { "set" } else { "cleared" });
    }

    // 告警锁存
    let fcw_alert = inputs.hud_alert.is_fcw();
    let steer_alert = inputs.hud_alert.is_steer_alert();
    let should_alert = fcw_alert || steer_alert;

    let send_ui = if should_alert != state.alert_active {
        state.alert_active = should_alert;
        debug!("Alert latch -> {}", state.alert_active);
        true
    } else {
        // 强制取消会触发原厂故障提示音，借 HUD 报文换成正常提示音
        cancel
    };

    ModeFlags {
        cancel,
        forced_cancel,
        standstill_req: state.standstill_req,
        send_ui,
        fcw_alert,
        steer_alert,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> ModeInputs {
        ModeInputs {
            enabled: true,
            cancel_requested: false,
            standstill: false,
            cruise_state: PcmCruiseState::Other(1),
            hud_alert: VisualAlert::None,
            no_stop_timer: false,
        }
    }

    #[test]
    fn test_cancel_request() {
        let active = PcmCruiseState::Other(1);
        assert!(!cancel_request(false, true, active));
        assert!(cancel_request(false, false, active));
        assert!(cancel_request(true, true, active));
        assert!(!cancel_request(false, false, PcmCruiseState::Off));
        assert!(cancel_request(true, false, PcmCruiseState::Off));
    }

    #[test]
    fn test_forced_cancel_flag() {
        let mut state = ShaperState::default();
        let flags = update_mode(
            &mut state,
            &ModeInputs {
                enabled: false,
                ..inputs()
            },
        );
        assert!(flags.cancel);
        assert!(flags.forced_cancel);
        assert!(flags.send_ui);

        let flags = update_mode(
            &mut state,
            &ModeInputs {
                cancel_requested: true,
                ..inputs()
            },
        );
        assert!(flags.cancel);
        assert!(!flags.forced_cancel);
    }

    #[test]
    fn test_standstill_rising_edge() {
        let mut state = ShaperState::default();
        let stopped = ModeInputs {
            standstill: true,
            cruise_state: PcmCruiseState::Standstill,
            ..inputs()
        };

        let flags = update_mode(&mut state, &stopped);
        assert!(flags.standstill_req);
        assert!(state.last_standstill);

        // 保持静止：请求保持
        let flags = update_mode(&mut state, &stopped);
        assert!(flags.standstill_req);

        // 巡航离开静止状态：清除
        let flags = update_mode(
            &mut state,
            &ModeInputs {
                cruise_state: PcmCruiseState::Other(1),
                ..stopped
            },
        );
        assert!(!flags.standstill_req);

        // 没有新的上升沿，不再置位
        let flags = update_mode(&mut state, &stopped);
        assert!(!flags.standstill_req);
    }

    #[test]
    fn test_standstill_cleared_same_cycle() {
        // 上升沿但巡航状态不是静止：同一周期内置位又清除
        let mut state = ShaperState::default();
        let flags = update_mode(
            &mut state,
            &ModeInputs {
                standstill: true,
                ..inputs()
            },
        );
        assert!(!flags.standstill_req);
        assert!(state.last_standstill);
    }

    #[test]
    fn test_standstill_no_stop_timer() {
        let mut state = ShaperState::default();
        let flags = update_mode(
            &mut state,
            &ModeInputs {
                standstill: true,
                cruise_state: PcmCruiseState::Standstill,
                no_stop_timer: true,
                ..inputs()
            },
        );
        assert!(!flags.standstill_req);
    }

    #[test]
    fn test_alert_latch_toggles() {
        let mut state = ShaperState::default();

        let flags = update_mode(
            &mut state,
            &ModeInputs {
                hud_alert: VisualAlert::SteerRequired,
                ..inputs()
            },
        );
        assert!(flags.send_ui);
        assert!(flags.steer_alert);
        assert!(state.alert_active);

        // 告警持续：不再强制发送
        let flags = update_mode(
            &mut state,
            &ModeInputs {
                hud_alert: VisualAlert::Ldw,
                ..inputs()
            },
        );
        assert!(!flags.send_ui);

        // 告警消失：翻转并发送
        let flags = update_mode(&mut state, &inputs());
        assert!(flags.send_ui);
        assert!(!state.alert_active);

        let flags = update_mode(&mut state, &inputs());
        assert!(!flags.send_ui);
    }

    #[test]
    fn test_fcw_alert() {
        let mut state = ShaperState::default();
        let flags = update_mode(
            &mut state,
            &ModeInputs {
                hud_alert: VisualAlert::Fcw,
                ..inputs()
            },
        );
        assert!(flags.fcw_alert);
        assert!(!flags.steer_alert);
        assert!(flags.send_ui);
    }

    #[test]
    fn test_unrelated_alert_ignored() {
        let mut state = ShaperState::default();
        let flags = update_mode(
            &mut state,
            &ModeInputs {
                hud_alert: VisualAlert::SeatbeltUnbuckled,
                ..inputs()
            },
        );
        assert!(!flags.send_ui);
        assert!(!state.alert_active);
    }
}
