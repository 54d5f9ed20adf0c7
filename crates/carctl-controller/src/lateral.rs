//! 横向整形
//!
//! 请求比例 × `steer_max` 取整后，经 Toyota 力矩限幅器：
//!
//! 1. 以 EPS 实测力矩 `T` 为中心，允许偏差 `steer_error_max`，总幅值不超过 `steer_max`
//! 2. 相对上周期指令，远离零点最多 `steer_delta_up`，回落最多 `steer_delta_down`
//!
//! 失能或 EPS 处于故障状态时直接输出 0（立即切断，不经过限速）。

use crate::state::ShaperState;
use carctl_params::{ControllerParams, EpsSteerState};

/// Toyota 电机力矩限幅
///
/// 返回值与 `last` 的差不超过 `max(steer_delta_up, steer_delta_down)`。
pub fn apply_toyota_steer_torque_limits(
    requested: i32,
    last: i32,
    measured: f64,
    params: &ControllerParams,
) -> i32 {
    let steer_max = f64::from(params.steer_max);
    let error_max = f64::from(params.steer_error_max);
    let up = f64::from(params.steer_delta_up);
    let down = f64::from(params.steer_delta_down);
    let last_f = f64::from(last);

    // 不能偏离 EPS 实测力矩太远
    let max_lim = (measured + error_max).max(error_max).min(steer_max);
    let min_lim = (measured - error_max).min(-error_max).max(-steer_max);
    let mut apply = f64::from(requested).clamp(min_lim, max_lim);

    // 远离零点慢，回落快
    apply = if last > 0 {
        apply.clamp((last_f - down).max(-up), last_f + up)
    } else {
        apply.clamp(last_f - up, (last_f + down).min(up))
    };

    apply.round_ties_even() as i32
}

/// 横向整形输入
#[derive(Debug, Clone, Copy)]
pub struct LateralInputs {
    /// 请求力矩比例
    pub steer: f64,
    pub enabled: bool,
    /// EPS 实测力矩
    pub measured_torque: f64,
    pub steer_state: EpsSteerState,
}

/// 横向整形输出
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LateralOutput {
    /// 下发力矩
    pub torque: i32,
    /// 转向请求位
    pub request: bool,
    /// 限幅器是否改动了请求值
    pub rate_limited: bool,
}

/// 计算本周期的转向指令
///
/// 更新 `state.last_steer`。
pub fn shape_lateral(
    inputs: &LateralInputs,
    state: &mut ShaperState,
    params: &ControllerParams,
) -> LateralOutput {
    let requested = (inputs.steer * f64::from(params.steer_max)).round_ties_even() as i32;
    let mut torque = apply_toyota_steer_torque_limits(
        requested,
        state.last_steer,
        inputs.measured_torque,
        params,
    );
    let rate_limited = requested != torque;

    let request = if !inputs.enabled || params.is_steer_fault(inputs.steer_state.code()) {
        torque = 0;
        false
    } else {
        true
    };

    state.last_steer = torque;
    LateralOutput {
        torque,
        request,
        rate_limited,
    }
}
