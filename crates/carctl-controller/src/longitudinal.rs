//! 纵向整形
//!
//! # 算法
//!
//! ```text
//! cmd = gas - brake
//! 拦截器模式（低速锁存）: pedal = gb_pedal(cmd * scale, v)，cmd = offset - brake
//! cmd = hysteresis(cmd)
//! accel = clip(cmd * scale, accel_min, accel_max)
//! ```
//!
//! 拦截器模式在车速低于 `min_acc_speed` 时进入，
//! 超过 `min_acc_speed + pedal_hyst_gap` 才退出，避免在边界附近来回切换。

use crate::state::ShaperState;
use carctl_params::{ControllerParams, MPH_TO_MS};
use tracing::debug;

// ============================================================================
// 踏板标定
// ============================================================================

/// 滑行加速度标定表（车速 m/s，加速度 m/s²）
///
/// 最后一个点的车速为原厂 ACC 最低可用车速（19 mph）。
pub const COAST_ACCEL_TABLE: [(f64, f64); 9] = [
    (0.01, 0.0),
    (0.21, 0.425),
    (0.3107, 0.535),
    (0.431, 0.555),
    (0.777, 0.438),
    (1.928, 0.265),
    (2.66, -0.179),
    (3.336, -0.250),
    (19.0 * MPH_TO_MS, -0.145),
];

// 加速度项系数
const A5: f64 = -0.007963770877144415;
const A6: f64 = 0.15947881013161083;
const A9: f64 = -0.1334422448911381;

// 车速偏置项系数
const S1: f64 = 0.0019638460320592194;
const S2: f64 = -0.0018659661194108225;
const S3: f64 = 0.021688122969402018;
const OFFSET: f64 = 0.027007983705385548;

/// 分段线性插值，区间外取端点值
fn interp(x: f64, table: &[(f64, f64)]) -> f64 {
    let Some(&(x_first, y_first)) = table.first() else {
        return 0.0;
    };
    if x <= x_first {
        return y_first;
    }
    for pair in table.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x == x1 {
            return y1;
        }
        if x < x1 {
            return y0 + (x - x0) * (y1 - y0) / (x1 - x0);
        }
    }
    table.last().map_or(y_first, |&(_, y)| y)
}

/// 给定车速下松开踏板时的滑行加速度
pub fn coast_accel(speed: f64) -> f64 {
    interp(speed, &COAST_ACCEL_TABLE)
}

/// 加速度 → 踏板开度
///
/// 目标加速度不高于滑行加速度时输出 0，否则
///
/// ```text
/// speed_offset = (s1*a + s2)*v² + s3*v + offset
/// accel_part   = (a5*v + a9)*a² + a6*a
/// ```
///
/// 结果限幅到 [0, 1]。
pub fn compute_gb_pedal(accel: f64, speed: f64) -> f64 {
    if accel <= coast_accel(speed) {
        return 0.0;
    }
    let speed_offset = (S1 * accel + S2) * speed * speed + S3 * speed + OFFSET;
    let accel_part = (A5 * speed + A9) * accel * accel + A6 * accel;
    (accel_part + speed_offset).clamp(0.0, 1.0)
}

// ============================================================================
// 滞回
// ============================================================================

/// 加速度滞回
///
/// 指令在锚点 ± gap 内变化时保持锚点不变；超出后锚点跟随到距指令一个 gap 处。
/// 失能时锚点归零。返回更新后的锚点。
pub fn accel_hysteresis(accel: f64, anchor: &mut f64, enabled: bool, gap: f64) -> f64 {
    if !enabled {
        *anchor = 0.0;
    } else if accel > *anchor + gap {
        *anchor = accel - gap;
    } else if accel < *anchor - gap {
        *anchor = accel + gap;
    }
    *anchor
}

// ============================================================================
// 整形
// ============================================================================

/// 纵向整形输入
#[derive(Debug, Clone, Copy)]
pub struct LongitudinalInputs {
    pub gas: f64,
    pub brake: f64,
    pub enabled: bool,
    pub speed: f64,
    pub has_interceptor: bool,
}

/// 纵向整形输出
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LongitudinalOutput {
    /// 加速度指令（m/s²）
    pub accel: f64,
    /// 踏板拦截器开度，未使用时为 0
    pub interceptor_gas: f64,
}

/// 计算本周期的纵向指令
///
/// 更新 `state.accel_steady` 与 `state.use_interceptor`。
pub fn shape_longitudinal(
    inputs: &LongitudinalInputs,
    state: &mut ShaperState,
    params: &ControllerParams,
) -> LongitudinalOutput {
    let mut interceptor_gas = 0.0;
    let mut accel_cmd = inputs.gas - inputs.brake;

    if inputs.has_interceptor {
        let was_latched = state.use_interceptor;
        if inputs.speed < params.min_acc_speed {
            state.use_interceptor = true;
        } else if inputs.speed > params.min_acc_speed + params.pedal_hyst_gap {
            state.use_interceptor = false;
        }
        if state.use_interceptor != was_latched {
            debug!(
                "Interceptor mode {} at {:.2} m/s",
                if state.use_interceptor { "engaged" } else { "released" },
                inputs.speed
            );
        }

        if state.use_interceptor && inputs.enabled {
            interceptor_gas = compute_gb_pedal(accel_cmd * params.accel_scale, inputs.speed);
            // 踏板负责驱动，ACC 通道只保留制动和一点正向偏置
            accel_cmd = params.interceptor_accel_offset - inputs.brake;
        }
    }

    let steady = accel_hysteresis(
        accel_cmd,
        &mut state.accel_steady,
        inputs.enabled,
        params.accel_hyst_gap,
    );
    let accel = (steady * params.accel_scale).clamp(params.accel_min, params.accel_max);

    LongitudinalOutput {
        accel,
        interceptor_gas: interceptor_gas.clamp(0.0, 1.0),
    }
}
