//! 单周期输入
//!
//! - [`ControlIntent`]：上游规划给出的执行意图，每周期重新提供
//! - [`VehicleState`]：车辆状态快照，只读
//!
//! 两者都不归控制器所有，控制器只在本周期内读取。

use carctl_params::{EpsSteerState, PcmCruiseState};
use num_enum::{FromPrimitive, IntoPrimitive};

/// HUD 告警类型
///
/// 未知取值按 `None` 处理（不点亮任何告警）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum VisualAlert {
    #[default]
    None = 0,
    /// 前向碰撞预警
    Fcw = 1,
    /// 需要驾驶员接管转向
    SteerRequired = 2,
    BrakePressed = 3,
    WrongGear = 4,
    SeatbeltUnbuckled = 5,
    SpeedTooHigh = 6,
    /// 车道偏离预警
    Ldw = 7,
}

impl VisualAlert {
    /// 是否点亮 FCW
    #[inline]
    pub fn is_fcw(self) -> bool {
        self == VisualAlert::Fcw
    }

    /// 是否点亮方向盘告警（接管请求或车道偏离）
    #[inline]
    pub fn is_steer_alert(self) -> bool {
        matches!(self, VisualAlert::SteerRequired | VisualAlert::Ldw)
    }
}

/// 执行意图
///
/// - `gas` ∈ [0, 1]，`brake` ∈ [0, 1]，纵向指令为 `gas - brake`
/// - `steer` ∈ [-1, 1]，最大力矩的比例
///
/// 越界值不会报错，由各整形器限幅；非有限值在周期入口被拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControlIntent {
    pub gas: f64,
    pub brake: f64,
    pub steer: f64,
    /// 上游请求取消原厂巡航
    pub cancel: bool,
    pub hud_alert: VisualAlert,
    pub left_line: bool,
    pub right_line: bool,
    /// 前方有车
    pub lead: bool,
    pub left_lane_depart: bool,
    pub right_lane_depart: bool,
}

impl ControlIntent {
    /// 只有纵向/横向指令的意图
    pub fn actuators(gas: f64, brake: f64, steer: f64) -> Self {
        Self {
            gas,
            brake,
            steer,
            ..Default::default()
        }
    }
}

/// 车辆状态快照
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VehicleState {
    /// 车速（m/s）
    pub v_ego: f64,
    /// 车辆静止
    pub standstill: bool,
    /// EPS 实测转向力矩（与指令同单位）
    pub steer_torque_eps: f64,
    /// PCM 巡航状态
    pub cruise_state: PcmCruiseState,
    /// EPS 转向状态
    pub steer_state: EpsSteerState,
}

impl VehicleState {
    /// 以给定车速行驶、巡航激活
    pub fn cruising(v_ego: f64) -> Self {
        Self {
            v_ego,
            cruise_state: PcmCruiseState::Other(1),
            ..Default::default()
        }
    }
}
