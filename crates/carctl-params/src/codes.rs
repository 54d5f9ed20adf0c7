//! 车辆上报的状态码

use num_enum::FromPrimitive;
use serde::{Deserialize, Serialize};

/// PCM 巡航状态（PCM_CRUISE.CRUISE_STATE）
///
/// 只区分控制逻辑关心的取值，其余归入 `Other`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
#[repr(u8)]
pub enum PcmCruiseState {
    /// 巡航关闭
    Off = 0,
    /// 巡航激活且车辆静止
    Standstill = 8,
    /// 其他激活状态
    #[num_enum(catch_all)]
    Other(u8),
}

impl PcmCruiseState {
    /// 原始状态码
    pub fn code(self) -> u8 {
        match self {
            PcmCruiseState::Off => 0,
            PcmCruiseState::Standstill => 8,
            PcmCruiseState::Other(code) => code,
        }
    }

    /// 原厂巡航是否仍处于激活状态
    pub fn is_active(self) -> bool {
        self != PcmCruiseState::Off
    }

    pub fn is_standstill(self) -> bool {
        self == PcmCruiseState::Standstill
    }
}

// num_enum 把 `#[default]` 当作 FromPrimitive 的兜底变体，与 catch_all 冲突，这里手写
impl Default for PcmCruiseState {
    fn default() -> Self {
        PcmCruiseState::Off
    }
}

impl From<PcmCruiseState> for u8 {
    fn from(state: PcmCruiseState) -> Self {
        state.code()
    }
}

/// EPS 转向状态（EPS_STATUS.LKA_STATE）
///
/// 是否视为故障由 `ControllerParams::steer_fault_codes` 决定，这里只给常见取值命名。
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
#[repr(u8)]
pub enum EpsSteerState {
    /// 待命
    Standby = 1,
    /// 正在执行转向指令
    Active = 5,
    /// 临时故障（通常由指令力矩跳变引起）
    TemporaryFault = 9,
    /// 永久故障
    PermanentFault = 25,
    #[num_enum(catch_all)]
    Other(u8),
}

impl EpsSteerState {
    pub fn code(self) -> u8 {
        match self {
            EpsSteerState::Standby => 1,
            EpsSteerState::Active => 5,
            EpsSteerState::TemporaryFault => 9,
            EpsSteerState::PermanentFault => 25,
            EpsSteerState::Other(code) => code,
        }
    }
}

impl Default for EpsSteerState {
    fn default() -> Self {
        EpsSteerState::Standby
    }
}

impl From<EpsSteerState> for u8 {
    fn from(state: EpsSteerState) -> Self {
        state.code()
    }
}
