//! 报文地址与名称常量定义
//!
//! 地址与 Toyota DBC 保持一致，名称用于交给编码器查表。

// ============================================================================
// 总线编号
// ============================================================================

/// 动力总线（控制指令所在总线）
pub const BUS_PT: u8 = 0;

/// 雷达/DSU 总线
pub const BUS_RADAR: u8 = 1;

// ============================================================================
// 控制报文地址
// ============================================================================

/// LKA 转向力矩指令
pub const ID_STEERING_LKA: u32 = 0x2E4;

/// LTA 转角指令（TSS2 平台）
pub const ID_STEERING_LTA: u32 = 0x191;

/// ACC 加速度指令
pub const ID_ACC_CONTROL: u32 = 0x343;

/// PCM 巡航状态（Lexus IS 的取消指令复用此报文）
pub const ID_PCM_CRUISE: u32 = 0x1D2;

/// 油门踏板拦截器指令
pub const ID_GAS_COMMAND: u32 = 0x200;

/// 车道保持 HUD
pub const ID_LKAS_HUD: u32 = 0x412;

/// ACC HUD（前碰撞预警）
pub const ID_ACC_HUD: u32 = 0x411;

// ============================================================================
// 报文名称（编码器查表用）
// ============================================================================

pub const MSG_STEERING_LKA: &str = "STEERING_LKA";
pub const MSG_STEERING_LTA: &str = "STEERING_LTA";
pub const MSG_ACC_CONTROL: &str = "ACC_CONTROL";
pub const MSG_PCM_CRUISE: &str = "PCM_CRUISE";
pub const MSG_GAS_COMMAND: &str = "GAS_COMMAND";
pub const MSG_LKAS_HUD: &str = "LKAS_HUD";
pub const MSG_ACC_HUD: &str = "ACC_HUD";

/// 报文名称转地址
///
/// 未知名称返回 `None`。
pub fn address_of(name: &str) -> Option<u32> {
    match name {
        MSG_STEERING_LKA => Some(ID_STEERING_LKA),
        MSG_STEERING_LTA => Some(ID_STEERING_LTA),
        MSG_ACC_CONTROL => Some(ID_ACC_CONTROL),
        MSG_PCM_CRUISE => Some(ID_PCM_CRUISE),
        MSG_GAS_COMMAND => Some(ID_GAS_COMMAND),
        MSG_LKAS_HUD => Some(ID_LKAS_HUD),
        MSG_ACC_HUD => Some(ID_ACC_HUD),
        _ => None,
    }
}
