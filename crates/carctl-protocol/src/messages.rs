//! 逻辑出站消息定义
//!
//! 每个结构体对应一条出站报文，提供：
//! - `signals()`：交给编码器的信号值
//! - `counter()`：显式计数器（如有）
//!
//! 固定信号（`SET_ME_*`）的取值来自原厂控制器抓包，不可修改。

use crate::ids::*;
use crate::packer::{CanPacker, SignalList};
use crate::{CanFrame, ProtocolError};
use smallvec::smallvec;

/// 踏板指令使能阈值
///
/// 低于此值视为零，拦截器不使能。
pub const GAS_ENABLE_THRESHOLD: f64 = 0.001;

/// 踏板信号满量程
pub const GAS_COMMAND_SCALE: f64 = 255.0;

#[inline]
fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

// ============================================================================
// 转向指令
// ============================================================================

/// LKA 转向力矩指令 (0x2E4)
///
/// 每个控制周期发送一次，计数器直接使用帧序号（由编码器取模）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SteerCommand {
    /// 限幅后的转向力矩（内部单位）
    pub torque: i32,
    /// 转向请求位
    pub request: bool,
    /// 滚动计数器
    pub counter: u64,
}

impl SteerCommand {
    pub fn new(torque: i32, request: bool, counter: u64) -> Self {
        Self {
            torque,
            request,
            counter,
        }
    }

    pub fn signals(&self) -> SignalList {
        smallvec![
            ("STEER_REQUEST", flag(self.request)),
            ("STEER_TORQUE_CMD", self.torque as f64),
            ("SET_ME_1", 1.0),
        ]
    }
}

/// LTA 转角指令 (0x191)
///
/// 仅 TSS2 平台发送。转角控制模式从未启用，内容恒为零，
/// 只用于让原厂 EPS 看到期望的报文节奏。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LtaSteerCommand {
    /// 目标转角（度）
    pub angle: f64,
    /// 转向请求位
    pub request: bool,
    /// 滚动计数器
    pub counter: u64,
}

impl LtaSteerCommand {
    /// 创建惰性指令（零转角、无请求）
    pub fn inert(counter: u64) -> Self {
        Self {
            angle: 0.0,
            request: false,
            counter,
        }
    }

    pub fn signals(&self) -> SignalList {
        smallvec![
            ("SETME_X1", 1.0),
            ("SETME_X3", 3.0),
            ("PERCENTAGE", 100.0),
            ("SETME_X64", 100.0),
            ("ANGLE", 0.0),
            ("STEER_ANGLE_CMD", self.angle),
            ("STEER_REQUEST", flag(self.request)),
            ("STEER_REQUEST_2", flag(self.request)),
            ("BIT", 0.0),
        ]
    }
}

// ============================================================================
// 纵向指令
// ============================================================================

/// ACC 加速度指令 (0x343)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccelCommand {
    /// 加速度指令（m/s²）
    pub accel: f64,
    /// 请求 PCM 取消巡航
    pub cancel: bool,
    /// 静止保持请求
    pub standstill_req: bool,
    /// 前车存在标志
    pub lead: bool,
}

impl AccelCommand {
    pub fn new(accel: f64, cancel: bool, standstill_req: bool, lead: bool) -> Self {
        Self {
            accel,
            cancel,
            standstill_req,
            lead,
        }
    }

    pub fn signals(&self) -> SignalList {
        smallvec![
            ("ACCEL_CMD", self.accel),
            ("SET_ME_X01", 1.0),
            ("DISTANCE", 0.0),
            ("MINI_CAR", flag(self.lead)),
            ("SET_ME_X3", 3.0),
            ("SET_ME_1", 1.0),
            ("PERMIT_BRAKING", 1.0),
            ("RELEASE_STANDSTILL", flag(!self.standstill_req)),
            ("CANCEL_REQ", flag(self.cancel)),
        ]
    }
}

/// 巡航取消指令 (0x1D2)
///
/// 部分车型（Lexus IS）不接受 ACC_CONTROL 中的取消位，
/// 改用伪造的 PCM_CRUISE 报文取消巡航。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccCancelCommand;

impl AccCancelCommand {
    pub fn signals(&self) -> SignalList {
        smallvec![
            ("GAS_RELEASED", 0.0),
            ("CRUISE_ACTIVE", 0.0),
            ("STANDSTILL_ON", 0.0),
            ("ACCEL_NET", 0.0),
            ("CRUISE_STATE", 0.0),
            ("CANCEL_REQ", 1.0),
        ]
    }
}

/// 油门踏板拦截器指令 (0x200)
///
/// 拦截器内部取"读数与指令的最大值"，因此指令为零时必须精确发送零，
/// 否则会造成踏板量程漂移。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GasCommand {
    /// 归一化踏板量 [0, 1]
    pub gas: f64,
    /// 计数器（取低 4 位）
    pub counter: u64,
}

impl GasCommand {
    pub fn new(gas: f64, counter: u64) -> Self {
        Self { gas, counter }
    }

    /// 是否使能拦截器
    pub fn is_enabled(&self) -> bool {
        self.gas > GAS_ENABLE_THRESHOLD
    }

    pub fn signals(&self) -> SignalList {
        let enable = self.is_enabled();
        let mut signals: SignalList = smallvec![
            ("ENABLE", flag(enable)),
            ("COUNTER_PEDAL", (self.counter & 0xF) as f64),
        ];
        if enable {
            signals.push(("GAS_COMMAND", self.gas * GAS_COMMAND_SCALE));
            signals.push(("GAS_COMMAND2", self.gas * GAS_COMMAND_SCALE));
        }
        signals
    }
}

// ============================================================================
// HUD 指令
// ============================================================================

/// 车道线显示状态（LKAS_HUD 中的 LEFT_LINE / RIGHT_LINE）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineState {
    /// 车道线可见
    Visible = 1,
    /// 车道线不可见
    Hidden = 2,
    /// 正在偏离（闪烁）
    Departing = 3,
}

impl LineState {
    pub fn from_flags(visible: bool, departing: bool) -> Self {
        if departing {
            LineState::Departing
        } else if visible {
            LineState::Visible
        } else {
            LineState::Hidden
        }
    }
}

/// 车道保持 HUD (0x412)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UiCommand {
    /// 转向接管提示
    pub steer_alert: bool,
    /// 提示音（强制取消时替代故障音）
    pub chime: bool,
    pub left_line: bool,
    pub right_line: bool,
    pub left_lane_depart: bool,
    pub right_lane_depart: bool,
}

impl UiCommand {
    pub fn left_line_state(&self) -> LineState {
        LineState::from_flags(self.left_line, self.left_lane_depart)
    }

    pub fn right_line_state(&self) -> LineState {
        LineState::from_flags(self.right_line, self.right_lane_depart)
    }

    pub fn signals(&self) -> SignalList {
        let barriers = if self.left_lane_depart || self.right_lane_depart {
            3.0
        } else {
            0.0
        };
        smallvec![
            ("RIGHT_LINE", self.right_line_state() as u8 as f64),
            ("LEFT_LINE", self.left_line_state() as u8 as f64),
            ("BARRIERS", barriers),
            ("SET_ME_X0C", 12.0),
            ("SET_ME_X2C", 44.0),
            ("SET_ME_X38", 56.0),
            ("SET_ME_X02", 2.0),
            ("SET_ME_X01", 1.0),
            ("SET_ME_1", 1.0),
            ("REPEATED_BEEPS", 0.0),
            ("TWO_BEEPS", flag(self.chime)),
            ("LDA_ALERT", flag(self.steer_alert)),
        ]
    }
}

/// 前碰撞预警 HUD (0x411)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FcwCommand {
    pub fcw: bool,
}

impl FcwCommand {
    pub fn signals(&self) -> SignalList {
        smallvec![
            ("FCW", flag(self.fcw)),
            ("SET_ME_X20", 32.0),
            ("SET_ME_X10", 16.0),
            ("SET_ME_X80", 128.0),
        ]
    }
}

// ============================================================================
// 静态保活帧
// ============================================================================

/// 固定载荷保活帧
///
/// 载荷原样发送，不经过编码器。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticFrame {
    pub address: u32,
    pub bus: u8,
    payload: [u8; 8],
    len: u8,
}

impl StaticFrame {
    /// 创建保活帧
    ///
    /// 载荷超过 8 字节时返回错误。
    pub fn new(address: u32, bus: u8, payload: &[u8]) -> Result<Self, ProtocolError> {
        if payload.len() > 8 {
            return Err(ProtocolError::PayloadTooLong {
                address,
                len: payload.len(),
            });
        }
        let mut fixed = [0u8; 8];
        fixed[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            address,
            bus,
            payload: fixed,
            len: payload.len() as u8,
        })
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.len as usize]
    }

    pub fn to_frame(self) -> CanFrame {
        CanFrame::new(self.address, self.payload(), self.bus)
    }
}

// ============================================================================
// 出站消息
// ============================================================================

/// 单周期内的一条出站逻辑消息
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutboundMessage {
    Steer(SteerCommand),
    LtaSteer(LtaSteerCommand),
    Accel(AccelCommand),
    AccCancel(AccCancelCommand),
    Gas(GasCommand),
    Ui(UiCommand),
    Fcw(FcwCommand),
    Static(StaticFrame),
}

impl OutboundMessage {
    /// 报文名（静态帧没有名称，返回 `"STATIC"`）
    pub fn name(&self) -> &'static str {
        match self {
            OutboundMessage::Steer(_) => MSG_STEERING_LKA,
            OutboundMessage::LtaSteer(_) => MSG_STEERING_LTA,
            OutboundMessage::Accel(_) => MSG_ACC_CONTROL,
            OutboundMessage::AccCancel(_) => MSG_PCM_CRUISE,
            OutboundMessage::Gas(_) => MSG_GAS_COMMAND,
            OutboundMessage::Ui(_) => MSG_LKAS_HUD,
            OutboundMessage::Fcw(_) => MSG_ACC_HUD,
            OutboundMessage::Static(_) => "STATIC",
        }
    }

    /// 报文地址
    pub fn address(&self) -> u32 {
        match self {
            OutboundMessage::Steer(_) => ID_STEERING_LKA,
            OutboundMessage::LtaSteer(_) => ID_STEERING_LTA,
            OutboundMessage::Accel(_) => ID_ACC_CONTROL,
            OutboundMessage::AccCancel(_) => ID_PCM_CRUISE,
            OutboundMessage::Gas(_) => ID_GAS_COMMAND,
            OutboundMessage::Ui(_) => ID_LKAS_HUD,
            OutboundMessage::Fcw(_) => ID_ACC_HUD,
            OutboundMessage::Static(s) => s.address,
        }
    }

    /// 目标总线
    pub fn bus(&self) -> u8 {
        match self {
            OutboundMessage::Static(s) => s.bus,
            _ => BUS_PT,
        }
    }

    /// 显式计数器
    pub fn counter(&self) -> Option<u64> {
        match self {
            OutboundMessage::Steer(m) => Some(m.counter),
            OutboundMessage::LtaSteer(m) => Some(m.counter),
            _ => None,
        }
    }

    /// 信号值（静态帧为空）
    pub fn signals(&self) -> SignalList {
        match self {
            OutboundMessage::Steer(m) => m.signals(),
            OutboundMessage::LtaSteer(m) => m.signals(),
            OutboundMessage::Accel(m) => m.signals(),
            OutboundMessage::AccCancel(m) => m.signals(),
            OutboundMessage::Gas(m) => m.signals(),
            OutboundMessage::Ui(m) => m.signals(),
            OutboundMessage::Fcw(m) => m.signals(),
            OutboundMessage::Static(_) => SignalList::new(),
        }
    }

    /// 编码为 CAN 帧
    ///
    /// 静态帧直接使用固定载荷，其余消息交给编码器。
    pub fn encode<P: CanPacker + ?Sized>(&self, packer: &mut P) -> Result<CanFrame, ProtocolError> {
        match self {
            OutboundMessage::Static(s) => Ok(s.to_frame()),
            _ => packer.make_can_msg(self.name(), self.bus(), &self.signals(), self.counter()),
        }
    }
}
