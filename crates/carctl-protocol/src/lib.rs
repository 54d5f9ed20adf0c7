//! # carctl Protocol
//!
//! 车辆 CAN 总线出站消息定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `ids`: 报文地址与总线常量定义
//! - `messages`: 逻辑出站消息（转向、加速度、踏板、HUD、FCW、静态保活帧）
//! - `packer`: 帧编码器协作接口（`CanPacker`）
//!
//! ## 分层
//!
//! 本 crate 只描述"发什么"：每条逻辑消息给出报文名、总线和信号值。
//! 字节布局、校验和、DBC 解析由外部编码器负责，控制核心从不检查字节内容。

pub mod ids;
pub mod messages;
pub mod packer;

// 重新导出常用类型
pub use ids::*;
pub use messages::*;
pub use packer::{CanPacker, Signal, SignalList};

use thiserror::Error;

/// CAN 2.0 帧（带总线编号）
///
/// # 设计目的
///
/// `CanFrame` 是编码器输出与总线传输之间的中间抽象：
/// - 编码器（`CanPacker`）把逻辑消息转换为 `CanFrame`
/// - 静态保活帧直接由固定载荷构建，不经过编码器
/// - 传输层按 `bus` 字段把帧送到对应的物理总线
///
/// # 设计特性
///
/// - **Copy trait**：零成本复制，适合 100Hz 控制周期
/// - **固定 8 字节**：避免堆分配
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanFrame {
    /// 仲裁 ID（报文地址）
    pub address: u32,

    /// 帧数据（固定 8 字节，未使用部分为 0）
    pub data: [u8; 8],

    /// 有效数据长度 (0-8)
    pub len: u8,

    /// 目标总线编号
    pub bus: u8,
}

impl CanFrame {
    /// 创建帧
    ///
    /// 超过 8 字节的数据会被截断，调用方应在构造前校验载荷长度。
    pub fn new(address: u32, data: &[u8], bus: u8) -> Self {
        let mut fixed_data = [0u8; 8];
        let len = data.len().min(8);
        fixed_data[..len].copy_from_slice(&data[..len]);

        Self {
            address,
            data: fixed_data,
            len: len as u8,
            bus,
        }
    }

    /// 获取数据切片（只包含有效数据）
    pub fn data_slice(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// 获取报文地址
    pub fn address(&self) -> u32 {
        self.address
    }

    /// 获取目标总线
    pub fn bus(&self) -> u8 {
        self.bus
    }
}

/// 协议层错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Payload too long for 0x{address:X}: {len} bytes (max 8)")]
    PayloadTooLong { address: u32, len: usize },

    #[error("Unknown message: {0}")]
    UnknownMessage(String),

    #[error("Unknown signal {signal} in message {message}")]
    UnknownSignal { message: String, signal: String },

    #[error("Encode error: {0}")]
    Encode(String),
}
