//! 帧编码器协作接口
//!
//! 控制核心只产出"报文名 + 信号值"，把它们变成字节的工作交给实现了
//! [`CanPacker`] 的外部编码器（通常由 DBC 数据库驱动）。

use crate::{CanFrame, ProtocolError};
use smallvec::SmallVec;

/// 单个信号（信号名，物理值）
pub type Signal = (&'static str, f64);

/// 信号列表
///
/// 栈上预留 12 个位置，足以覆盖本项目中信号最多的报文（LKAS_HUD）。
pub type SignalList = SmallVec<[Signal; 12]>;

/// 帧编码器
///
/// # 约定
///
/// - `name`：报文名（如 `"STEERING_LKA"`）
/// - `bus`：目标总线
/// - `signals`：信号物理值，未列出的信号由编码器填默认值
/// - `counter`：显式滚动计数器；`None` 表示由编码器自行维护
///
/// 返回编码后的帧；名称或信号未知时返回错误。
pub trait CanPacker {
    fn make_can_msg(
        &mut self,
        name: &str,
        bus: u8,
        signals: &[Signal],
        counter: Option<u64>,
    ) -> Result<CanFrame, ProtocolError>;
}

impl<T: CanPacker + ?Sized> CanPacker for &mut T {
    fn make_can_msg(
        &mut self,
        name: &str,
        bus: u8,
        signals: &[Signal],
        counter: Option<u64>,
    ) -> Result<CanFrame, ProtocolError> {
        (**self).make_can_msg(name, bus, signals, counter)
    }
}
