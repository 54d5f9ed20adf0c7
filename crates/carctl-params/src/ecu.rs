//! 被替代的原厂控制器角色
//!
//! 本系统替代原厂控制器发送报文时，需要知道自己"扮演"了哪些角色。
//! 角色集合在构造时由车辆能力推导，之后不再变化。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 原厂控制器角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Ecu {
    /// 前视摄像头（转向与 HUD 报文的原始发送者）
    FwdCamera = 0,
    /// 驾驶辅助单元 DSU（FCW 与大部分保活报文的原始发送者）
    Dsu = 1,
}

impl Ecu {
    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// 角色集合（位图）
///
/// # 示例
///
/// ```rust
/// use carctl_params::{Ecu, EcuSet};
///
/// let roles = EcuSet::from_capabilities(true, false);
/// assert!(roles.has_camera());
/// assert!(!roles.has_dsu());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EcuSet(u8);

impl EcuSet {
    pub const EMPTY: EcuSet = EcuSet(0);

    /// 由车辆能力标志推导
    pub fn from_capabilities(enable_camera: bool, enable_dsu: bool) -> Self {
        let mut set = EcuSet::EMPTY;
        if enable_camera {
            set.insert(Ecu::FwdCamera);
        }
        if enable_dsu {
            set.insert(Ecu::Dsu);
        }
        set
    }

    pub fn insert(&mut self, ecu: Ecu) {
        self.0 |= ecu.bit();
    }

    #[inline]
    pub fn contains(self, ecu: Ecu) -> bool {
        self.0 & ecu.bit() != 0
    }

    /// 是否扮演前视摄像头
    #[inline]
    pub fn has_camera(self) -> bool {
        self.contains(Ecu::FwdCamera)
    }

    /// 是否扮演 DSU
    #[inline]
    pub fn has_dsu(self) -> bool {
        self.contains(Ecu::Dsu)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Ecu> {
        [Ecu::FwdCamera, Ecu::Dsu]
            .into_iter()
            .filter(move |e| self.contains(*e))
    }
}

impl fmt::Debug for EcuSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
