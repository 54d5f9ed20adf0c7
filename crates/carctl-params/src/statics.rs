//! 静态保活报文表
//!
//! 原厂 DSU 被移除后，车上其他 ECU 仍期待收到它的周期报文，否则会报故障。
//! 表中每一项描述一条固定载荷报文：地址、所属角色、适用车型、总线、发送周期、载荷。

use carctl_protocol::{BUS_PT, BUS_RADAR};
use serde::{Deserialize, Serialize};

use crate::car::{CarModel, ModelSet};
use crate::ecu::{Ecu, EcuSet};
use crate::ParamsError;

/// 静态报文描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticMessageSpec {
    /// 报文地址
    pub address: u32,
    /// 原始发送者角色
    pub ecu: Ecu,
    /// 适用车型
    pub models: ModelSet,
    /// 目标总线
    pub bus: u8,
    /// 发送周期（控制周期数），帧序号整除时发送
    pub frame_step: u32,
    /// 固定载荷（≤ 8 字节）
    pub payload: Vec<u8>,
}

impl StaticMessageSpec {
    pub fn new(
        address: u32,
        ecu: Ecu,
        models: ModelSet,
        bus: u8,
        frame_step: u32,
        payload: &[u8],
    ) -> Self {
        Self {
            address,
            ecu,
            models,
            bus,
            frame_step,
            payload: payload.to_vec(),
        }
    }

    /// 本周期是否发送
    #[inline]
    pub fn applies(&self, frame: u64, roles: EcuSet, model: CarModel) -> bool {
        self.frame_step != 0
            && frame % u64::from(self.frame_step) == 0
            && roles.contains(self.ecu)
            && self.models.contains(model)
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.frame_step == 0 {
            return Err(ParamsError::InvalidStaticMessage {
                address: self.address,
                reason: "frame_step must be > 0".to_string(),
            });
        }
        if self.payload.len() > 8 {
            return Err(ParamsError::InvalidStaticMessage {
                address: self.address,
                reason: format!("payload is {} bytes (max 8)", self.payload.len()),
            });
        }
        Ok(())
    }
}

/// Toyota 内置保活报文表
pub fn toyota_static_msgs() -> Vec<StaticMessageSpec> {
    use CarModel::*;

    let tss1_dsu = ModelSet::of(&[
        Prius, Rav4h, LexusRxh, LexusNxh, LexusNx, Rav4, Corolla, Highlander, Highlanderh, Avalon,
        Sienna, LexusCth, LexusEsh, LexusRx,
    ]);

    vec![
        StaticMessageSpec::new(
            0x128,
            Ecu::Dsu,
            ModelSet::of(&[Prius, Rav4h, LexusRxh, LexusNxh, LexusNx, Rav4, Corolla, Avalon]),
            BUS_RADAR,
            3,
            &[0xf4, 0x01, 0x90, 0x83, 0x00, 0x37],
        ),
        StaticMessageSpec::new(
            0x128,
            Ecu::Dsu,
            ModelSet::of(&[Highlander, Highlanderh, Sienna, LexusCth, LexusEsh]),
            BUS_RADAR,
            3,
            &[0x03, 0x00, 0x20, 0x00, 0x00, 0x52],
        ),
        StaticMessageSpec::new(0x141, Ecu::Dsu, tss1_dsu, BUS_RADAR, 2, &[0x00, 0x00, 0x00, 0x46]),
        StaticMessageSpec::new(
            0x160,
            Ecu::Dsu,
            tss1_dsu,
            BUS_RADAR,
            7,
            &[0x00, 0x00, 0x08, 0x12, 0x01, 0x31, 0x9c, 0x51],
        ),
        StaticMessageSpec::new(
            0x161,
            Ecu::Dsu,
            ModelSet::of(&[Prius, Rav4h, LexusRxh, LexusNxh, LexusNx, Rav4, Corolla, Avalon, LexusRx]),
            BUS_RADAR,
            7,
            &[0x00, 0x1e, 0x00, 0x00, 0x00, 0x80, 0x07],
        ),
        StaticMessageSpec::new(
            0x161,
            Ecu::Dsu,
            ModelSet::of(&[Highlanderh, Highlander, Sienna, LexusCth, LexusEsh]),
            BUS_RADAR,
            7,
            &[0x00, 0x1e, 0x00, 0xd4, 0x00, 0x00, 0x5b],
        ),
        StaticMessageSpec::new(
            0x283,
            Ecu::Dsu,
            tss1_dsu,
            BUS_PT,
            3,
            &[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x8c],
        ),
        StaticMessageSpec::new(
            0x2E6,
            Ecu::Dsu,
            ModelSet::of(&[Prius, Rav4h, LexusRxh]),
            BUS_PT,
            3,
            &[0xff, 0xf8, 0x00, 0x08, 0x7f, 0xe0, 0x00, 0x4e],
        ),
        StaticMessageSpec::new(
            0x2E7,
            Ecu::Dsu,
            ModelSet::of(&[Prius, Rav4h, LexusRxh]),
            BUS_PT,
            3,
            &[0xa8, 0x9c, 0x31, 0x9c, 0x00, 0x00, 0x00, 0x02],
        ),
        StaticMessageSpec::new(
            0x33E,
            Ecu::Dsu,
            ModelSet::of(&[Prius, Rav4h, LexusRxh]),
            BUS_PT,
            20,
            &[0x0f, 0xff, 0x26, 0x40, 0x00, 0x1f, 0x00],
        ),
        StaticMessageSpec::new(
            0x344,
            Ecu::Dsu,
            tss1_dsu,
            BUS_PT,
            5,
            &[0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x50],
        ),
        StaticMessageSpec::new(
            0x365,
            Ecu::Dsu,
            ModelSet::of(&[Prius, LexusRxh, LexusNxh, LexusNx, Highlanderh]),
            BUS_PT,
            20,
            &[0x00, 0x00, 0x00, 0x80, 0x03, 0x00, 0x08],
        ),
        StaticMessageSpec::new(
            0x365,
            Ecu::Dsu,
            ModelSet::of(&[
                Rav4, Rav4h, Corolla, Highlander, Avalon, Sienna, LexusCth, LexusEsh, LexusRx,
            ]),
            BUS_PT,
            20,
            &[0x00, 0x00, 0x00, 0x80, 0xfc, 0x00, 0x08],
        ),
        StaticMessageSpec::new(
            0x366,
            Ecu::Dsu,
            ModelSet::of(&[Prius, Rav4h, LexusRxh, LexusNxh, LexusNx, Highlanderh]),
            BUS_PT,
            20,
            &[0x00, 0x00, 0x4d, 0x82, 0x40, 0x02, 0x00],
        ),
        StaticMessageSpec::new(
            0x366,
            Ecu::Dsu,
            ModelSet::of(&[
                Rav4, Corolla, Highlander, Avalon, Sienna, LexusCth, LexusEsh, LexusRx,
            ]),
            BUS_PT,
            20,
            &[0x00, 0x72, 0x07, 0xff, 0x09, 0xfe, 0x00],
        ),
        StaticMessageSpec::new(
            0x470,
            Ecu::Dsu,
            ModelSet::of(&[Prius, LexusRxh]),
            BUS_RADAR,
            100,
            &[0x00, 0x00, 0x02, 0x7a],
        ),
        StaticMessageSpec::new(
            0x470,
            Ecu::Dsu,
            ModelSet::of(&[Highlander, Highlanderh, Rav4h, Sienna, LexusCth, LexusEsh]),
            BUS_RADAR,
            100,
            &[0x00, 0x00, 0x01, 0x79],
        ),
        StaticMessageSpec::new(
            0x4CB,
            Ecu::Dsu,
            tss1_dsu,
            BUS_PT,
            100,
            &[0x0c, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        ),
    ]
}
