//! 车型标识与车型集合
//!
//! `ModelSet` 是以 `CarModel` 判别值为位序号的 64 位位图，
//! 静态报文表、无停车计时器车型等集合都用它表达。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParamsError;

/// 车型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum CarModel {
    Prius = 0,
    PriusTss2,
    Rav4,
    Rav4h,
    Rav4Tss2,
    Rav4hTss2,
    Corolla,
    CorollaTss2,
    CorollahTss2,
    Chr,
    Chrh,
    Camry,
    Camryh,
    CamryTss2,
    CamryhTss2,
    Highlander,
    Highlanderh,
    HighlanderTss2,
    HighlanderhTss2,
    Avalon,
    Sienna,
    Mirai,
    AlphardTss2,
    LexusIs,
    LexusRc,
    LexusCth,
    LexusEsh,
    LexusEsTss2,
    LexusEshTss2,
    LexusNx,
    LexusNxh,
    LexusNxTss2,
    LexusRx,
    LexusRxh,
    LexusRxTss2,
    LexusRxhTss2,
}

impl CarModel {
    /// 全部车型（按判别值排序）
    pub const ALL: [CarModel; 36] = [
        CarModel::Prius,
        CarModel::PriusTss2,
        CarModel::Rav4,
        CarModel::Rav4h,
        CarModel::Rav4Tss2,
        CarModel::Rav4hTss2,
        CarModel::Corolla,
        CarModel::CorollaTss2,
        CarModel::CorollahTss2,
        CarModel::Chr,
        CarModel::Chrh,
        CarModel::Camry,
        CarModel::Camryh,
        CarModel::CamryTss2,
        CarModel::CamryhTss2,
        CarModel::Highlander,
        CarModel::Highlanderh,
        CarModel::HighlanderTss2,
        CarModel::HighlanderhTss2,
        CarModel::Avalon,
        CarModel::Sienna,
        CarModel::Mirai,
        CarModel::AlphardTss2,
        CarModel::LexusIs,
        CarModel::LexusRc,
        CarModel::LexusCth,
        CarModel::LexusEsh,
        CarModel::LexusEsTss2,
        CarModel::LexusEshTss2,
        CarModel::LexusNx,
        CarModel::LexusNxh,
        CarModel::LexusNxTss2,
        CarModel::LexusRx,
        CarModel::LexusRxh,
        CarModel::LexusRxTss2,
        CarModel::LexusRxhTss2,
    ];

    /// 位图中的位序号
    #[inline]
    pub fn bit(self) -> u64 {
        1u64 << (self as u8)
    }

    /// 指纹名称（与配置文件中的写法一致）
    pub fn name(self) -> &'static str {
        match self {
            CarModel::Prius => "PRIUS",
            CarModel::PriusTss2 => "PRIUS_TSS2",
            CarModel::Rav4 => "RAV4",
            CarModel::Rav4h => "RAV4H",
            CarModel::Rav4Tss2 => "RAV4_TSS2",
            CarModel::Rav4hTss2 => "RAV4H_TSS2",
            CarModel::Corolla => "COROLLA",
            CarModel::CorollaTss2 => "COROLLA_TSS2",
            CarModel::CorollahTss2 => "COROLLAH_TSS2",
            CarModel::Chr => "CHR",
            CarModel::Chrh => "CHRH",
            CarModel::Camry => "CAMRY",
            CarModel::Camryh => "CAMRYH",
            CarModel::CamryTss2 => "CAMRY_TSS2",
            CarModel::CamryhTss2 => "CAMRYH_TSS2",
            CarModel::Highlander => "HIGHLANDER",
            CarModel::Highlanderh => "HIGHLANDERH",
            CarModel::HighlanderTss2 => "HIGHLANDER_TSS2",
            CarModel::HighlanderhTss2 => "HIGHLANDERH_TSS2",
            CarModel::Avalon => "AVALON",
            CarModel::Sienna => "SIENNA",
            CarModel::Mirai => "MIRAI",
            CarModel::AlphardTss2 => "ALPHARD_TSS2",
            CarModel::LexusIs => "LEXUS_IS",
            CarModel::LexusRc => "LEXUS_RC",
            CarModel::LexusCth => "LEXUS_CTH",
            CarModel::LexusEsh => "LEXUS_ESH",
            CarModel::LexusEsTss2 => "LEXUS_ES_TSS2",
            CarModel::LexusEshTss2 => "LEXUS_ESH_TSS2",
            CarModel::LexusNx => "LEXUS_NX",
            CarModel::LexusNxh => "LEXUS_NXH",
            CarModel::LexusNxTss2 => "LEXUS_NX_TSS2",
            CarModel::LexusRx => "LEXUS_RX",
            CarModel::LexusRxh => "LEXUS_RXH",
            CarModel::LexusRxTss2 => "LEXUS_RX_TSS2",
            CarModel::LexusRxhTss2 => "LEXUS_RXH_TSS2",
        }
    }
}

impl fmt::Display for CarModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CarModel {
    type Err = ParamsError;

    /// 不区分大小写，`-` 等同于 `_`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        CarModel::ALL
            .iter()
            .copied()
            .find(|m| m.name() == normalized)
            .ok_or_else(|| ParamsError::UnknownModel(s.to_string()))
    }
}

/// 车型集合（位图）
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CarModel>", into = "Vec<CarModel>")]
pub struct ModelSet(u64);

impl ModelSet {
    /// 空集合
    pub const EMPTY: ModelSet = ModelSet(0);

    /// 从车型列表构建（const 上下文可用）
    pub const fn of(models: &[CarModel]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < models.len() {
            bits |= 1u64 << (models[i] as u8);
            i += 1;
        }
        ModelSet(bits)
    }

    /// 并集
    pub const fn union(self, other: ModelSet) -> Self {
        ModelSet(self.0 | other.0)
    }

    #[inline]
    pub fn contains(self, model: CarModel) -> bool {
        self.0 & model.bit() != 0
    }

    pub fn insert(&mut self, model: CarModel) {
        self.0 |= model.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// 按判别值顺序迭代
    pub fn iter(self) -> impl Iterator<Item = CarModel> {
        CarModel::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl fmt::Debug for ModelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl From<Vec<CarModel>> for ModelSet {
    fn from(models: Vec<CarModel>) -> Self {
        ModelSet::of(&models)
    }
}

impl From<ModelSet> for Vec<CarModel> {
    fn from(set: ModelSet) -> Self {
        set.iter().collect()
    }
}

impl FromIterator<CarModel> for ModelSet {
    fn from_iter<I: IntoIterator<Item = CarModel>>(iter: I) -> Self {
        let mut set = ModelSet::EMPTY;
        for model in iter {
            set.insert(model);
        }
        set
    }
}

// ============================================================================
// 内置车型集合
// ============================================================================

/// TSS2 平台（需要额外发送 LTA 报文，且没有 DSU）
pub const TSS2_CAR: ModelSet = ModelSet::of(&[
    CarModel::Rav4Tss2,
    CarModel::CorollaTss2,
    CarModel::CorollahTss2,
    CarModel::LexusEsTss2,
    CarModel::LexusEshTss2,
    CarModel::Rav4hTss2,
    CarModel::LexusRxTss2,
    CarModel::LexusRxhTss2,
    CarModel::HighlanderTss2,
    CarModel::HighlanderhTss2,
    CarModel::PriusTss2,
    CarModel::CamryTss2,
    CarModel::CamryhTss2,
    CarModel::LexusNxTss2,
    CarModel::Mirai,
    CarModel::AlphardTss2,
]);

/// 没有停车计时器的车型（静止时不发送静止保持请求）
pub const NO_STOP_TIMER_CAR: ModelSet = TSS2_CAR.union(ModelSet::of(&[
    CarModel::Rav4h,
    CarModel::Highlanderh,
    CarModel::Highlander,
    CarModel::Sienna,
    CarModel::LexusEsh,
]));

/// 使用 PCM_CRUISE 取消巡航的车型
pub const ALT_CANCEL_CAR: ModelSet = ModelSet::of(&[CarModel::LexusIs]);
