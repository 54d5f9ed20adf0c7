//! 车辆配置
//!
//! `VehicleProfile` 是控制器构造时需要的全部车辆信息：车型、能力标志、
//! 可调常量、保活报文表以及几个特殊车型集合。
//!
//! # 配置文件
//!
//! ```toml
//! car_model = "PRIUS"
//! enable_camera = true
//! enable_dsu = true
//! owns_longitudinal = true
//! has_gas_interceptor = false
//!
//! [params]
//! steer_max = 1500
//! ```
//!
//! 未写出的字段使用内置 Toyota 默认值。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::car::{ALT_CANCEL_CAR, CarModel, ModelSet, NO_STOP_TIMER_CAR, TSS2_CAR};
use crate::ecu::EcuSet;
use crate::limits::ControllerParams;
use crate::statics::{StaticMessageSpec, toyota_static_msgs};
use crate::ParamsError;

fn default_true() -> bool {
    true
}

fn default_tss2() -> ModelSet {
    TSS2_CAR
}

fn default_no_stop_timer() -> ModelSet {
    NO_STOP_TIMER_CAR
}

fn default_alt_cancel() -> ModelSet {
    ALT_CANCEL_CAR
}

/// 车辆配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    /// 车型
    pub car_model: CarModel,

    /// 替代前视摄像头发送转向/HUD 报文
    #[serde(default = "default_true")]
    pub enable_camera: bool,

    /// 替代 DSU 发送 FCW 与保活报文
    #[serde(default)]
    pub enable_dsu: bool,

    /// 本系统负责纵向控制
    #[serde(default)]
    pub owns_longitudinal: bool,

    /// 装有油门踏板拦截器
    #[serde(default)]
    pub has_gas_interceptor: bool,

    /// 可调常量
    #[serde(default)]
    pub params: ControllerParams,

    /// 保活报文表
    #[serde(default = "toyota_static_msgs")]
    pub static_msgs: Vec<StaticMessageSpec>,

    /// 需要额外发送 LTA 报文的新平台车型
    #[serde(default = "default_tss2")]
    pub tss2_models: ModelSet,

    /// 不发送静止保持请求的车型
    #[serde(default = "default_no_stop_timer")]
    pub no_stop_timer_models: ModelSet,

    /// 使用 PCM_CRUISE 取消巡航的车型
    #[serde(default = "default_alt_cancel")]
    pub alt_cancel_models: ModelSet,
}

impl VehicleProfile {
    /// 车型默认配置
    ///
    /// - 总是替代前视摄像头
    /// - 非 TSS2 车型替代 DSU（TSS2 没有独立 DSU）
    /// - 负责纵向控制，不装拦截器
    pub fn for_model(car_model: CarModel) -> Self {
        let tss2 = TSS2_CAR.contains(car_model);
        Self {
            car_model,
            enable_camera: true,
            enable_dsu: !tss2,
            owns_longitudinal: true,
            has_gas_interceptor: false,
            params: ControllerParams::default(),
            static_msgs: toyota_static_msgs(),
            tss2_models: TSS2_CAR,
            no_stop_timer_models: NO_STOP_TIMER_CAR,
            alt_cancel_models: ALT_CANCEL_CAR,
        }
    }

    /// 设置是否装有拦截器
    pub fn with_gas_interceptor(mut self, enabled: bool) -> Self {
        self.has_gas_interceptor = enabled;
        self
    }

    /// 设置是否负责纵向控制
    pub fn with_longitudinal(mut self, enabled: bool) -> Self {
        self.owns_longitudinal = enabled;
        self
    }

    /// 设置替代的角色
    pub fn with_roles(mut self, enable_camera: bool, enable_dsu: bool) -> Self {
        self.enable_camera = enable_camera;
        self.enable_dsu = enable_dsu;
        self
    }

    /// 替换可调常量
    pub fn with_params(mut self, params: ControllerParams) -> Self {
        self.params = params;
        self
    }

    /// 替代的角色集合
    pub fn roles(&self) -> EcuSet {
        EcuSet::from_capabilities(self.enable_camera, self.enable_dsu)
    }

    pub fn is_tss2(&self) -> bool {
        self.tss2_models.contains(self.car_model)
    }

    pub fn has_no_stop_timer(&self) -> bool {
        self.no_stop_timer_models.contains(self.car_model)
    }

    pub fn uses_alt_cancel(&self) -> bool {
        self.alt_cancel_models.contains(self.car_model)
    }

    /// 适用于本车型的保活报文
    pub fn applicable_static_msgs(&self) -> impl Iterator<Item = &StaticMessageSpec> {
        self.static_msgs
            .iter()
            .filter(move |spec| spec.models.contains(self.car_model))
    }

    /// 校验常量与保活报文表
    pub fn validate(&self) -> Result<(), ParamsError> {
        self.params.validate()?;
        for spec in &self.static_msgs {
            spec.validate()?;
        }
        Ok(())
    }

    /// 从 TOML 字符串解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self, ParamsError> {
        let profile: VehicleProfile = toml::from_str(content)?;
        profile.validate()?;
        Ok(profile)
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let profile = Self::from_toml_str(&content)?;
        debug!(
            "Loaded vehicle profile for {} from {}",
            profile.car_model,
            path.display()
        );
        Ok(profile)
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> Result<String, ParamsError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
