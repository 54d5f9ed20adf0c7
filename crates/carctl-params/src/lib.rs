//! # carctl Params
//!
//! 车辆配置与可调常量（无硬件依赖）
//!
//! ## 模块
//!
//! - `car`: 车型枚举与车型集合（TSS2、无静止计时器、替代取消方式）
//! - `ecu`: 被替代的原厂控制器角色
//! - `codes`: 车辆上报的状态码
//! - `limits`: 纵向/横向限幅常量
//! - `statics`: DSU 保活报文表
//! - `profile`: 车辆配置（可从 TOML 加载）
//!
//! ## 使用
//!
//! ```rust
//! use carctl_params::{CarModel, VehicleProfile};
//!
//! let profile = VehicleProfile::for_model(CarModel::Prius).with_gas_interceptor(true);
//! assert!(profile.validate().is_ok());
//! assert!(profile.roles().has_dsu());
//! ```

pub mod car;
pub mod codes;
pub mod ecu;
pub mod error;
pub mod limits;
pub mod profile;
pub mod statics;

// 重新导出常用类型
pub use car::{ALT_CANCEL_CAR, CarModel, ModelSet, NO_STOP_TIMER_CAR, TSS2_CAR};
pub use codes::{EpsSteerState, PcmCruiseState};
pub use ecu::{Ecu, EcuSet};
pub use error::ParamsError;
pub use limits::{ControllerParams, MPH_TO_MS};
pub use profile::VehicleProfile;
pub use statics::{StaticMessageSpec, toyota_static_msgs};
