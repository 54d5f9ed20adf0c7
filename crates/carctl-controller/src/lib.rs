//! # carctl Controller
//!
//! Toyota 车辆控制核心：把与车型无关的执行意图转换为一个控制周期内的出站报文序列。
//!
//! ## 模块
//!
//! - `longitudinal`: 纵向整形（滞回、踏板拦截器标定）
//! - `lateral`: 横向整形（力矩限幅、故障切断）
//! - `state`: 持久状态与模式/故障状态机
//! - `scheduler`: 多速率报文调度
//! - `controller`: 周期入口 [`CarController`]
//!
//! ## 运行模型
//!
//! 单线程、同步，每个控制周期（通常 100Hz）调用一次 [`CarController::update`]。
//! 控制器不做 IO，不计时，不跨进程持久化。

pub mod controller;
mod error;
pub mod intent;
pub mod lateral;
pub mod longitudinal;
pub mod scheduler;
pub mod state;

pub use controller::{CarController, FrameSet};
pub use error::{ControllerError, CycleError};
pub use intent::{ControlIntent, VehicleState, VisualAlert};
pub use lateral::LateralOutput;
pub use longitudinal::{LongitudinalOutput, coast_accel, compute_gb_pedal};
pub use scheduler::{MessageScheduler, OutboundMessageSet};
pub use state::{ModeFlags, ShaperState};
