//! 多速率报文调度
//!
//! # 调度顺序
//!
//! 每周期按固定优先级决定发送哪些报文：
//!
//! | 顺序 | 报文 | 周期 | 条件 |
//! |---|---|---|---|
//! | 1 | STEERING_LKA | 1 | 替代前视摄像头 |
//! | 1 | STEERING_LTA | 2 | 替代前视摄像头且为 TSS2 车型 |
//! | 2 | ACC_CONTROL / PCM_CRUISE | 3 | 负责纵向控制；取消时每周期（需替代前视摄像头） |
//! | 3 | GAS_COMMAND | 2 | 装有踏板拦截器 |
//! | 4 | LKAS_HUD | 100 | 替代前视摄像头；告警翻转或取消时立即发送 |
//! | 5 | ACC_HUD | 100 | 替代 DSU |
//! | 6 | 保活报文 | 表中给出 | 角色与车型匹配 |
//!
//! 输出顺序即上表顺序，调度本身是输入的纯函数。

use carctl_params::{CarModel, EcuSet, StaticMessageSpec, VehicleProfile};
use carctl_protocol::{
    AccCancelCommand, AccelCommand, FcwCommand, GasCommand, LtaSteerCommand, OutboundMessage,
    ProtocolError, StaticFrame, SteerCommand, UiCommand,
};
use smallvec::SmallVec;

use crate::intent::ControlIntent;
use crate::lateral::LateralOutput;
use crate::longitudinal::LongitudinalOutput;
use crate::state::ModeFlags;

/// 单周期出站报文集合
///
/// 栈上预留 16 个位置：帧 0 时普通报文与保活报文全部到期也不会溢出到堆上。
pub type OutboundMessageSet = SmallVec<[OutboundMessage; 16]>;

/// 转向报文每周期发送
pub const STEER_STEP: u64 = 1;
/// LTA 与踏板报文每 2 周期发送
pub const HALF_RATE_STEP: u64 = 2;
/// 加速度报文每 3 周期发送
pub const ACCEL_STEP: u64 = 3;
/// HUD 与 FCW 报文每 100 周期发送
pub const HUD_STEP: u64 = 100;

/// 调度输入
#[derive(Debug, Clone, Copy)]
pub struct ScheduleInputs<'a> {
    pub frame: u64,
    /// 车速（m/s），用于低速时声明前车存在
    pub speed: f64,
    pub longitudinal: LongitudinalOutput,
    pub lateral: LateralOutput,
    pub flags: ModeFlags,
    pub intent: &'a ControlIntent,
}

/// 报文调度器
///
/// 构造时固定角色集合、车型能力与保活报文表，之后只读。
#[derive(Debug, Clone)]
pub struct MessageScheduler {
    roles: EcuSet,
    car_model: CarModel,
    owns_longitudinal: bool,
    has_interceptor: bool,
    tss2: bool,
    alt_cancel: bool,
    lead_assume_speed: f64,
    /// 本车型适用的保活报文（预先构建好帧）
    statics: Vec<(StaticMessageSpec, StaticFrame)>,
}

impl MessageScheduler {
    /// 从车辆配置构建
    ///
    /// 保活报文载荷超过 8 字节时返回错误。
    pub fn new(profile: &VehicleProfile) -> Result<Self, ProtocolError> {
        let statics = profile
            .applicable_static_msgs()
            .map(|spec| {
                StaticFrame::new(spec.address, spec.bus, &spec.payload)
                    .map(|frame| (spec.clone(), frame))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            roles: profile.roles(),
            car_model: profile.car_model,
            owns_longitudinal: profile.owns_longitudinal,
            has_interceptor: profile.has_gas_interceptor,
            tss2: profile.is_tss2(),
            alt_cancel: profile.uses_alt_cancel(),
            lead_assume_speed: profile.params.lead_assume_speed,
            statics,
        })
    }

    pub fn roles(&self) -> EcuSet {
        self.roles
    }

    /// 本车型适用的保活报文数量
    pub fn static_count(&self) -> usize {
        self.statics.len()
    }

    /// 决定本周期发送的报文
    pub fn schedule(&self, inputs: &ScheduleInputs<'_>) -> OutboundMessageSet {
        let frame = inputs.frame;
        let flags = &inputs.flags;
        let intent = inputs.intent;
        let camera = self.roles.has_camera();
        let mut messages = OutboundMessageSet::new();

        // 1. 转向
        if camera {
            messages.push(OutboundMessage::Steer(SteerCommand::new(
                inputs.lateral.torque,
                inputs.lateral.request,
                frame,
            )));
            if frame % HALF_RATE_STEP == 0 && self.tss2 {
                messages.push(OutboundMessage::LtaSteer(LtaSteerCommand::inert(
                    frame / HALF_RATE_STEP,
                )));
            }
        }

        // 2. 加速度（不负责纵向时也可以借此报文取消巡航）
        if (frame % ACCEL_STEP == 0 && self.owns_longitudinal) || (flags.cancel && camera) {
            // 低速时总是声明前车存在，保证原厂巡航可以接合
            let lead = intent.lead || inputs.speed < self.lead_assume_speed;

            if flags.cancel && self.alt_cancel {
                messages.push(OutboundMessage::AccCancel(AccCancelCommand));
            } else if self.owns_longitudinal {
                messages.push(OutboundMessage::Accel(AccelCommand::new(
                    inputs.longitudinal.accel,
                    flags.cancel,
                    flags.standstill_req,
                    lead,
                )));
            } else {
                messages.push(OutboundMessage::Accel(AccelCommand::new(
                    0.0,
                    flags.cancel,
                    false,
                    lead,
                )));
            }
        }

        // 3. 踏板：恰好为 0 时发 0，拦截器会取读数与指令的较大值
        if frame % HALF_RATE_STEP == 0 && self.has_interceptor {
            messages.push(OutboundMessage::Gas(GasCommand::new(
                inputs.longitudinal.interceptor_gas,
                frame / HALF_RATE_STEP,
            )));
        }

        // 4. HUD
        if (frame % HUD_STEP == 0 || flags.send_ui) && camera {
            messages.push(OutboundMessage::Ui(UiCommand {
                steer_alert: flags.steer_alert,
                chime: flags.cancel,
                left_line: intent.left_line,
                right_line: intent.right_line,
                left_lane_depart: intent.left_lane_depart,
                right_lane_depart: intent.right_lane_depart,
            }));
        }

        // 5. FCW
        if frame % HUD_STEP == 0 && self.roles.has_dsu() {
            messages.push(OutboundMessage::Fcw(FcwCommand {
                fcw: flags.fcw_alert,
            }));
        }

        // 6. 保活
        messages.extend(
            self.statics
                .iter()
                .filter(|(spec, _)| spec.applies(frame, self.roles, self.car_model))
                .map(|(_, static_frame)| OutboundMessage::Static(*static_frame)),
        );

        messages
    }
}
