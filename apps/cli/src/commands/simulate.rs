//! simulate 命令
//!
//! 按场景逐帧驱动控制器，打印每帧的报文调度结果。

use anyhow::{Context, Result};
use carctl_controller::CarController;
use carctl_params::{CarModel, VehicleProfile};
use carctl_protocol::OutboundMessage;
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

use crate::scenario::Scenario;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// 每帧一行的文本
    Text,
    /// 每帧一行 JSON
    Json,
}

/// 仿真命令参数
#[derive(Args, Debug)]
pub struct SimulateCommand {
    /// 场景文件（TOML）；缺省时运行内置场景
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// 车辆配置文件（覆盖场景中的配置）
    #[arg(short, long)]
    pub profile: Option<PathBuf>,

    /// 车型（场景与配置文件都未给出车辆配置时使用）
    #[arg(short, long, default_value = "PRIUS")]
    pub model: CarModel,

    /// 只运行前 N 帧
    #[arg(long)]
    pub frames: Option<u64>,

    /// 输出格式
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// 文本格式下打印信号值
    #[arg(short, long)]
    pub verbose: bool,

    /// 只打印汇总
    #[arg(short, long)]
    pub quiet: bool,
}

/// 单条报文记录（JSON 输出）
#[derive(Debug, Serialize)]
pub struct MessageRecord {
    pub name: &'static str,
    pub address: u32,
    pub bus: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter: Option<u64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub signals: BTreeMap<&'static str, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Vec<u8>>,
}

impl From<&OutboundMessage> for MessageRecord {
    fn from(message: &OutboundMessage) -> Self {
        let payload = match message {
            OutboundMessage::Static(frame) => Some(frame.payload().to_vec()),
            _ => None,
        };
        Self {
            name: message.name(),
            address: message.address(),
            bus: message.bus(),
            counter: message.counter(),
            signals: message.signals().into_iter().collect(),
            payload,
        }
    }
}

/// 单帧记录（JSON 输出）
#[derive(Debug, Serialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub enabled: bool,
    pub accel: f64,
    pub steer: i32,
    pub steer_rate_limited: bool,
    pub messages: Vec<MessageRecord>,
}

/// 仿真汇总
#[derive(Debug, Default, Serialize)]
pub struct SimulationSummary {
    pub frames: u64,
    pub messages: usize,
    pub rate_limited_frames: u64,
    /// 各报文发送次数（保活报文按地址区分）
    pub counts: BTreeMap<String, u64>,
}

impl SimulationSummary {
    fn record(&mut self, messages: &[OutboundMessage], rate_limited: bool) {
        self.frames += 1;
        self.messages += messages.len();
        if rate_limited {
            self.rate_limited_frames += 1;
        }
        for message in messages {
            *self.counts.entry(message_label(message)).or_default() += 1;
        }
    }
}

fn message_label(message: &OutboundMessage) -> String {
    match message {
        OutboundMessage::Static(frame) => format!("STATIC_0x{:03X}", frame.address),
        other => other.name().to_string(),
    }
}

impl SimulateCommand {
    /// 解析车辆配置：命令行配置文件 > 场景内配置 > 车型默认
    fn resolve_profile(&self, scenario: &Scenario) -> Result<VehicleProfile> {
        if let Some(path) = &self.profile {
            return VehicleProfile::load_from_file(path)
                .with_context(|| format!("Failed to load profile {}", path.display()));
        }
        Ok(scenario
            .profile
            .clone()
            .unwrap_or_else(|| VehicleProfile::for_model(self.model)))
    }

    pub fn execute(&self) -> Result<()> {
        let scenario = match &self.scenario {
            Some(path) => Scenario::load(path)?,
            None => Scenario::builtin_ramp(),
        };
        let profile = self.resolve_profile(&scenario)?;
        let summary = run(&scenario, &profile, self)?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(&summary)?);
            },
            OutputFormat::Text => {
                println!();
                println!("Scenario: {} ({})", scenario.name, profile.car_model);
                println!("  frames:              {}", summary.frames);
                println!("  messages:            {}", summary.messages);
                println!("  rate-limited frames: {}", summary.rate_limited_frames);
                for (label, count) in &summary.counts {
                    println!("  {:<20} {}", label, count);
                }
            },
        }
        Ok(())
    }
}

/// 运行场景并按需打印逐帧输出
pub fn run(
    scenario: &Scenario,
    profile: &VehicleProfile,
    options: &SimulateCommand,
) -> Result<SimulationSummary> {
    let mut controller =
        CarController::new(profile).context("Failed to construct car controller")?;
    let limit = options.frames.unwrap_or(u64::MAX);
    info!(
        "Running scenario '{}' ({} frames) on {}",
        scenario.name,
        scenario.total_frames().min(limit),
        profile.car_model
    );

    let mut summary = SimulationSummary::default();
    for (frame, segment) in scenario.frames().take_while(|(frame, _)| *frame < limit) {
        let messages = controller
            .update(segment.enabled, &segment.vehicle, frame, &segment.intent)
            .with_context(|| format!("Cycle failed at frame {}", frame))?;
        let state = controller.state();
        summary.record(&messages, controller.steer_rate_limited());

        if options.quiet {
            continue;
        }
        match options.format {
            OutputFormat::Json => {
                let record = FrameRecord {
                    frame,
                    enabled: segment.enabled,
                    accel: controller.last_accel(),
                    steer: state.last_steer,
                    steer_rate_limited: controller.steer_rate_limited(),
                    messages: messages.iter().map(MessageRecord::from).collect(),
                };
                println!("{}", serde_json::to_string(&record)?);
            },
            OutputFormat::Text => {
                let labels: Vec<String> = messages.iter().map(message_label).collect();
                println!(
                    "{:>6} {} accel={:+.3} steer={:+5}  {}",
                    frame,
                    if segment.enabled { "ON " } else { "OFF" },
                    controller.last_accel(),
                    state.last_steer,
                    labels.join(" ")
                );
                if options.verbose {
                    for message in messages.iter().filter(|m| !m.signals().is_empty()) {
                        let signals: Vec<String> = message
                            .signals()
                            .iter()
                            .map(|(name, value)| format!("{}={}", name, value))
                            .collect();
                        println!("         {:<14} {}", message.name(), signals.join(" "));
                    }
                }
            },
        }
    }

    Ok(summary)
}
