//! 仿真场景
//!
//! 场景由若干分段组成，每段在给定帧数内保持相同的车辆状态与执行意图。
//!
//! ```toml
//! name = "stop and go"
//!
//! [profile]
//! car_model = "PRIUS"
//! enable_dsu = true
//! owns_longitudinal = true
//!
//! [[segments]]
//! frames = 100
//! vehicle = { v_ego = 0.0, standstill = true, cruise_state = 8 }
//! intent = { gas = 0.0 }
//!
//! [[segments]]
//! frames = 200
//! vehicle = { v_ego = 5.0, cruise_state = 1 }
//! intent = { gas = 0.3, steer = 0.1 }
//! ```

use anyhow::{Context, Result, bail};
use carctl_controller::{ControlIntent, VehicleState, VisualAlert};
use carctl_params::{PcmCruiseState, VehicleProfile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_enabled() -> bool {
    true
}

/// 场景分段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// 持续帧数
    pub frames: u64,

    /// 控制器使能
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub vehicle: VehicleState,

    #[serde(default)]
    pub intent: ControlIntent,
}

/// 仿真场景
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// 车辆配置；缺省时由命令行指定车型
    #[serde(default)]
    pub profile: Option<VehicleProfile>,

    pub segments: Vec<Segment>,
}

impl Scenario {
    /// 从 TOML 文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        let scenario: Scenario = toml::from_str(&content)
            .with_context(|| format!("Failed to parse scenario {}", path.display()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        if self.segments.is_empty() {
            bail!("Scenario '{}' has no segments", self.name);
        }
        if let Some(profile) = &self.profile {
            profile
                .validate()
                .with_context(|| format!("Invalid profile in scenario '{}'", self.name))?;
        }
        Ok(())
    }

    /// 总帧数
    pub fn total_frames(&self) -> u64 {
        self.segments.iter().map(|s| s.frames).sum()
    }

    /// 逐帧展开（帧序号从 0 开始）
    pub fn frames(&self) -> impl Iterator<Item = (u64, &Segment)> {
        self.segments
            .iter()
            .flat_map(|segment| (0..segment.frames).map(move |_| segment))
            .enumerate()
            .map(|(frame, segment)| (frame as u64, segment))
    }

    /// 内置场景：静止起步、低速跟车、巡航转向告警、失能取消
    pub fn builtin_ramp() -> Self {
        let cruising = |v_ego: f64| VehicleState {
            v_ego,
            cruise_state: PcmCruiseState::Other(1),
            ..Default::default()
        };

        Scenario {
            name: "builtin-ramp".to_string(),
            description: "Standstill launch, low-speed creep, cruise with alert, disengage"
                .to_string(),
            profile: None,
            segments: vec![
                Segment {
                    frames: 50,
                    enabled: true,
                    vehicle: VehicleState {
                        standstill: true,
                        cruise_state: PcmCruiseState::Standstill,
                        ..Default::default()
                    },
                    intent: ControlIntent::actuators(0.0, 0.2, 0.0),
                },
                Segment {
                    frames: 150,
                    enabled: true,
                    vehicle: cruising(3.0),
                    intent: ControlIntent::actuators(0.4, 0.0, 0.1),
                },
                Segment {
                    frames: 150,
                    enabled: true,
                    vehicle: cruising(15.0),
                    intent: ControlIntent {
                        hud_alert: VisualAlert::SteerRequired,
                        left_line: true,
                        right_line: true,
                        lead: true,
                        ..ControlIntent::actuators(0.2, 0.0, -0.2)
                    },
                },
                Segment {
                    frames: 100,
                    enabled: false,
                    vehicle: cruising(15.0),
                    intent: ControlIntent::default(),
                },
                Segment {
                    frames: 50,
                    enabled: false,
                    vehicle: VehicleState {
                        v_ego: 14.0,
                        ..Default::default()
                    },
                    intent: ControlIntent::default(),
                },
            ],
        }
    }
}
