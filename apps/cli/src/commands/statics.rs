//! statics 命令
//!
//! 列出某车型适用的保活报文。

use anyhow::Result;
use carctl_params::{CarModel, VehicleProfile};
use clap::Args;

/// 保活报文命令参数
#[derive(Args, Debug)]
pub struct StaticsCommand {
    /// 车型
    #[arg(short, long, default_value = "PRIUS")]
    pub model: CarModel,

    /// 统计窗口（帧数），打印窗口内每条报文的发送次数
    #[arg(long, default_value_t = 100)]
    pub window: u64,
}

impl StaticsCommand {
    pub fn execute(&self) -> Result<()> {
        let profile = VehicleProfile::for_model(self.model);
        let roles = profile.roles();
        let mut count = 0;

        println!("Keep-alive messages for {} (roles {:?}):", self.model, roles);
        println!("  {:<7} {:<4} {:<5} {:<24} sends/{}", "addr", "bus", "step", "payload", self.window);
        for spec in profile.applicable_static_msgs() {
            let sends = (0..self.window)
                .filter(|frame| spec.applies(*frame, roles, self.model))
                .count();
            let payload: Vec<String> = spec.payload.iter().map(|b| format!("{:02x}", b)).collect();
            println!(
                "  0x{:<5X} {:<4} {:<5} {:<24} {}",
                spec.address,
                spec.bus,
                spec.frame_step,
                payload.join(""),
                sends
            );
            count += 1;
        }
        if count == 0 {
            println!("  (none)");
        }
        Ok(())
    }
}
