//! profile 命令
//!
//! 打印解析后的车辆配置（TOML），可作为配置文件模板。

use anyhow::{Context, Result};
use carctl_params::{CarModel, VehicleProfile};
use clap::Args;
use std::path::PathBuf;

/// 车辆配置命令参数
#[derive(Args, Debug)]
pub struct ProfileCommand {
    /// 车型
    #[arg(short, long, default_value = "PRIUS")]
    pub model: CarModel,

    /// 从配置文件加载（忽略其他选项）
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// 装有踏板拦截器
    #[arg(long)]
    pub interceptor: bool,

    /// 不负责纵向控制
    #[arg(long)]
    pub no_longitudinal: bool,

    /// 只替代前视摄像头
    #[arg(long)]
    pub camera_only: bool,
}

impl ProfileCommand {
    pub fn resolve(&self) -> Result<VehicleProfile> {
        if let Some(path) = &self.file {
            return VehicleProfile::load_from_file(path)
                .with_context(|| format!("Failed to load profile {}", path.display()));
        }

        let mut profile = VehicleProfile::for_model(self.model)
            .with_gas_interceptor(self.interceptor)
            .with_longitudinal(!self.no_longitudinal);
        if self.camera_only {
            profile = profile.with_roles(true, false);
        }
        profile.validate()?;
        Ok(profile)
    }

    pub fn execute(&self) -> Result<()> {
        let profile = self.resolve()?;
        print!("{}", profile.to_toml_string()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn command() -> ProfileCommand {
        ProfileCommand {
            model: CarModel::Highlander,
            file: None,
            interceptor: false,
            no_longitudinal: false,
            camera_only: false,
        }
    }

    #[test]
    fn test_resolve_flags() {
        let profile = ProfileCommand {
            interceptor: true,
            camera_only: true,
            ..command()
        }
        .resolve()
        .unwrap();
        assert_eq!(profile.car_model, CarModel::Highlander);
        assert!(profile.has_gas_interceptor);
        assert!(!profile.enable_dsu);
    }

    #[test]
    fn test_resolve_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "car_model = \"CAMRY\"").unwrap();
        let profile = ProfileCommand {
            file: Some(file.path().to_path_buf()),
            ..command()
        }
        .resolve()
        .unwrap();
        assert_eq!(profile.car_model, CarModel::Camry);
    }
}
