//! 控制器可调常量
//!
//! 集中定义纵向/横向限幅常量，避免在控制代码中散落"魔法数"。
//! 默认值即 Toyota 原厂控制器可接受的范围。

use serde::{Deserialize, Serialize};

use crate::ParamsError;

/// 英里/小时 → 米/秒
pub const MPH_TO_MS: f64 = 0.44704;

/// 控制器参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerParams {
    /// 加速度滞回带宽（归一化单位）
    pub accel_hyst_gap: f64,

    /// 最大加速度（m/s²）
    pub accel_max: f64,

    /// 最小加速度（m/s²）
    pub accel_min: f64,

    /// 加速度比例尺（归一化指令 → m/s²）
    pub accel_scale: f64,

    /// 最大转向力矩（内部单位）
    pub steer_max: i32,

    /// 单周期力矩增加步长上限
    pub steer_delta_up: i32,

    /// 单周期力矩回落步长上限
    pub steer_delta_down: i32,

    /// 指令力矩与 EPS 实测力矩的最大偏差
    pub steer_error_max: i32,

    /// 原厂 ACC 最低可用车速（m/s），低于此速度切换到踏板拦截器
    pub min_acc_speed: f64,

    /// 拦截器退出的滞回余量（m/s）
    pub pedal_hyst_gap: f64,

    /// 使用拦截器时 ACC 通道的正向偏置（减少 ABS 泵工作）
    pub interceptor_accel_offset: f64,

    /// 低于此车速时总是声明前车存在（m/s），保证原厂巡航可接合
    pub lead_assume_speed: f64,

    /// EPS 故障状态码，命中时立即切断转向
    pub steer_fault_codes: Vec<u8>,
}

impl Default for ControllerParams {
    fn default() -> Self {
        let accel_max = 1.5;
        let accel_min = -3.0;
        Self {
            accel_hyst_gap: 0.06,
            accel_max,
            accel_min,
            accel_scale: f64::max(accel_max, -accel_min),
            steer_max: 1500,
            steer_delta_up: 10,
            steer_delta_down: 25,
            steer_error_max: 350,
            min_acc_speed: 19.0 * MPH_TO_MS,
            pedal_hyst_gap: 3.0 * MPH_TO_MS,
            interceptor_accel_offset: 0.06,
            lead_assume_speed: 12.0,
            steer_fault_codes: vec![9, 25],
        }
    }
}

impl ControllerParams {
    /// 单周期允许的最大力矩变化量
    pub fn max_steer_delta(&self) -> i32 {
        self.steer_delta_up.max(self.steer_delta_down)
    }

    /// EPS 状态码是否为转向故障
    pub fn is_steer_fault(&self, code: u8) -> bool {
        self.steer_fault_codes.contains(&code)
    }

    /// 校验参数
    ///
    /// 在构造控制器时调用，任何一项不满足都拒绝构造。
    pub fn validate(&self) -> Result<(), ParamsError> {
        let finite = [
            ("accel_hyst_gap", self.accel_hyst_gap),
            ("accel_max", self.accel_max),
            ("accel_min", self.accel_min),
            ("accel_scale", self.accel_scale),
            ("min_acc_speed", self.min_acc_speed),
            ("pedal_hyst_gap", self.pedal_hyst_gap),
            ("interceptor_accel_offset", self.interceptor_accel_offset),
            ("lead_assume_speed", self.lead_assume_speed),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ParamsError::invalid(field, format!("{} is not finite", value)));
            }
        }

        if self.accel_hyst_gap < 0.0 {
            return Err(ParamsError::invalid("accel_hyst_gap", "must be >= 0"));
        }
        if self.accel_min >= self.accel_max {
            return Err(ParamsError::invalid(
                "accel_min",
                format!("{} must be below accel_max {}", self.accel_min, self.accel_max),
            ));
        }
        if self.accel_scale <= 0.0 {
            return Err(ParamsError::invalid("accel_scale", "must be > 0"));
        }
        if self.steer_max <= 0 {
            return Err(ParamsError::invalid("steer_max", "must be > 0"));
        }
        if self.steer_delta_up <= 0 || self.steer_delta_down <= 0 {
            return Err(ParamsError::invalid("steer_delta", "up/down steps must be > 0"));
        }
        if self.steer_error_max < 0 {
            return Err(ParamsError::invalid("steer_error_max", "must be >= 0"));
        }
        if self.min_acc_speed < 0.0 || self.pedal_hyst_gap < 0.0 {
            return Err(ParamsError::invalid(
                "min_acc_speed",
                "speed thresholds must be >= 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let params = ControllerParams::default();
        assert_eq!(params.accel_hyst_gap, 0.06);
        assert_eq!(params.accel_scale, 3.0);
        assert_eq!(params.steer_max, 1500);
        assert_eq!(params.max_steer_delta(), 25);
        assert!((params.min_acc_speed - 8.49376).abs() < 1e-9);
        assert!((params.pedal_hyst_gap - 1.34112).abs() < 1e-9);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_steer_fault_codes() {
        let params = ControllerParams::default();
        assert!(params.is_steer_fault(9));
        assert!(params.is_steer_fault(25));
        assert!(!params.is_steer_fault(5));
        assert!(!params.is_steer_fault(0));
    }

    #[test]
    fn test_validate_rejects_inverted_accel_bounds() {
        let params = ControllerParams {
            accel_min: 2.0,
            accel_max: 1.0,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert!(matches!(err, ParamsError::InvalidParam { field: "accel_min", .. }));
    }

    #[test]
    fn test_validate_rejects_zero_steps() {
        let params = ControllerParams {
            steer_delta_up: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let params = ControllerParams {
            accel_scale: f64::NAN,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert!(format!("{}", err).contains("accel_scale"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let params: ControllerParams = toml::from_str("steer_max = 1000\n").unwrap();
        assert_eq!(params.steer_max, 1000);
        assert_eq!(params.steer_delta_up, 10);
        assert_eq!(params.steer_fault_codes, vec![9, 25]);
    }
}
