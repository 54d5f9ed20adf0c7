//! 控制器错误类型定义

use carctl_params::ParamsError;
use carctl_protocol::ProtocolError;
use thiserror::Error;

/// 构造期错误
///
/// 角色集合或能力声明不一致时在构造时立即失败，周期内不再检查。
#[derive(Error, Debug)]
pub enum ControllerError {
    /// 没有替代任何原厂控制器
    #[error("Impersonated role set is empty")]
    NoRoles,

    /// 替代 DSU 但未替代前视摄像头
    #[error("DSU role requires the forward camera role")]
    DsuWithoutCamera,

    /// 声明了踏板拦截器但不负责纵向控制
    #[error("Gas interceptor requires longitudinal control")]
    InterceptorWithoutLongitudinal,

    /// 车辆配置非法
    #[error("Params error: {0}")]
    Params(#[from] ParamsError),

    /// 保活报文无法构建
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// 周期内错误
///
/// 返回错误时控制器状态保持不变，也不产生任何报文。
#[derive(Error, Debug)]
pub enum CycleError {
    /// 输入不是有限数
    #[error("Non-finite input {field}: {value}")]
    NonFiniteInput { field: &'static str, value: f64 },

    /// 编码器拒绝某条报文
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_error_display() {
        assert_eq!(
            format!("{}", ControllerError::NoRoles),
            "Impersonated role set is empty"
        );
        assert!(format!("{}", ControllerError::DsuWithoutCamera).contains("forward camera"));

        let err = ControllerError::from(ParamsError::UnknownModel("X".to_string()));
        assert!(format!("{}", err).starts_with("Params error"));
    }

    #[test]
    fn test_cycle_error_display() {
        let err = CycleError::NonFiniteInput {
            field: "steer",
            value: f64::NAN,
        };
        assert_eq!(format!("{}", err), "Non-finite input steer: NaN");

        let err = CycleError::from(ProtocolError::UnknownMessage("FOO".to_string()));
        assert!(format!("{}", err).contains("FOO"));
    }
}
