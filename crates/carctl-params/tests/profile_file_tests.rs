//! 车辆配置文件加载测试

use carctl_params::{CarModel, ControllerParams, ParamsError, TSS2_CAR, VehicleProfile};
use std::io::Write;

fn write_profile(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_every_builtin_model_has_valid_profile() {
    for model in CarModel::ALL {
        let profile = VehicleProfile::for_model(model);
        profile.validate().unwrap();
        assert_eq!(profile.enable_dsu, !TSS2_CAR.contains(model), "{}", model);
    }
}

#[test]
fn test_saved_profile_loads_back() {
    let profile = VehicleProfile::for_model(CarModel::Corolla)
        .with_gas_interceptor(true)
        .with_params(ControllerParams {
            steer_max: 1200,
            ..Default::default()
        });
    let file = write_profile(&profile.to_toml_string().unwrap());

    let loaded = VehicleProfile::load_from_file(file.path()).unwrap();
    assert_eq!(loaded, profile);
}

#[test]
fn test_custom_static_table() {
    let file = write_profile(
        r#"
car_model = "PRIUS"
enable_dsu = true

[[static_msgs]]
address = 0x141
ecu = "dsu"
models = ["PRIUS"]
bus = 1
frame_step = 2
payload = [0, 0, 0, 0x46]
"#,
    );

    let profile = VehicleProfile::load_from_file(file.path()).unwrap();
    assert_eq!(profile.static_msgs.len(), 1);
    assert_eq!(profile.applicable_static_msgs().count(), 1);
    assert_eq!(profile.static_msgs[0].payload, vec![0, 0, 0, 0x46]);
}

#[test]
fn test_invalid_static_table_rejected() {
    let file = write_profile(
        r#"
car_model = "PRIUS"

[[static_msgs]]
address = 0x141
ecu = "dsu"
models = ["PRIUS"]
bus = 1
frame_step = 0
payload = []
"#,
    );

    let err = VehicleProfile::load_from_file(file.path()).unwrap_err();
    assert!(matches!(
        err,
        ParamsError::InvalidStaticMessage { address: 0x141, .. }
    ));
}

#[test]
fn test_profile_json_view() {
    // CLI 以 JSON 形式输出配置时依赖的字段名
    let profile = VehicleProfile::for_model(CarModel::LexusIs);
    let value = serde_json::to_value(&profile).unwrap();
    assert_eq!(value["car_model"], "LEXUS_IS");
    assert_eq!(value["alt_cancel_models"][0], "LEXUS_IS");
    assert_eq!(value["params"]["steer_max"], 1500);
}
