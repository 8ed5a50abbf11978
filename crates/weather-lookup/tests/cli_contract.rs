use std::process::{Command, Output};

use serde_json::Value;

const WEATHER_ENV_KEYS: [&str; 8] = [
    "WEATHER_SOURCE",
    "WEATHER_API_KEY",
    "WEATHER_BASE_URL",
    "WEATHER_TIMEOUT_SECS",
    "WEATHER_LANG",
    "WEATHER_TIMEZONE",
    "WEATHER_CURRENT_LOCATION",
    "WEATHER_LOG",
];

fn run_cli(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_weather-lookup"));
    cmd.args(args);
    for key in WEATHER_ENV_KEYS {
        cmd.env_remove(key);
    }
    cmd.env("WEATHER_SOURCE", "static");
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("run weather-lookup")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout json")
}

#[test]
fn cli_contract_search_json_envelope_for_canonical_city() {
    let output = run_cli(&["search", "--city", "القاهرة", "--json"], &[]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(
        json.get("schema_version").and_then(Value::as_str),
        Some("v1")
    );
    assert_eq!(
        json.get("command").and_then(Value::as_str),
        Some("weather.search")
    );
    assert_eq!(json.get("ok").and_then(Value::as_bool), Some(true));

    let result = json.get("result").expect("result");
    for field in [
        "view",
        "city",
        "date",
        "temperature",
        "description",
        "icon",
        "visibility",
        "humidity",
        "wind_speed",
        "feels_like",
        "pressure",
        "uv_index",
        "forecast",
    ] {
        assert!(result.get(field).is_some(), "missing field: {field}");
    }
    assert_eq!(
        result.get("temperature").and_then(Value::as_str),
        Some("28°")
    );
    assert_eq!(
        result.get("icon").and_then(Value::as_str),
        Some("fas fa-sun")
    );
}

#[test]
fn cli_contract_alias_resolves_to_canonical_city() {
    let output = run_cli(&["search", "--city", "CAIRO", "--json"], &[]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(
        json.get("result")
            .and_then(|result| result.get("city"))
            .and_then(Value::as_str),
        Some("القاهرة")
    );
}

#[test]
fn cli_contract_missing_city_is_user_error() {
    let output = run_cli(&["search", "--json"], &[]);

    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    assert_eq!(json.get("ok").and_then(Value::as_bool), Some(false));
    assert_eq!(
        json.get("error")
            .and_then(|error| error.get("code"))
            .and_then(Value::as_str),
        Some("user.invalid_query")
    );
}

#[test]
fn cli_contract_locate_without_capability_is_unsupported() {
    let output = run_cli(&["locate", "--json"], &[]);

    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    assert_eq!(
        json.get("error")
            .and_then(|error| error.get("code"))
            .and_then(Value::as_str),
        Some("user.location_unsupported")
    );
}

#[test]
fn cli_contract_locate_denied_maps_to_error_code() {
    let output = run_cli(
        &["locate", "--json"],
        &[("WEATHER_CURRENT_LOCATION", "denied")],
    );

    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    assert_eq!(
        json.get("error")
            .and_then(|error| error.get("code"))
            .and_then(Value::as_str),
        Some("user.location_denied")
    );
}

#[test]
fn cli_contract_locate_with_coordinates_uses_current_location_label() {
    let output = run_cli(
        &["locate", "--json"],
        &[("WEATHER_CURRENT_LOCATION", "25.2048,55.2708")],
    );

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(
        json.get("result")
            .and_then(|result| result.get("city"))
            .and_then(Value::as_str),
        Some("موقعك الحالي")
    );
}

#[test]
fn cli_contract_remote_without_api_key_is_runtime_error() {
    let output = run_cli(&["search", "--city", "Cairo", "--source", "remote"], &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error[runtime.auth_failed]"));
}

#[test]
fn cli_contract_output_flag_conflict_reported_before_source_setup() {
    let output = run_cli(
        &[
            "search", "--city", "Cairo", "--source", "remote", "--json", "--output", "human",
        ],
        &[],
    );

    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    assert_eq!(
        json.get("error")
            .and_then(|error| error.get("code"))
            .and_then(Value::as_str),
        Some("user.output_mode_conflict")
    );
}

#[test]
fn cli_contract_human_output_prints_card() {
    let output = run_cli(
        &["search", "--city", "Riyadh", "--lang", "en"],
        &[("WEATHER_TIMEZONE", "Asia/Riyadh")],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("الرياض | "));
    assert!(stdout.contains("Pressure: "));
    assert!(stdout.contains("hPa"));
}
