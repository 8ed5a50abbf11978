use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use weather_lookup::{
    LookupError, ViewSlot, WeatherClient,
    config::{RuntimeConfig, SourceMode, WEATHER_LOG_ENV},
    error::ErrorKind,
    geolocation::{FixedGeolocator, Geolocator},
    locale::{self, Language},
    model::QueryKind,
    providers::{DataSource, build_source},
    view::{RenderInstruction, WeatherCard, render_instruction},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Weather lookup by city name or current location")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Current weather and five-day forecast for a city.
    Search {
        #[arg(long)]
        city: Option<String>,
        #[command(flatten)]
        args: OutputArgs,
    },
    /// Current weather and five-day forecast for the device location.
    Locate {
        #[command(flatten)]
        args: OutputArgs,
    },
}

#[derive(Debug, Clone, Copy, Args)]
struct OutputArgs {
    #[arg(long, value_enum)]
    output: Option<OutputModeArg>,
    #[arg(long)]
    json: bool,
    #[arg(long, value_enum)]
    lang: Option<LanguageArg>,
    #[arg(long, value_enum)]
    source: Option<SourceArg>,
}

const ENVELOPE_SCHEMA_VERSION: &str = "v1";
const ERROR_CODE_USER_OUTPUT_MODE_CONFLICT: &str = "user.output_mode_conflict";
const ERROR_CODE_RUNTIME_SERIALIZE: &str = "runtime.serialize_failed";
const ERROR_CODE_RUNTIME_RENDER: &str = "runtime.render_failed";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputModeArg {
    Human,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliOutputMode {
    Human,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LanguageArg {
    Ar,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    Static,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliError {
    kind: ErrorKind,
    code: &'static str,
    message: String,
    reason: Option<String>,
}

impl CliError {
    fn user(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::User,
            code,
            message: message.into(),
            reason: None,
        }
    }

    fn runtime(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Runtime,
            code,
            message: message.into(),
            reason: None,
        }
    }

    fn lookup(error: &LookupError, query_kind: QueryKind, language: Language) -> Self {
        Self {
            kind: error.kind(),
            code: error.code(),
            message: locale::error_message(error, query_kind, language).to_string(),
            reason: Some(error.to_string()),
        }
    }

    fn exit_code(&self) -> i32 {
        match self.kind {
            ErrorKind::User => 2,
            ErrorKind::Runtime => 1,
        }
    }
}

impl From<OutputModeArg> for CliOutputMode {
    fn from(value: OutputModeArg) -> Self {
        match value {
            OutputModeArg::Human => CliOutputMode::Human,
            OutputModeArg::Json => CliOutputMode::Json,
        }
    }
}

impl From<LanguageArg> for Language {
    fn from(value: LanguageArg) -> Self {
        match value {
            LanguageArg::Ar => Language::Ar,
            LanguageArg::En => Language::En,
        }
    }
}

impl From<SourceArg> for SourceMode {
    fn from(value: SourceArg) -> Self {
        match value {
            SourceArg::Static => SourceMode::Static,
            SourceArg::Remote => SourceMode::Remote,
        }
    }
}

impl OutputArgs {
    fn apply_to(self, mut config: RuntimeConfig) -> RuntimeConfig {
        if let Some(lang) = self.lang {
            config.language = lang.into();
        }
        if let Some(source) = self.source {
            config.source = source.into();
        }
        config
    }
}

impl Cli {
    fn command_name(&self) -> &'static str {
        match &self.command {
            Commands::Search { .. } => "weather.search",
            Commands::Locate { .. } => "weather.locate",
        }
    }

    fn query_kind(&self) -> QueryKind {
        match &self.command {
            Commands::Search { .. } => QueryKind::City,
            Commands::Locate { .. } => QueryKind::Coordinates,
        }
    }

    fn output_args(&self) -> OutputArgs {
        match &self.command {
            Commands::Search { args, .. } | Commands::Locate { args } => *args,
        }
    }

    fn output_mode_hint(&self) -> CliOutputMode {
        let args = self.output_args();
        if args.json {
            CliOutputMode::Json
        } else if let Some(explicit) = args.output {
            explicit.into()
        } else {
            CliOutputMode::Human
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let command = cli.command_name();
    let output_mode = cli.output_mode_hint();
    match run(cli).await {
        Ok(output) => println!("{output}"),
        Err(error) => {
            emit_error(command, output_mode, &error);
            std::process::exit(error.exit_code());
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(WEATHER_LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(cli: Cli) -> Result<String, CliError> {
    let (output_mode, config, source) = prepare(&cli, RuntimeConfig::from_env())?;
    run_with(&cli, output_mode, &config, source, Utc::now).await
}

/// Settles the output mode and flag overrides, then builds the data source.
///
/// Flag conflicts are usage errors and are reported before any source
/// configuration problem.
fn prepare(
    cli: &Cli,
    env_config: RuntimeConfig,
) -> Result<(CliOutputMode, RuntimeConfig, Arc<dyn DataSource>), CliError> {
    let (output_mode, config) = resolve_invocation(cli, env_config)?;
    let source = build_source(&config)
        .map_err(|error| CliError::lookup(&error, cli.query_kind(), config.language))?;
    Ok((output_mode, config, source))
}

fn resolve_invocation(
    cli: &Cli,
    env_config: RuntimeConfig,
) -> Result<(CliOutputMode, RuntimeConfig), CliError> {
    let args = cli.output_args();
    let output_mode = resolve_output_mode(args.output, args.json, CliOutputMode::Human)?;
    Ok((output_mode, args.apply_to(env_config)))
}

async fn run_with<N>(
    cli: &Cli,
    output_mode: CliOutputMode,
    config: &RuntimeConfig,
    source: Arc<dyn DataSource>,
    now_fn: N,
) -> Result<String, CliError>
where
    N: Fn() -> DateTime<Utc> + Send + Sync + 'static,
{
    let command = cli.command_name();

    let slot = Arc::new(ViewSlot::new());
    let client = WeatherClient::new(source, slot.clone())
        .with_clock(now_fn)
        .with_language(config.language)
        .with_timezone(config.timezone);

    let outcome = match &cli.command {
        Commands::Search { city, .. } => client.search(city.as_deref().unwrap_or_default()).await,
        Commands::Locate { .. } => {
            let locator = config
                .current_location
                .as_deref()
                .map(FixedGeolocator::from_setting);
            client
                .locate(locator.as_ref().map(|locator| locator as &dyn Geolocator))
                .await
        }
    };
    outcome.map_err(|error| CliError::lookup(&error, cli.query_kind(), config.language))?;

    let state = slot
        .current()
        .ok_or_else(|| CliError::runtime(ERROR_CODE_RUNTIME_RENDER, "no view was rendered"))?;
    let instruction = render_instruction(&state, client.render_options());

    match output_mode {
        CliOutputMode::Json => render_json_envelope(command, &instruction),
        CliOutputMode::Human => Ok(format_text_output(&instruction, config.language)),
    }
}

fn resolve_output_mode(
    output: Option<OutputModeArg>,
    json_flag: bool,
    default_mode: CliOutputMode,
) -> Result<CliOutputMode, CliError> {
    match (output.map(Into::into), json_flag) {
        (Some(mode), true) if mode != CliOutputMode::Json => Err(CliError::user(
            ERROR_CODE_USER_OUTPUT_MODE_CONFLICT,
            format!(
                "conflicting output flags: --json requires --output json (got {})",
                output_mode_label(mode)
            ),
        )),
        (Some(mode), _) => Ok(mode),
        (None, true) => Ok(CliOutputMode::Json),
        (None, false) => Ok(default_mode),
    }
}

fn render_json_envelope(command: &str, instruction: &RenderInstruction) -> Result<String, CliError> {
    let result = serde_json::to_value(instruction).map_err(|error| {
        CliError::runtime(
            ERROR_CODE_RUNTIME_SERIALIZE,
            format!("failed to serialize output: {error}"),
        )
    })?;
    serde_json::to_string(&json!({
        "schema_version": ENVELOPE_SCHEMA_VERSION,
        "command": command,
        "ok": true,
        "result": result,
    }))
    .map_err(|error| {
        CliError::runtime(
            ERROR_CODE_RUNTIME_SERIALIZE,
            format!("failed to serialize output envelope: {error}"),
        )
    })
}

fn emit_error(command: &str, output_mode: CliOutputMode, error: &CliError) {
    match output_mode {
        CliOutputMode::Json => {
            let payload = json!({
                "schema_version": ENVELOPE_SCHEMA_VERSION,
                "command": command,
                "ok": false,
                "error": {
                    "code": error.code,
                    "message": error.message,
                    "details": {
                        "kind": error_kind_label(error.kind),
                        "exit_code": error.exit_code(),
                        "reason": error.reason,
                    }
                }
            });
            let rendered = serde_json::to_string(&payload).unwrap_or_else(|serialize_error| {
                tracing::error!(%serialize_error, "failed to serialize error envelope");
                format!(
                    "{{\"schema_version\":\"{ENVELOPE_SCHEMA_VERSION}\",\"command\":\"{command}\",\"ok\":false,\"error\":{{\"code\":\"{ERROR_CODE_RUNTIME_SERIALIZE}\",\"message\":\"failed to serialize error envelope\"}}}}"
                )
            });
            println!("{rendered}");
        }
        CliOutputMode::Human => {
            eprintln!("error[{}]: {}", error.code, error.message);
            if let Some(reason) = &error.reason {
                eprintln!("  caused by: {reason}");
            }
        }
    }
}

fn error_kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::User => "user",
        ErrorKind::Runtime => "runtime",
    }
}

fn output_mode_label(mode: CliOutputMode) -> &'static str {
    match mode {
        CliOutputMode::Human => "human",
        CliOutputMode::Json => "json",
    }
}

fn format_text_output(instruction: &RenderInstruction, language: Language) -> String {
    match instruction {
        RenderInstruction::ShowLoading => locale::loading_label(language).to_string(),
        RenderInstruction::ShowError { message } => message.clone(),
        RenderInstruction::ShowWeather(card) => format_weather_card(card, language),
    }
}

fn format_weather_card(card: &WeatherCard, language: Language) -> String {
    let labels = locale::detail_labels(language);
    let mut lines = vec![
        format!("{} | {}", card.city, card.date),
        format!("{} {} [{}]", card.temperature, card.description, card.icon),
        format!("{}: {}", labels.visibility, card.visibility),
        format!("{}: {}", labels.humidity, card.humidity),
        format!("{}: {}", labels.wind, card.wind_speed),
        format!("{}: {}", labels.feels_like, card.feels_like),
        format!("{}: {}", labels.pressure, card.pressure),
        format!("{}: {}", labels.uv_index, card.uv_index),
    ];

    for day in &card.forecast {
        lines.push(format!(
            "{} [{}] {} / {}",
            day.day, day.icon, day.high, day.low
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::Value;
    use weather_lookup::providers::StaticTableSource;

    use super::*;

    fn static_config() -> RuntimeConfig {
        RuntimeConfig::from_pairs(Vec::<(String, String)>::new())
    }

    fn static_source() -> Arc<dyn DataSource> {
        Arc::new(StaticTableSource::with_seed(11))
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0)
            .single()
            .expect("time")
    }

    async fn run_static(argv: &[&str], config: &RuntimeConfig) -> Result<String, CliError> {
        let cli = Cli::parse_from(argv.iter().copied());
        let (output_mode, config) = resolve_invocation(&cli, config.clone())?;
        run_with(&cli, output_mode, &config, static_source(), fixed_now).await
    }

    #[tokio::test]
    async fn main_outputs_search_json_contract() {
        let output = run_static(
            &["weather-lookup", "search", "--city", "القاهرة", "--json"],
            &static_config(),
        )
        .await
        .expect("search should pass");
        let json: Value = serde_json::from_str(&output).expect("json");

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
        assert_eq!(
            result.get("view").and_then(Value::as_str),
            Some("show_weather")
        );
        assert_eq!(result.get("city").and_then(Value::as_str), Some("القاهرة"));
        assert_eq!(
            result.get("temperature").and_then(Value::as_str),
            Some("28°")
        );
        assert_eq!(result.get("uv_index").and_then(Value::as_str), Some("6"));
        assert_eq!(
            result
                .get("forecast")
                .and_then(Value::as_array)
                .map(Vec::len),
            Some(5)
        );
    }

    #[tokio::test]
    async fn main_outputs_human_card_in_english_when_requested() {
        let output = run_static(
            &["weather-lookup", "search", "--city", "dubai", "--lang", "en"],
            &static_config(),
        )
        .await
        .expect("search should pass");

        let first_line = output.lines().next().expect("line");
        assert_eq!(first_line, "دبي | Thursday, October 15, 2026");
        assert!(output.contains("Humidity: "));
        assert!(output.contains("UV index: 6"));
        assert_eq!(output.lines().count(), 8 + 5);
    }

    #[tokio::test]
    async fn main_maps_missing_city_to_invalid_query() {
        let err = run_static(&["weather-lookup", "search"], &static_config())
            .await
            .expect_err("must fail");

        assert_eq!(err.kind, ErrorKind::User);
        assert_eq!(err.code, "user.invalid_query");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.message, "يرجى إدخال اسم مدينة صحيح");
    }

    #[tokio::test]
    async fn main_locate_without_capability_is_unsupported() {
        let err = run_static(&["weather-lookup", "locate", "--json"], &static_config())
            .await
            .expect_err("must fail");

        assert_eq!(err.code, "user.location_unsupported");
    }

    #[tokio::test]
    async fn main_locate_uses_configured_position() {
        let config = RuntimeConfig::from_pairs(vec![(
            "WEATHER_CURRENT_LOCATION",
            "21.4858,39.1925",
        )]);
        let output = run_static(&["weather-lookup", "locate", "--json"], &config)
            .await
            .expect("locate should pass");
        let json: Value = serde_json::from_str(&output).expect("json");

        assert_eq!(
            json.get("command").and_then(Value::as_str),
            Some("weather.locate")
        );
        assert_eq!(
            json.get("result")
                .and_then(|result| result.get("city"))
                .and_then(Value::as_str),
            Some("موقعك الحالي")
        );
    }

    #[tokio::test]
    async fn main_rejects_conflicting_json_flags() {
        let err = run_static(
            &[
                "weather-lookup",
                "search",
                "--city",
                "Cairo",
                "--json",
                "--output",
                "human",
            ],
            &static_config(),
        )
        .await
        .expect_err("must fail");

        assert_eq!(err.kind, ErrorKind::User);
        assert_eq!(err.code, ERROR_CODE_USER_OUTPUT_MODE_CONFLICT);
    }

    #[test]
    fn main_flags_override_environment() {
        let cli = Cli::parse_from([
            "weather-lookup",
            "search",
            "--city",
            "x",
            "--lang",
            "en",
            "--source",
            "remote",
        ]);
        let config = cli.output_args().apply_to(static_config());

        assert_eq!(config.language, Language::En);
        assert_eq!(config.source, SourceMode::Remote);
    }

    #[test]
    fn exit_code_mapping_user_and_runtime_are_stable() {
        assert_eq!(CliError::user("user.x", "bad").exit_code(), 2);
        assert_eq!(CliError::runtime("runtime.x", "down").exit_code(), 1);
    }

    #[test]
    fn main_flag_conflict_wins_over_missing_api_key() {
        let cli = Cli::parse_from([
            "weather-lookup",
            "search",
            "--city",
            "Cairo",
            "--source",
            "remote",
            "--json",
            "--output",
            "human",
        ]);

        let Err(err) = prepare(&cli, static_config()) else {
            panic!("conflicting flags must fail");
        };

        assert_eq!(err.kind, ErrorKind::User);
        assert_eq!(err.code, ERROR_CODE_USER_OUTPUT_MODE_CONFLICT);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn main_remote_without_api_key_fails_when_flags_agree() {
        let cli = Cli::parse_from([
            "weather-lookup",
            "search",
            "--city",
            "Cairo",
            "--source",
            "remote",
            "--json",
        ]);

        let Err(err) = prepare(&cli, static_config()) else {
            panic!("remote source without a key must fail");
        };

        assert_eq!(err.code, "runtime.auth_failed");
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn main_locate_invalid_position_uses_location_wording() {
        let config = RuntimeConfig::from_pairs(vec![("WEATHER_CURRENT_LOCATION", "512,NaN")]);
        let err = run_static(&["weather-lookup", "locate", "--json"], &config)
            .await
            .expect_err("must fail");

        assert_eq!(err.code, "user.invalid_query");
        assert_eq!(err.message, "إحداثيات الموقع غير صالحة");
    }

    #[test]
    fn main_help_flag_is_supported() {
        let help = Cli::try_parse_from(["weather-lookup", "--help"]).expect_err("help");
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
