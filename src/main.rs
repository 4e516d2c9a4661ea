use clap::Parser;
use home_sentinel::adapters::{ConfiguredAnalyzer, JsonFileRepository, TracingListener};
use home_sentinel::config::{CliConfig, Command, LogFormat, SensorCommand, SentinelConfig};
use home_sentinel::utils::error::{ErrorSeverity, SecurityError};
use home_sentinel::utils::{logger, validation::Validate};
use home_sentinel::{AlarmEngine, AlarmStatus, ArmingStatus, Sensor, StatusListener};
use std::sync::Arc;

type Engine = AlarmEngine<JsonFileRepository, ConfiguredAnalyzer>;

/// Echoes every change to the terminal as it happens.
struct ConsoleListener;

impl StatusListener for ConsoleListener {
    fn on_sensor_status_changed(&self, sensor: &Sensor) -> anyhow::Result<()> {
        println!("🔔 Sensor {}", sensor);
        Ok(())
    }

    fn on_alarm_status_changed(&self, status: AlarmStatus) -> anyhow::Result<()> {
        match status {
            AlarmStatus::Alarm => println!("🚨 Alarm status: {}", status),
            _ => println!("🔔 Alarm status: {}", status),
        }
        Ok(())
    }

    fn on_cat_detected(&self, detected: bool) -> anyhow::Result<()> {
        if detected {
            println!("🐈 Cat detected!");
        } else {
            println!("👀 No cat in view");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置 (未指定時使用預設值)
    let mut config = match &cli.config {
        Some(path) => match SentinelConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path.display(), e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => SentinelConfig::default(),
    };

    // 應用命令列覆蓋設定
    if let Some(state) = &cli.state {
        config.storage.state_file = state.clone();
    }

    // 初始化日誌
    match config.logging.format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
        tracing::debug!("Config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = cli.validate().and_then(|()| config.validate()) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let engine = match build_engine(&config).await {
        Ok(engine) => engine,
        Err(e) => exit_with(&e),
    };
    engine.add_status_listener(Arc::new(TracingListener));
    engine.add_status_listener(Arc::new(ConsoleListener));

    if let Err(e) = run_command(&engine, cli.command).await {
        exit_with(&e);
    }

    Ok(())
}

async fn build_engine(config: &SentinelConfig) -> home_sentinel::Result<Engine> {
    let repository = JsonFileRepository::open(config.state_file()).await?;
    let analyzer = ConfiguredAnalyzer::from_config(&config.analysis)?;
    tracing::info!(
        "Using state file {} with {:?} image analysis",
        repository.path().display(),
        config.analysis.provider
    );
    Ok(AlarmEngine::with_confidence_threshold(
        repository,
        analyzer,
        config.confidence_threshold(),
    ))
}

async fn run_command(engine: &Engine, command: Command) -> home_sentinel::Result<()> {
    match command {
        Command::Status => {}
        Command::Arm { mode } => engine.set_arming_status(mode.into()).await?,
        Command::Disarm => engine.set_arming_status(ArmingStatus::Disarmed).await?,
        Command::Alarm { status } => engine.set_alarm_status(status).await?,
        Command::Sensor { action } => match action {
            SensorCommand::List => {
                for sensor in engine.get_sensors().await? {
                    println!("{}", sensor);
                }
                return Ok(());
            }
            SensorCommand::Add(args) => {
                engine.add_sensor(Sensor::new(args.name.trim(), args.sensor_type)).await?;
                println!("✅ Added sensor {}", args.id());
            }
            SensorCommand::Remove(args) => {
                let removed = engine.remove_sensor(&args.id()).await?;
                println!("🗑️  Removed sensor {}", removed.id);
            }
            SensorCommand::Activate(args) => {
                engine.change_sensor_activation_status(&args.id(), true).await?
            }
            SensorCommand::Deactivate(args) => {
                engine.change_sensor_activation_status(&args.id(), false).await?
            }
        },
        Command::Scan { image } => {
            let bytes = tokio::fs::read(&image).await?;
            tracing::info!("Scanning {} ({} bytes)", image.display(), bytes.len());
            engine.process_image(&bytes).await?;
        }
    }

    print_state(engine).await
}

async fn print_state(engine: &Engine) -> home_sentinel::Result<()> {
    let state = engine.state().await?;
    println!("Arming: {}", state.arming_status);
    println!("Alarm:  {}", state.alarm_status);
    println!("Cat:    {}", if state.cat_detected { "detected" } else { "not detected" });
    if state.sensors.is_empty() {
        println!("Sensors: none");
    } else {
        println!("Sensors:");
        for sensor in &state.sensors {
            println!("  {}", sensor);
        }
    }
    Ok(())
}

fn exit_with(e: &SecurityError) -> ! {
    tracing::error!(
        "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 4,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
