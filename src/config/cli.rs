use crate::domain::model::{AlarmStatus, ArmingStatus, SensorId, SensorType};
use crate::utils::error::Result;
use crate::utils::validation::{validate_sensor_name, validate_state_file, Validate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "home-sentinel")]
#[command(about = "Home security monitor with image-based cat detection")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the state file from the configuration
    #[arg(long)]
    pub state: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show arming status, alarm status, sensors and the last cat verdict
    Status,
    /// Arm the system
    Arm {
        #[arg(value_enum)]
        mode: ArmMode,
    },
    /// Disarm the system and clear the alarm
    Disarm,
    /// Force the alarm status (no_alarm, pending_alarm, alarm)
    Alarm { status: AlarmStatus },
    /// Manage sensors
    Sensor {
        #[command(subcommand)]
        action: SensorCommand,
    },
    /// Analyse a camera image for cats
    Scan { image: PathBuf },
}

#[derive(Debug, Clone, Subcommand)]
pub enum SensorCommand {
    List,
    Add(SensorArgs),
    Remove(SensorArgs),
    Activate(SensorArgs),
    Deactivate(SensorArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SensorArgs {
    pub name: String,
    /// door, window or motion
    #[arg(value_name = "TYPE")]
    pub sensor_type: SensorType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArmMode {
    Home,
    Away,
}

impl From<ArmMode> for ArmingStatus {
    fn from(mode: ArmMode) -> Self {
        match mode {
            ArmMode::Home => ArmingStatus::ArmedHome,
            ArmMode::Away => ArmingStatus::ArmedAway,
        }
    }
}

impl SensorArgs {
    pub fn id(&self) -> SensorId {
        SensorId::new(self.name.trim(), self.sensor_type)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(state) = &self.state {
            validate_state_file("--state", state)?;
        }

        if let Command::Sensor { action } = &self.command {
            match action {
                SensorCommand::List => {}
                SensorCommand::Add(args)
                | SensorCommand::Remove(args)
                | SensorCommand::Activate(args)
                | SensorCommand::Deactivate(args) => {
                    validate_sensor_name(&args.name)?;
                }
            }
        }

        Ok(())
    }
}
