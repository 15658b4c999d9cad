use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunScope {
    All,
    Schedule,
    Electives,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "course-schedule-etl")]
#[command(about = "Convert course schedule sheets to JSON and forecast elective offerings")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "schedule-etl.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Which pipelines to run
    #[arg(long, value_enum, default_value = "all")]
    pub only: RunScope,

    /// Pin the current year used for forecasting
    #[arg(long)]
    pub year: Option<i32>,

    /// Show what would be processed without executing
    #[arg(long)]
    pub dry_run: bool,
}
