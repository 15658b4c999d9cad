use clap::Parser;
use course_schedule_etl::core::Clock;
use course_schedule_etl::utils::error::EtlError;
use course_schedule_etl::utils::{logger, validation::Validate};
use course_schedule_etl::{
    CliConfig, ConfiguredSource, FixedClock, LocalStorage, RunScope, ScheduleRun, SystemClock,
    TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Loading configuration from: {}", args.config);

    let config = match TomlConfig::from_file(&args.config).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => exit_with(&e, 1),
    };

    let current_year = match args.year {
        Some(year) => FixedClock(year).current_year(),
        None => SystemClock.current_year(),
    };

    if args.dry_run {
        display_plan(&config, &args, current_year);
        return Ok(());
    }

    let source = match ConfiguredSource::from_config(&config) {
        Ok(source) => source,
        Err(e) => exit_with(&e, 1),
    };
    let storage = LocalStorage::new(config.output_path().to_string());
    let run = ScheduleRun::new(config, source, storage, current_year);

    if matches!(args.only, RunScope::All | RunScope::Schedule) {
        let summary = run.run_semesters().await?;
        for (title, e) in &summary.failed {
            eprintln!("[WARN] Skipped {}: {}", title, e.user_friendly_message());
        }
        tracing::info!(
            "Schedule pass finished: {} written, {} skipped",
            summary.completed.len(),
            summary.failed.len()
        );
    }

    if matches!(args.only, RunScope::All | RunScope::Electives) {
        match run.run_electives().await {
            Ok(Some(path)) => tracing::info!("Electives saved to '{}'", path),
            Ok(None) => {}
            Err(e) => exit_with(&e, 3),
        }
    }

    Ok(())
}

fn exit_with(e: &EtlError, code: i32) -> ! {
    tracing::error!(
        "{} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("[FATAL] {}", e.user_friendly_message());
    eprintln!("Suggestion: {}", e.recovery_suggestion());
    std::process::exit(code);
}

fn display_plan(config: &TomlConfig, args: &CliConfig, current_year: i32) {
    println!("Configuration Summary:");
    println!("  Source: {}", config.source.r#type);
    println!("  Output: {}", config.output_path());
    println!("  Manifest: {}", config.manifest_file());
    println!("  Scope: {:?}", args.only);
    println!();

    if matches!(args.only, RunScope::All | RunScope::Schedule) {
        println!("Semesters (header marker '{}'):", config.schedule.marker);
        for semester in &config.semesters {
            println!(
                "  {} <- {} -> {}",
                semester.display_title,
                semester.sheet_ref(),
                semester.output_json_file
            );
        }
        println!();
    }

    if matches!(args.only, RunScope::All | RunScope::Electives) {
        match &config.electives {
            Some(electives) => {
                println!("Electives (header marker '{}'):", electives.marker);
                println!(
                    "  {} -> {}",
                    electives.sheet_ref(),
                    electives.output_json_file
                );
                println!(
                    "  Forecast window: {} through {}",
                    current_year,
                    current_year.saturating_add_unsigned(electives.prediction_years)
                );
            }
            None => println!("Electives: not configured"),
        }
    }
}
