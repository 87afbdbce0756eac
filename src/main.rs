use clap::Parser;
use climb_gear::config::{ClimbArgs, SearchArgs, SpeedArgs, TableArgs};
use climb_gear::core::climb::{cadence_for_power, cadence_speed, estimate_climb};
use climb_gear::core::gear_table::{
    export_table, DEFAULT_TABLE_CHAINRINGS, DEFAULT_TABLE_SPROCKETS,
};
use climb_gear::utils::error::{ErrorSeverity, GearError};
use climb_gear::utils::logger;
use climb_gear::utils::validation::{validate_output_formats, validate_path};
use climb_gear::{CliConfig, Command, DrivetrainCandidate, GearFinder, GearTable, LocalStorage};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting climb-gear CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let outcome = match config.command {
        Command::Search(args) => run_search(args),
        Command::Table(args) => run_table(&args),
        Command::Speed(args) => run_speed(&args),
        Command::Climb(args) => run_climb(&args),
    };

    if let Err(e) = outcome {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ climb-gear failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn run_search(args: SearchArgs) -> Result<(), GearError> {
    let json = args.json;
    let finder = GearFinder::new(args);
    let result = finder.run()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("⚙️ Gear: {}x{}", result.chainring_teeth, result.sprocket_teeth);
        println!("🔄 Cadence: {} rpm", result.cadence_rpm);
        println!("⚙️ Gear Ratio: {:.2}", result.gear_ratio);
        println!("🚀 Speed: {:.2} km/h", result.speed_kmh);
        println!("📈 Gradient: {:.2} %", result.gradient_pct);
        println!("⚡ Power: {:.2} W", result.power_w);
    }
    Ok(())
}

fn run_table(args: &TableArgs) -> Result<(), GearError> {
    let chainrings = args
        .chainrings
        .clone()
        .unwrap_or_else(|| DEFAULT_TABLE_CHAINRINGS.collect());
    let sprockets = args
        .sprockets
        .clone()
        .unwrap_or_else(|| DEFAULT_TABLE_SPROCKETS.collect());
    let table = GearTable::build(&chainrings, &sprockets, args.min_ratio)?;

    if args.formats.is_empty() {
        print!("{}", table.render_text());
        println!(
            "{} of {} ratios are at least {:.2}",
            table.count_meeting_min(),
            chainrings.len() * sprockets.len(),
            args.min_ratio
        );
        return Ok(());
    }

    validate_output_formats("formats", &args.formats)?;
    validate_path("output_path", &args.output_path)?;

    let storage = LocalStorage::new(args.output_path.clone());
    let written = export_table(&storage, &table, &args.formats, &args.filename)?;
    for path in written {
        tracing::info!("📁 Gear table saved to: {}/{}", storage.base_path(), path);
        println!("📁 {}/{}", storage.base_path(), path);
    }
    Ok(())
}

fn run_speed(args: &SpeedArgs) -> Result<(), GearError> {
    let result = cadence_speed(
        args.chainring,
        args.sprocket,
        args.cadence,
        args.wheel.circumference_m(),
    )?;

    println!("🚀 Speed: {:.2} km/h", result.speed_kmh);
    println!("⚙️ Gear Ratio: {:.2}", result.gear_ratio);
    Ok(())
}

fn run_climb(args: &ClimbArgs) -> Result<(), GearError> {
    let profile = args.profile();
    let circumference = args.wheel.circumference_m();

    match (args.cadence, args.target_power_w) {
        (_, Some(target_power_w)) => {
            let estimate = cadence_for_power(
                &profile,
                target_power_w,
                args.chainring,
                args.sprocket,
                circumference,
            )?;
            println!("⚙️ Gear Ratio: {:.2}", estimate.gear_ratio);
            println!("📈 Gradient: {:.2} %", estimate.gradient_pct);
            println!("🔄 Cadence: {:.1} rpm", estimate.cadence_rpm);
            println!("🚀 Speed: {:.2} km/h", estimate.speed_kmh);
            println!("⏱️ Time: {}", estimate.duration);
        }
        (Some(cadence), None) => {
            let candidate = DrivetrainCandidate::new(args.chainring, args.sprocket, cadence);
            let estimate = estimate_climb(&profile, &candidate, circumference)?;
            println!("⚙️ Gear Ratio: {:.2}", estimate.gear_ratio);
            println!("📈 Gradient: {:.2} %", estimate.gradient_pct);
            println!("⏱️ Time: {}", estimate.duration);
            println!("🚀 Speed: {:.2} km/h", estimate.speed_kmh);
            println!("⚡ Power: {:.2} W", estimate.power_w);
        }
        (None, None) => {
            return Err(GearError::MissingConfigError {
                field: "cadence or target_power_w".to_string(),
            });
        }
    }
    Ok(())
}
