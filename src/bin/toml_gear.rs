use anyhow::Context;
use clap::Parser;
use climb_gear::core::gear_table::export_table;
use climb_gear::core::RequestSource;
use climb_gear::utils::{logger, validation::Validate};
use climb_gear::{GearFinder, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-gear")]
#[command(about = "Optimal gear search driven by a TOML climb file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "climb.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override target power from config
    #[arg(long)]
    target_power_w: Option<f64>,

    /// Dry run - show the search space without running it
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based gear search");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    // 應用命令列覆蓋設定
    if let Some(target) = args.target_power_w {
        config.rider.target_power_w = target;
        tracing::info!("🔧 Target power overridden to: {} W", target);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args)?;

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No search will run");
        return Ok(());
    }

    let finder = GearFinder::new(config.clone());
    let result = finder.run().context("Gear search failed")?;

    println!("✅ Best gear for {}:", config.climb_name());
    println!("  Gear: {}x{}", result.chainring_teeth, result.sprocket_teeth);
    println!("  Cadence: {} rpm", result.cadence_rpm);
    println!("  Gear Ratio: {:.2}", result.gear_ratio);
    println!("  Speed: {:.2} km/h", result.speed_kmh);
    println!("  Power: {:.2} W", result.power_w);

    if let Some(output_path) = config.output_path() {
        let table = config.gear_table()?;
        let storage = LocalStorage::new(output_path.to_string());
        let written = export_table(
            &storage,
            &table,
            config.output_formats(),
            config.output_filename(),
        )
        .context("Failed to export gear table")?;

        for path in written {
            tracing::info!("📁 Output saved to: {}/{}", output_path, path);
            println!("📁 Output saved to: {}/{}", output_path, path);
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) -> anyhow::Result<()> {
    let request = config.search_request()?;

    println!("📋 Configuration Summary:");
    println!("  Climb: {}", config.climb_name());
    println!(
        "  Profile: {:.1} kg, {:.0} m over {:.2} km ({:.2} %)",
        request.profile.mass_kg,
        request.profile.elevation_gain_m,
        request.profile.climb_length_km,
        request.profile.gradient_pct()
    );
    println!("  Target Power: {:.0} W", request.target_power_w);
    println!("  Wheel Circumference: {:.3} m", request.wheel_circumference_m);
    println!(
        "  Search Space: {} chainrings x {} sprockets x {} cadences = {} candidates",
        request.domains.chainrings.len(),
        request.domains.sprockets.len(),
        request.domains.cadences.len(),
        request.domains.candidate_count()
    );

    if let Some(path) = config.output_path() {
        println!(
            "  Table Output: {} ({})",
            path,
            config.output_formats().join(", ")
        );
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
    Ok(())
}
