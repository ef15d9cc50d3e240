use carousel_ranker::core::{ConfigProvider, RankingResult};
use carousel_ranker::utils::error::ErrorSeverity;
use carousel_ranker::utils::{logger, validation::Validate};
use carousel_ranker::{CliArgs, LocalStorage, RankerConfig, RankingEngine, RankingPipeline};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting carousel-ranker");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let config = match args.resolve().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    display_config_summary(&config, &args);

    let monitor_enabled = config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.base_dir().to_string());
    let top_n = config.top_n();
    let pipeline = RankingPipeline::new(storage, config);
    let engine = RankingEngine::new_with_monitoring(pipeline, monitor_enabled);

    let outcome = if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no files will be written");
        engine.preview().await.map(|result| print_ranking(&result))
    } else {
        engine.run().await.map(|summary| {
            tracing::info!("✅ Ranked {} products", summary.ranked_count);
            println!(
                "✅ Top {} products saved to {} ({} ranked)",
                top_n, summary.json_path, summary.ranked_count
            );
            if let Some(csv_path) = summary.csv_path {
                println!("📁 CSV output written to {}", csv_path);
            }
        })
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ Ranking failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

fn display_config_summary(config: &RankerConfig, args: &CliArgs) {
    let thresholds = config.thresholds();

    println!("📋 Configuration Summary:");
    println!("  Base directory: {}", config.base_dir());
    println!("  Catalog: {}", config.data_file());
    println!("  Overrides: {}", config.override_file());
    println!("  JSON output: {}", config.json_output());
    match config.csv_output() {
        Some(path) => println!("  CSV output: {}", path),
        None => println!("  CSV output: disabled"),
    }
    println!("  Top N: {}", config.top_n());
    println!(
        "  Eligibility: stock >= {}, sold >= {}",
        thresholds.min_units_in_stock, thresholds.min_volume_sold
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn print_ranking(result: &RankingResult) {
    println!(
        "🏆 Ranking ({} of {} eligible products):",
        result.ranked.len(),
        result.eligible_count
    );
    println!("{:>4}  {:<40} {:>10} {:>8}  {}", "#", "Product", "Score", "Sold", "");
    for (i, scored) in result.ranked.iter().enumerate() {
        println!(
            "{:>4}  {:<40} {:>10.1} {:>8}  {}",
            i + 1,
            scored.name(),
            scored.score,
            scored.volume_sold(),
            if scored.overridden { "📌 override" } else { "" }
        );
    }
}
