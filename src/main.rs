use anyhow::Context;
use clap::Parser;
use job_skill_radar::utils::error::ErrorSeverity;
use job_skill_radar::utils::logger::{init_logger, LogFormat};
use job_skill_radar::utils::validation::Validate;
use job_skill_radar::{
    CliArgs, GroqClient, IndeedScraper, LocalStorage, RadarConfig, RadarEngine, SkillPipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();

    // 載入配置，命令列參數優先
    let mut config = match RadarConfig::load_or_default(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file is valid TOML format");
            std::process::exit(1);
        }
    };
    args.apply_to(&mut config);

    let log_format = if config.monitoring.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    init_logger(log_format, args.verbose);

    tracing::info!("Starting job skill radar");
    if args.verbose {
        tracing::debug!("Resolved config: {:?}", redacted(&config));
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No requests will be made");
        return Ok(());
    }

    let api_key = config
        .resolved_api_key()
        .context("GROQ_API_KEY environment variable not set")?;
    let model = GroqClient::new(&config.llm, api_key).context("failed to build language model client")?;
    let source = IndeedScraper::new(&config.scrape).context("failed to build listings scraper")?;
    let storage = LocalStorage::new(config.output_path().to_string());

    let monitor_enabled = config.monitoring.enabled;
    if monitor_enabled {
        tracing::info!("🔍 Process monitoring enabled");
    }

    let pipeline = SkillPipeline::new(storage, model, source, config);
    let engine = RadarEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Analysis complete!");
            println!("✅ Analysis complete!");
            println!("📁 Output files saved to {}/", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

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

    Ok(())
}

fn redacted(config: &RadarConfig) -> RadarConfig {
    let mut copy = config.clone();
    if copy.llm.api_key.is_some() {
        copy.llm.api_key = Some("***".to_string());
    }
    copy
}

fn display_config_summary(config: &RadarConfig) {
    println!("📋 Configuration Summary:");
    println!("  Model: {} ({})", config.llm.model, config.llm.base_url);
    println!("  Listings: {}", config.scrape.base_url);
    println!(
        "  Keywords: {}, Pages per keyword: {}",
        config.analysis.keywords, config.scrape.pages
    );
    if !config.scrape.location.is_empty() {
        println!("  Location: {}", config.scrape.location);
    }
    println!("  Output: {}", config.output_path());
    println!(
        "  Discover new skills: {}, Bundle: {}",
        config.analysis.discover_new_skills, config.output.bundle
    );
}
