use clap::Parser;
use slcsp_etl::core::ConfigProvider;
use slcsp_etl::utils::{logger, validation::Validate};
use slcsp_etl::{EtlEngine, LocalStorage, SlcspPipeline, TomlConfig};
use std::path::Path;

#[derive(Parser)]
#[command(name = "toml-slcsp")]
#[command(about = "SLCSP ETL driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "slcsp-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the number of resolution workers from config
    #[arg(long)]
    workers: Option<usize>,

    /// Dry run - check configuration and input files without processing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let verbose = args.verbose || config.log_level() == Some("debug");
    logger::init_cli_logger(verbose);

    tracing::info!("🚀 Starting TOML-based SLCSP ETL");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 套用命令列覆蓋設定
    if let Some(workers) = args.workers {
        config
            .resolve
            .get_or_insert(slcsp_etl::config::toml_config::ResolveConfig { workers: None })
            .workers = Some(workers);
        tracing::info!("🔧 Workers overridden to: {}", workers);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        if !perform_dry_run(&config) {
            std::process::exit(1);
        }
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    let storage = LocalStorage::new(config.data_dir().to_string());
    let pipeline = SlcspPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ SLCSP rates written to: {}", output_path);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }
    }
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Pipeline: {}", config.pipeline.name);
    if let Some(description) = &config.pipeline.description {
        tracing::info!("   {}", description);
    }
    tracing::info!("   Data dir: {}", config.data_dir());
    tracing::info!(
        "   Inputs: {}, {}, {}",
        config.plans_file(),
        config.zips_file(),
        config.slcsp_file()
    );
    tracing::info!("   Output: {}", config.output_file());
    tracing::info!("   Workers: {}", ConfigProvider::workers(config));
}

/// 只檢查輸入檔是否存在，不讀取內容
fn perform_dry_run(config: &TomlConfig) -> bool {
    let base = Path::new(config.data_dir());
    let mut all_present = true;

    for file in [config.plans_file(), config.zips_file(), config.slcsp_file()] {
        let path = base.join(file);
        if path.is_file() {
            tracing::info!("   ✅ {}", path.display());
        } else {
            tracing::error!("   ❌ {} not found", path.display());
            all_present = false;
        }
    }

    all_present
}
