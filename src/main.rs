use clap::Parser;
use dataset_reconciler::core::report;
use dataset_reconciler::utils::logger;
use dataset_reconciler::{CliConfig, CompareOptions, FsLoader, Reconciler, ReconcileError};

fn main() {
    let config = CliConfig::parse();

    if !config.run {
        eprintln!("Nothing to do. Pass --run to compare the beta and test datasets (see --help).");
        std::process::exit(1);
    }

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting dataset-diff");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config) {
        tracing::error!("❌ Comparison failed: {}", e);
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }
}

fn run(config: &CliConfig) -> Result<(), ReconcileError> {
    let settings = config.resolve()?;
    tracing::debug!(
        "Beta root: {}, test root: {}",
        settings.roots.beta.display(),
        settings.roots.test.display()
    );

    let loader = FsLoader::from_config(&settings);
    let reconciler = Reconciler::new(loader, CompareOptions::from_config(&settings));
    let result = reconciler.run()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::render(&result, &mut out)?;

    tracing::info!("✅ Comparison finished: {} datasets differ", result.mismatches.len());
    Ok(())
}
