use anyhow::Context;
use clap::Parser;
use dataset_reconciler::core::transpose::transpose_file;
use dataset_reconciler::utils::logger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "transpose")]
#[command(about = "Write the transpose of a .csv or .tsv matrix next to the input file")]
struct Args {
    /// Delimited input file (.csv, .tsv or .tab)
    input: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let output = transpose_file(&args.input)
        .with_context(|| format!("Failed to transpose '{}'", args.input.display()))?;

    tracing::info!("✅ Transpose completed");
    println!("{}", output.display());
    Ok(())
}
