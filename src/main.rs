use clap::Parser;
use stage_release::app::{handle_fatal_error, init_logging, report_outcome, run_release, AppConfig};
use std::path::PathBuf;

/// Commit, merge to a deployment stage, and tag production releases
#[derive(Parser)]
#[command(name = "stage-release", version)]
#[command(about = "Interactive release workflow for deployment stages", long_about = None)]
struct Cli {
    /// Path to the release configuration file
    #[arg(short = 'c', long, default_value = stage_release::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Enable verbose output (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::new(cli.verbose) {
        Ok(config) => config.with_config_path(cli.config),
        Err(e) => std::process::exit(handle_fatal_error(e, cli.verbose)),
    };
    init_logging(&config);

    let outcome = run_release(&config).await;
    let code = report_outcome(&outcome, config.verbose);

    // Exit here so a prompt still blocked on stdin cannot hold the runtime open
    std::process::exit(code);
}
