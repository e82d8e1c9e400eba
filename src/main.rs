//! Part-of-Speech Grammar Learner

use clap::Parser;
use pos_grammar::{Config, Result, VERSION, cli, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let config = if let Some(config_path) = &args.config {
        Config::from_file(config_path)?
    } else {
        Config::load()?
    };

    init_logging(args.log_level.as_deref().unwrap_or(&config.logging.level));

    tracing::info!("Part-of-Speech Grammar Learner v{}", VERSION);
    tracing::debug!("Parsed arguments: {:?}", args);
    tracing::debug!("Loaded configuration: {:?}", config);

    if !cli::execute(args, config).await? {
        std::process::exit(1);
    }

    Ok(())
}
