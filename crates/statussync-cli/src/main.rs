//! StatusSync CLI - Keep a job-application sheet in step with your inbox.

use clap::Parser;
use statussync_cli::commands;
use statussync_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> statussync_cli::Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::path()?,
    };
    let config = Config::load_from(&config_path)?;

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Config(args) => {
            commands::execute_config(args, &config, &config_path, &formatter).await?;
        }
        cmd => {
            config.validate()?;
            match cmd {
                Command::Run(args) => commands::execute_run(args, &config, &formatter).await?,
                Command::Classify(args) => commands::execute_classify(args, &config, &formatter).await?,
                Command::Extract(args) => commands::execute_extract(args, &config, &formatter).await?,
                Command::List(args) => commands::execute_list(args, &config, &formatter).await?,
                Command::Config(_) => unreachable!(),
            }
        }
    }

    Ok(())
}
