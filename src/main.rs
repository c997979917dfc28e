use clap::Parser;
use tracing_subscriber::EnvFilter;

use biom_validate::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("biom_validate=debug,info")
    } else {
        EnvFilter::new("biom_validate=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let passed = match cli.command {
        cli::Commands::Validate(args) => cli::validate::run(args, cli.format, cli.verbose)?,
        cli::Commands::CheckRepset(args) => cli::repset::run(args, cli.format, cli.verbose)?,
    };

    if !passed {
        std::process::exit(1);
    }

    Ok(())
}
