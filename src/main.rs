use clap::Parser;

use ordergate::adapter::inbound::cli::command::{Cli, Commands};
use ordergate::adapter::inbound::cli::output::{self, OutputConfig};
use ordergate::adapter::inbound::cli::{health, operator, run, status, submit};
use ordergate::infrastructure::operator::entry::Operator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig {
        json: cli.json,
        quiet: cli.quiet,
    });

    if operator::install(Box::new(Operator)).is_err() {
        anyhow::bail!("CLI operator already installed");
    }

    let result = match &cli.command {
        Commands::Run(args) => run::execute(&cli.config, args).await,
        Commands::Submit(args) => submit::execute(&cli.config, args).await,
        Commands::Status(args) => status::execute(&cli.config, args).await,
        Commands::Health => health::execute(&cli.config).await,
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
    Ok(())
}
