use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::Context;

fn main() -> ExitCode {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("userbridge=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let ctx = Context::open(cli)?;
    match &cli.command {
        Commands::Create(args) => commands::write::create(&ctx, &cli.state, args),
        Commands::Update(args) => commands::write::update(&ctx, &cli.state, args),
        Commands::Get(args) => commands::get::run(&ctx, args).map(|()| ExitCode::SUCCESS),
        Commands::Show(args) => commands::show::run(&ctx, args).map(|()| ExitCode::SUCCESS),
    }
}
