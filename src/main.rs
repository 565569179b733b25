//! Canopy CLI entry point.

mod cli;

use canopy::demo::run_demo;
use canopy::inspect::{apply_window_file, describe_kind, schema_summary};
use canopy::CliResult;
use canopy_tree::ir_schema;
use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> CliResult<()> {
    let schema = ir_schema();
    match command {
        Command::Schema { kind: None } => print!("{}", schema_summary(&schema)),
        Command::Schema { kind: Some(kind) } => print!("{}", describe_kind(&schema, &kind)?),
        Command::Windows { file, kind } => {
            let (adjusted, report) = apply_window_file(&schema, &file)?;
            for line in report {
                println!("{line}");
            }
            if let Some(kind) = kind {
                println!();
                print!("{}", describe_kind(&adjusted, &kind)?);
            }
        }
        Command::Demo => print!("{}", run_demo()?),
    }
    Ok(())
}
