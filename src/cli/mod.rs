pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "fieldops")]
#[command(about = "FieldOps CLI - operator tools for the field reporting API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text, help = "Output format")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint a bearer token for a field device or test user")]
    Token(commands::token::TokenArgs),

    #[command(about = "Show registered report kinds and their field mappings")]
    Describe(commands::describe::DescribeArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Token(args) => commands::token::handle(args, cli.format),
        Commands::Describe(args) => commands::describe::handle(args, cli.format),
    }
}
