//! Bubbles CLI - Headless host for the bubble animation engine

mod commands;
mod surface;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, render, simulate, SessionArgs};
use tracing::Level;

#[derive(Parser)]
#[command(name = "bubbles")]
#[command(about = "Simulate and render \"like\" bubble animations", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a session on a virtual clock and print every tick
    Simulate {
        #[command(flatten)]
        session: SessionArgs,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,
    },

    /// Run a session and write PNG frames
    Render {
        #[command(flatten)]
        session: SessionArgs,

        /// Bubble sprite (PNG); a generated sprite is used when omitted
        #[arg(long)]
        sprite: Option<String>,

        /// Write every Nth redraw
        #[arg(long, default_value = "1")]
        every: u32,

        /// Output directory for frames
        #[arg(short, long, default_value = "frames")]
        output: String,
    },

    /// Print the default configuration as TOML
    Config,
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Simulate { session, format } => simulate::run(&session, &format),
        Commands::Render {
            session,
            sprite,
            every,
            output,
        } => render::run(render::RenderArgs {
            session,
            sprite,
            every,
            output,
        }),
        Commands::Config => config::run(),
    }
}
