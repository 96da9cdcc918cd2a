//! # commitfetch
//!
//! **commitfetch** downloads the commit history of a GitHub repository.
//!
//! Features:
//! - `commitfetch fetch` walks every commit page, resolves each commit and
//!   its author, and writes the result to a commit file
//! - `commitfetch show` prints the commits stored in a commit file
//! - `commitfetch home` prints the directory holding `config.toml`
//!
//! This CLI is built with [clap](https://docs.rs/clap).

use anyhow::Result;
use clap::{Parser, Subcommand};
use commitfetch::cli::{FetchArgs, ShowArgs, cmd_fetch, cmd_show};
use commitfetch::commitfetch_home;
use tracing::Level;

/// Command-line interface definition.
#[derive(Parser, Debug)]
#[command(
    name = "commitfetch",
    version,
    about = "commitfetch - fetch the commit history of a GitHub repository",
    arg_required_else_help = true
)]
struct Cli {
    /// Log more (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Fetch all commits of a repository into a commit file
    Fetch(FetchArgs),
    /// Print the commits stored in a commit file
    Show(ShowArgs),
    /// Print the commitfetch home directory
    Home,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Cmd::Fetch(args) => cmd_fetch(args),
        Cmd::Show(args) => cmd_show(args),
        Cmd::Home => {
            println!("{}", commitfetch_home()?.display());
            Ok(())
        }
    }
}
