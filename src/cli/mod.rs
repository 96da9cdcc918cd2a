//! Subcommands of the `commitfetch` binary.
//!
//! Each `cmd_*` function owns one subcommand end to end; argument structs
//! derive [`clap::Args`] so `main.rs` only has to wire them together.

mod fetch;
mod show;

pub use fetch::{FetchArgs, cmd_fetch};
pub use show::{ShowArgs, cmd_show};
