//! Module describing all possible commands and sub-commands to the `tarmonctl` main driver
//!
//! We have four main commands:
//!
//! - `fetch`
//! - `watch`
//! - `probe`
//! - `list`
//!
//! `fetch` grabs one snapshot from the receiver, refreshes the registry and displays
//! the derived metrics, either as a table or as raw JSON.
//!
//! `watch` does the same on every polling interval until stopped (or for `-n` cycles).
//! A failed cycle is logged and skipped, the registry keeps the previous snapshot.
//!
//! `probe` only checks that the configured endpoint answers with a compatible feed.
//!
//! `list` displays either the known squawk codes or the currently monitored flights.
//!

use std::path::PathBuf;

use clap::{crate_description, crate_name, crate_version, Parser, ValueEnum};

/// CLI options
#[derive(Parser)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!())]
pub struct Opts {
    /// configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// debug mode (hierarchical trace output).
    #[clap(short = 'D', long = "debug")]
    pub debug: bool,
    /// Verbose mode.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Display utility full version.
    #[clap(short = 'V', long)]
    pub version: bool,
    /// Sub-commands (see below).
    #[clap(subcommand)]
    pub subcmd: Option<SubCommand>,
}

// ------

/// All sub-commands:
///
/// `fetch [-j]`
/// `watch [-n COUNT] [-i SECS]`
/// `probe`
/// `list (flights|squawks)`
///
#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Fetch one snapshot and display the derived metrics
    Fetch(FetchOpts),
    /// Poll the receiver and display metrics on every cycle
    Watch(WatchOpts),
    /// Check that the endpoint serves a compatible feed
    Probe,
    /// List known squawk codes or currently monitored flights
    List(ListOpts),
    /// Display versions of the modules
    Version,
}

// ------

/// Options for the one-shot fetch.
///
#[derive(Debug, Parser)]
pub struct FetchOpts {
    /// Raw JSON output instead of a table.
    #[clap(short = 'j', long)]
    pub json: bool,
}

// ------

/// Options for the polling loop.
///
#[derive(Debug, Parser)]
pub struct WatchOpts {
    /// Stop after that many cycles (0 means forever).
    #[clap(short = 'n', long, default_value = "0")]
    pub count: usize,
    /// Override the configured interval (in seconds).
    #[clap(short = 'i', long)]
    pub interval: Option<u64>,
}

// ------

/// All `list` sub-commands:
///
/// `list flights`
/// `list squawks`
///
#[derive(Debug, Parser)]
pub struct ListOpts {
    #[clap(value_parser)]
    pub cmd: ListSubCommand,
}

/// These are the sub-commands for `list`
///
#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, ValueEnum)]
pub enum ListSubCommand {
    /// Currently monitored flights
    Flights,
    /// Known squawk codes
    Squawks,
}
