use std::thread;
use std::time::Duration;

use chrono::Utc;
use clap::{crate_description, crate_version, Parser};
use eyre::{eyre, Result};
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{error, info, trace, warn};

use tarmon_common::{distance_km, init_logging, Location};
use tarmon_engine::{FlightRegistry, Metrics};
use tarmon_formats::{catalog, classify, describe, SquawkSet};

use crate::cli::{FetchOpts, ListSubCommand, Opts, SubCommand, WatchOpts};
use crate::client::Client;
use crate::config::Receiver;

mod cli;
mod client;
mod config;

/// Binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();

fn main() -> Result<()> {
    let opts = Opts::parse();
    let cfn = opts.config.clone();

    // Without RUST_LOG, -v bumps the default level to info.
    //
    if opts.verbose > 0 && std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    // Initialise logging.
    //
    init_logging(NAME, opts.debug, None)?;

    // Banner
    //
    banner();

    if opts.version {
        print_versions();
        return Ok(());
    }

    // Load the receiver description, compiled-in default otherwise.
    //
    let cfg = Receiver::load(cfn.as_deref())?;

    match &opts.subcmd {
        Some(subcmd) => handle_subcmd(&cfg, subcmd),
        None => Err(eyre!("no command given, see -h")),
    }
}

pub fn handle_subcmd(cfg: &Receiver, subcmd: &SubCommand) -> Result<()> {
    match subcmd {
        // Handle `fetch`
        //
        SubCommand::Fetch(fopts) => {
            trace!("fetch");

            fetch_metrics(cfg, fopts)
        }

        // Handle `watch`
        //
        SubCommand::Watch(wopts) => {
            trace!("watch");

            watch_feed(cfg, wopts)
        }

        // Handle `probe`
        //
        SubCommand::Probe => {
            trace!("probe");

            let client = Client::new(&cfg.url)?;
            client.probe()?;
            info!("{} looks like a compatible feed", cfg.url);
            Ok(())
        }

        // Standalone `list` command
        //
        SubCommand::List(lopts) => match lopts.cmd {
            ListSubCommand::Flights => {
                info!("Listing monitored flights:");

                let str = list_flights(cfg)?;
                eprintln!("{}", str);
                Ok(())
            }
            ListSubCommand::Squawks => {
                info!("Listing known squawk codes:");

                let str = list_squawks(cfg)?;
                eprintln!("{}", str);
                Ok(())
            }
        },

        // Standalone `version` command
        //
        SubCommand::Version => {
            print_versions();
            Ok(())
        }
    }
}

/// One cycle: fetch, rebuild the registry, display the metrics.
///
fn fetch_metrics(cfg: &Receiver, fopts: &FetchOpts) -> Result<()> {
    let client = Client::new(&cfg.url)?;
    let snapshot = client.fetch()?;
    let registry = FlightRegistry::from_snapshot(&snapshot)?;
    let metrics = compute_metrics(cfg, &registry);

    if fopts.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        check_threshold(cfg, &metrics);
        eprintln!("{}", format_metrics(&metrics));
    }
    Ok(())
}

/// Poll the receiver on the configured interval.
///
fn watch_feed(cfg: &Receiver, wopts: &WatchOpts) -> Result<()> {
    let interval = wopts.interval.unwrap_or(cfg.update_interval);
    let client = Client::new(&cfg.url)?;
    let mut registry = FlightRegistry::new();
    let mut cycle = 0usize;

    info!("Watching {} every {}s…", cfg.url, interval);
    loop {
        // A failed cycle is logged and skipped, the registry keeps the
        // previous accepted snapshot.
        //
        let refreshed = client
            .fetch()
            .and_then(|snapshot| Ok(registry.refresh(&snapshot)?));
        match refreshed {
            Ok(()) => {
                let metrics = compute_metrics(cfg, &registry);
                check_threshold(cfg, &metrics);
                eprintln!("--- {}", Utc::now().format("%Y-%m-%d %H:%M:%S"));
                eprintln!("{}", format_metrics(&metrics));
            }
            Err(e) => error!("Skipping cycle: {}", e),
        }

        cycle += 1;
        if wopts.count != 0 && cycle >= wopts.count {
            break;
        }
        thread::sleep(Duration::from_secs(interval));
    }
    Ok(())
}

fn compute_metrics(cfg: &Receiver, registry: &FlightRegistry) -> Metrics {
    let emergency = SquawkSet::new(&cfg.emergency_squawk);
    let special = SquawkSet::new(&cfg.special_squawk);

    Metrics::compute(registry, cfg.home, &emergency, &special)
}

fn check_threshold(cfg: &Receiver, metrics: &Metrics) {
    if let Some(nearest) = &metrics.nearest_flight {
        if nearest.distance_km < cfg.distance_threshold {
            warn!(
                "{} is within {} km of the receiver",
                nearest.callsign, cfg.distance_threshold
            );
        }
    }
}

/// Render the bundle the way the sensor side consumes it, a flat
/// key → value table.
///
fn format_metrics(metrics: &Metrics) -> String {
    let mut builder = Builder::default();
    builder.push_record(vec!["Metric".to_string(), "Value".to_string()]);
    builder.push_record(vec![
        "message_count".to_string(),
        metrics.message_count.to_string(),
    ]);
    builder.push_record(vec![
        "monitored_flights".to_string(),
        metrics.monitored_flights.to_string(),
    ]);
    builder.push_record(vec![
        "emergencies".to_string(),
        metrics.emergencies.to_string(),
    ]);
    builder.push_record(vec!["specials".to_string(), metrics.specials.to_string()]);

    match &metrics.nearest_flight {
        Some(nearest) => {
            builder.push_record(vec!["nearest_flight".to_string(), nearest.callsign.clone()]);
            builder.push_record(vec![
                "nearest_flight_distance".to_string(),
                format!("{} km", nearest.distance_km),
            ]);
            if let Some(alt) = nearest.altitude {
                builder.push_record(vec![
                    "nearest_flight_altitude".to_string(),
                    format!("{} ft", alt),
                ]);
            }
            if let Some(mach) = nearest.mach {
                builder.push_record(vec![
                    "nearest_flight_speed".to_string(),
                    format!("mach {}", mach),
                ]);
            }
        }
        None => {
            builder.push_record(vec!["nearest_flight".to_string(), "unknown".to_string()]);
        }
    }

    builder.build().with(Style::modern()).to_string()
}

/// One row per known code, classified against the configured sets.
///
fn list_squawks(cfg: &Receiver) -> Result<String> {
    let emergency = SquawkSet::new(&cfg.emergency_squawk);
    let special = SquawkSet::new(&cfg.special_squawk);

    let mut builder = Builder::default();
    builder.push_record(vec![
        "Code".to_string(),
        "Class".to_string(),
        "Meaning".to_string(),
    ]);
    for (code, meaning) in catalog() {
        builder.push_record(vec![
            code.to_string(),
            classify(code, &emergency, &special).to_string(),
            meaning.to_string(),
        ]);
    }

    // Configured codes the catalog does not know about still show up.
    //
    for code in emergency.iter().chain(special.iter()) {
        if describe(code).is_none() {
            builder.push_record(vec![
                code.to_string(),
                classify(code, &emergency, &special).to_string(),
                "-".to_string(),
            ]);
        }
    }

    Ok(builder.build().with(Style::modern()).to_string())
}

/// Fetch a snapshot and render the monitored flights.
///
fn list_flights(cfg: &Receiver) -> Result<String> {
    let client = Client::new(&cfg.url)?;
    let registry = FlightRegistry::from_snapshot(&client.fetch()?)?;

    let mut builder = Builder::default();
    builder.push_record(vec![
        "Callsign".to_string(),
        "Squawk".to_string(),
        "Altitude (ft)".to_string(),
        "Mach".to_string(),
        "Distance (km)".to_string(),
    ]);
    for aircraft in registry.iter() {
        let distance = match (aircraft.position, cfg.home) {
            (Some(p), Some(home)) => {
                distance_km(Location::new(p.latitude, p.longitude), home).to_string()
            }
            _ => "-".to_string(),
        };
        builder.push_record(vec![
            aircraft.callsign.clone().unwrap_or_default(),
            aircraft.squawk_code().unwrap_or("-").to_string(),
            aircraft.altitude.map_or("-".to_string(), |a| a.to_string()),
            aircraft.mach.map_or("-".to_string(), |m| m.to_string()),
            distance,
        ]);
    }

    Ok(builder.build().with(Style::modern()).to_string())
}

fn print_versions() {
    eprintln!("Modules:");
    eprintln!("\t{}", tarmon_common::version());
    eprintln!("\t{}", tarmon_formats::version());
    eprintln!("\t{}", tarmon_engine::version());
}

/// Display banner
///
fn banner() {
    eprintln!(
        r##"
{}/{}
{}
"##,
        NAME,
        VERSION,
        crate_description!()
    );
}
