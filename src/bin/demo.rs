//! Walks a ChainMap through insert, lookup, remove and a caller-driven
//! resize. Extra `key=value` arguments are inserted after the sample.
//!
//! Configured through `CHAIN_MAP_*` environment variables; log output is
//! controlled with `RUST_LOG`.

use chain_hashmap::{ChainMap, MapConfig};
use log::{error, info, warn};
use std::process::ExitCode;

const SAMPLE: [(&str, &str); 3] = [("name", "Surya"), ("age", "24"), ("city", "Bangalore")];

fn show(map: &ChainMap, label: &str, key: &str) {
    match map.get(key) {
        Some(v) => println!("{label}: {v}"),
        None => println!("{label}: <not found>"),
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = MapConfig::from_env()?;
    info!("starting with {config:?}");
    let mut map = ChainMap::with_config(config)?;

    for (k, v) in SAMPLE {
        map.insert(k, v)?;
    }
    for arg in std::env::args().skip(1) {
        match arg.split_once('=') {
            Some((k, v)) => map.insert(k, v)?,
            None => warn!("ignoring argument {arg:?}: expected key=value"),
        }
    }

    show(&map, "Name", "name");
    show(&map, "Age", "age");
    show(&map, "City", "city");

    map.remove("age");

    show(&map, "Name", "name");
    show(&map, "Age", "age");

    if map.needs_resize() {
        info!(
            "load factor {:.2} reached threshold {}",
            map.load_factor(),
            map.config().resize_threshold
        );
        map.resize();
    }
    info!(
        "{} entries in {} buckets, longest chain {}",
        map.len(),
        map.capacity(),
        map.longest_chain()
    );

    map.destroy();
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
