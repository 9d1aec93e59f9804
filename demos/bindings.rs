//! Prints the stored binding profiles and, optionally, what a device resolves to.
//!
//! ```text
//! cargo run --example bindings -- [--store PATH] [DEVICE_ID]
//! ```

use clap::Parser;
use padbind::codes::canonical;
use padbind::{BindingRegistry, PhysicalCode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Store to read instead of ~/.config/gamepad_bindings.json
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Device id to resolve and print remaps for
    device: Option<String>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let Args { store, device } = Args::parse();

    let mut registry = BindingRegistry::new();
    let report = match &store {
        Some(path) => registry.load(path),
        None => registry.load_default(),
    };
    println!("{} profile(s), {} skipped", report.loaded, report.skipped);

    for (i, profile) in registry.iter().enumerate() {
        let name = if profile.name().is_empty() {
            "<unnamed>"
        } else {
            profile.name()
        };
        println!("#{i} {name}: {} binds, devices {:?}", profile.len(), profile.devices());
    }
    for (id, owners) in registry.conflicts() {
        println!("device {id} is claimed by profiles {owners:?}; #{} wins", owners[0]);
    }

    let Some(device) = device else { return };
    match registry.resolve(&device) {
        Some(profile) => {
            println!("{device} -> {}", profile.name());
            for c in canonical() {
                let code = profile.translate(c.default_physical);
                if code != c.virtual_code {
                    println!("  {:>12} ({}) -> {}", c.label, c.default_physical, code);
                }
            }
            let mut extra: Vec<PhysicalCode> = profile
                .entries()
                .map(|(physical, _)| physical)
                .filter(|p| !canonical().iter().any(|c| c.default_physical == *p))
                .collect();
            extra.sort();
            for physical in extra {
                println!("  {:>12} -> {}", physical.0, profile.translate(physical));
            }
        }
        None => println!("{device}: no profile, defaults apply"),
    }
}
