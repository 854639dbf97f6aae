/* 3rd party libraries */
use anyhow::{anyhow, Context};
use clap::Parser;
use crossbeam_channel as cbc;
use log::{error, info};
use std::path::PathBuf;
use std::thread::Builder;

/* Custom libraries */
use elevator_dispatch::config;
use elevator_dispatch::unwrap_or_exit;
use elevator_dispatch::{CarEvent, DispatchCoordinator, Floor, Person};

/* Command line */
#[derive(Parser)]
#[clap(name = "elevator_dispatch")]
#[clap(about = "Assigns pickup requests to elevator cars and runs one dispatch round")]
struct Cli {
    /// Path to the building configuration
    #[clap(long, default_value = "config.toml")]
    config: PathBuf,

    /// A ride as NAME:FROM:TO, e.g. Alice:0:5. May be repeated
    #[clap(long = "request", value_parser = parse_ride)]
    requests: Vec<Ride>,

    /// Print the event log as JSON lines
    #[clap(long)]
    json: bool,
}

#[derive(Clone, Debug)]
struct Ride {
    name: String,
    from: Floor,
    to: Floor,
}

fn parse_ride(arg: &str) -> anyhow::Result<Ride> {
    let parts: Vec<&str> = arg.split(':').collect();
    if parts.len() != 3 || parts[0].is_empty() {
        return Err(anyhow!("expected NAME:FROM:TO, got '{}'", arg));
    }
    Ok(Ride {
        name: parts[0].to_string(),
        from: parts[1].parse().context("FROM is not a floor number")?,
        to: parts[2].parse().context("TO is not a floor number")?,
    })
}

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    // Load the configuration
    let config = unwrap_or_exit!(config::load_config(&cli.config));

    // Event log channel, drained by its own thread
    let (event_tx, event_rx) = cbc::unbounded::<CarEvent>();
    let json = cli.json;
    let event_log_thread = unwrap_or_exit!(Builder::new()
        .name("event_log".into())
        .spawn(move || {
            for event in event_rx {
                if json {
                    match serde_json::to_string(&event) {
                        Ok(line) => println!("{}", line),
                        Err(e) => error!("Failed to serialize {:?}: {}", event, e),
                    }
                } else {
                    println!("  {}", event);
                }
            }
        })
        .context("Failed to start event log thread"));

    // Build the fleet
    let coordinator = unwrap_or_exit!(DispatchCoordinator::from_config(&config)
        .context("Failed to set up the elevator fleet"))
    .with_event_sink(event_tx);
    info!(
        "{}: floors 0-{}, {} elevator(s), {} policy",
        coordinator.building_name(),
        coordinator.top_floor(),
        config.fleet.len(),
        coordinator.policy_name()
    );
    println!("{}", coordinator.status_report());

    // Phase 1: assign
    for (index, ride) in cli.requests.iter().enumerate() {
        let person = Person::new(format!("P{}", index + 1), ride.name.clone());
        match coordinator.assign(person, ride.from, ride.to) {
            Ok(request) => println!(
                "  [Floor {} Panel] {} -> Go to {}",
                ride.from,
                ride.name,
                request.assigned_car().unwrap_or("?")
            ),
            Err(e) if e.is_retryable() => println!("  [Floor {} Panel] {}: please wait, {}", ride.from, ride.name, e),
            Err(e) => println!("  [Floor {} Panel] {}: {}", ride.from, ride.name, e),
        }
    }

    // Phase 2: move
    println!();
    coordinator.dispatch_all();

    // Closing the sender ends the event log thread
    let report = coordinator.status_report();
    drop(coordinator);
    if event_log_thread.join().is_err() {
        error!("Event log thread panicked");
    }

    println!();
    println!("{}", report);
}
