/* 3rd party libraries */
use clap::{value_parser, Arg, ArgMatches, Command};
use env_logger::Env;
use log::{error, info};
use std::sync::Arc;
use std::thread::{sleep, Builder};
use std::time::Duration;

/* Custom libraries */
use elevator_dispatch::config::{self, Config};
use elevator_dispatch::unwrap_or_exit;
use elevator_dispatch::{Building, Dispatcher, RequestGenerator};

const STATUS_PERIOD: Duration = Duration::from_secs(1);

fn cli() -> Command<'static> {
    Command::new("elevator-dispatch")
        .about("Simulates a fleet of elevators serving random hall calls")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the TOML configuration file"),
        )
        .arg(
            Arg::new("floors")
                .long("floors")
                .takes_value(true)
                .value_parser(value_parser!(u8))
                .help("Override the number of floors"),
        )
        .arg(
            Arg::new("elevators")
                .long("elevators")
                .takes_value(true)
                .value_parser(value_parser!(u8))
                .help("Override the number of elevators"),
        )
        .arg(
            Arg::new("requests")
                .long("requests")
                .takes_value(true)
                .value_parser(value_parser!(u64))
                .help("Stop after this many requests and exit once the fleet is idle"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .takes_value(true)
                .value_parser(value_parser!(u64))
                .help("Seed for the request generator"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .takes_value(true)
                .default_value("info")
                .help("Default log filter, RUST_LOG takes precedence"),
        )
}

fn apply_overrides(config: &mut Config, matches: &ArgMatches) {
    if let Some(n_floors) = matches.get_one::<u8>("floors") {
        config.building.n_floors = *n_floors;
    }
    if let Some(n_elevators) = matches.get_one::<u8>("elevators") {
        config.building.n_elevators = *n_elevators;
    }
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config.generator.seed = Some(*seed);
    }
}

/* Main */
fn main() {
    let matches = cli().get_matches();

    // Initialize logging
    let log_level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("info");
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Load the configuration
    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config.toml");
    let mut config = unwrap_or_exit!(config::load_config(config_path), "load config");
    apply_overrides(&mut config, &matches);
    unwrap_or_exit!(config.validate(), "validate config");
    let limit = matches.get_one::<u64>("requests").copied();

    // Start the dispatcher and one movement loop per elevator
    let building = unwrap_or_exit!(
        Building::new(config.building.n_floors, config.building.n_elevators),
        "build the building"
    );
    let mut dispatcher = Dispatcher::new(building, &config.elevator, None);
    unwrap_or_exit!(dispatcher.start(), "start elevators");
    let dispatcher = Arc::new(dispatcher);

    // Start the request generator
    let generator = RequestGenerator::new(
        config.building.n_floors,
        config.generator.request_interval(),
        config.generator.seed,
    );
    let generator_dispatcher = dispatcher.clone();
    let generator_thread = Builder::new().name("request_generator".into());
    let generator_handle = unwrap_or_exit!(
        generator_thread.spawn(move || generator.run(&generator_dispatcher, limit)),
        "spawn the request generator"
    );

    loop {
        sleep(STATUS_PERIOD);

        match dispatcher.snapshot() {
            Ok(snapshot) => match serde_json::to_string(&snapshot) {
                Ok(json) => info!("Fleet: {}", json),
                Err(e) => error!("Failed to serialize fleet snapshot: {}", e),
            },
            Err(e) => error!("Failed to read fleet snapshot: {}", e),
        }

        if generator_handle.is_finished() && dispatcher.is_quiescent().unwrap_or(false) {
            break;
        }
    }

    info!("All requests served, shutting down");
}
