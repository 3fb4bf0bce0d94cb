use clap::Parser;
use rust_parking::parking::config::{CommandLineArgs, Config};
use rust_parking::parking::controller::Session;
use rust_parking::parking::events::{EventsLogger, EventsPublisher};
use rust_parking::parking::logging;
use std::io::{stdin, stdout};
use std::time::Instant;
use tracing::info;

fn main() {
    let _stdout_guard = logging::init_std_out_logging();

    let args = CommandLineArgs::parse();
    info!("Started with args: {:?}", args);

    let config = Config::from(args);
    let _log_guards = logging::init_logging(&config);

    let mut events = EventsPublisher::new();
    events.add_subscriber(Box::new(EventsLogger {}));

    // Session time starts at zero when the register opens.
    let start = Instant::now();
    let clock = Box::new(move || start.elapsed().as_secs() as u32);

    let mut session = Session::from_config(&config, events, clock);
    session
        .run(&mut stdin().lock(), &mut stdout())
        .expect("Failed to run interactive session");

    info!("Exiting application.");
}
