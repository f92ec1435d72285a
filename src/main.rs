extern crate env_logger;
#[macro_use]
extern crate log;
extern crate set_pca9553;

use clap::Parser;

use std::io;
use std::process;

use set_pca9553::cli::Args;
use set_pca9553::configure::configure;
use set_pca9553::device::linux::open_bus;
use set_pca9553::device::session::DeviceSession;
use set_pca9553::device::DeviceError;

fn main() {
    env_logger::init();

    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), DeviceError> {
    // Validate everything before touching the bus
    let config = args.resolve_config()?;
    let changes = args.to_changes()?;

    let bus = open_bus(config.bus, config.address)?;
    info!(
        "Opened i2c bus {} for 0x{:02x}",
        config.bus, config.address
    );

    let mut session = DeviceSession::new(bus, config.address).with_retries(config.retries);

    let stdout = io::stdout();
    configure(&mut session, &changes, &mut stdout.lock())?;

    Ok(())
}
