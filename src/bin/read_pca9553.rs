extern crate env_logger;
extern crate set_pca9553;

use set_pca9553::cli::parse_hex_byte;
use set_pca9553::device::linux::LinuxBus;
use set_pca9553::device::session::DeviceSession;

use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <i2c dev path> <address>", &args[0]);
        process::exit(-1);
    }

    env_logger::init();

    let address = match parse_hex_byte(&args[2]) {
        Ok(address) => address,
        Err(e) => {
            eprintln!("Invalid address specified: {}", e);
            process::exit(-1);
        }
    };

    let result = LinuxBus::open(&args[1], address).and_then(|bus| {
        let mut session = DeviceSession::new(bus, address);
        session.read_all()
    });

    match result {
        Ok(bank) => {
            println!("Read values:");
            print!("{}", bank);
        }
        Err(e) => {
            eprintln!("Error reading: {}", e);
            process::exit(-1);
        }
    }
}
