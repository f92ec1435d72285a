extern crate i2cdev;
#[macro_use]
extern crate log;

pub mod cli;
pub mod config;
pub mod configure;
pub mod device;
