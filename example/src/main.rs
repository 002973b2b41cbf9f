//! Prints the frames received on a PCAN channel.
//!
//! ```text
//! pcan-basic-example-monitor [config.json] [--simulated]
//! ```
//!
//! The optional JSON file holds a `pcan_basic::config::Configuration`. Without it USB channel 1
//! is opened with 500 kBit/s. `--simulated` runs against the in-memory driver and feeds it a few frames.

pub mod monitor;

use crate::monitor::Monitor;
use embedded_can::{Id, StandardId};
use embedded_time::duration::Microseconds;
use log::{error, info};
use pcan_basic::can::PcanBasic;
use pcan_basic::channel::Channel;
use pcan_basic::config::Configuration;
use pcan_basic::message::{Frame, Message};
use pcan_basic::native::PcanBasicLibrary;
use pcan_basic::simulator::SimulatedDriver;
use pcan_basic::status::Status;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let mut simulated = false;
    let mut path = None;
    for argument in std::env::args().skip(1) {
        match argument.as_str() {
            "--simulated" => simulated = true,
            _ => path = Some(argument),
        }
    }

    let config = match path {
        Some(path) => match load(&path) {
            Ok(config) => config,
            Err(message) => {
                error!("{message}");
                return ExitCode::FAILURE;
            }
        },
        None => Configuration {
            channel: Channel::USBBUS1,
            ..Configuration::default()
        },
    };

    let result = if simulated {
        let mut driver = SimulatedDriver::default();
        driver.attach(config.channel, "PCAN-USB FD", 1);

        let mut monitor = Monitor::new(PcanBasic::new(driver), config);
        monitor.start().and_then(|_| {
            let channel = monitor.channel();
            for id in 0x100..0x105u16 {
                let standard = StandardId::new(id).ok_or(Status::ILLDATA)?;
                let message = Message::new(Id::Standard(standard), &id.to_be_bytes()).map_err(|_| Status::ILLDATA)?;

                let driver = monitor.driver_mut();
                driver.advance_clock(Microseconds(250u64));
                driver.deliver(channel, Frame::Classic(message));
            }

            monitor.drain()
        })
    } else {
        let mut monitor = Monitor::new(PcanBasic::new(PcanBasicLibrary), config);
        monitor.start().and_then(|_| monitor.run())
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(status) => {
            error!("Monitor stopped: {status}");
            ExitCode::FAILURE
        }
    }
}

fn load(path: &str) -> Result<Configuration, String> {
    let text = std::fs::read_to_string(path).map_err(|error| format!("Reading {path} failed: {error}"))?;
    let config = serde_json::from_str(&text).map_err(|error| format!("Invalid configuration {path}: {error}"))?;

    info!("Configuration loaded from {path}");
    Ok(config)
}
