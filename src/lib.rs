#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "strict", deny(warnings))]
#![allow(dead_code)]

//! # Library for the PEAK-System PCAN-Basic API
//!
//! Crate currently offer the following features:
//! * CAN 2.0, CAN FD and CAN XL frames in their native layouts
//! * Typed channel handles, status codes, parameters and bit-rate strings
//! * Native binding of `PCANBasic.dll`/`libpcanbasic.so` (`native` feature)
//! * In-memory [simulated driver](simulator::SimulatedDriver) for hardware-free use and tests
//! * no_std support (with `alloc`)
//!
//!## CAN FD Tx/Rx example
//!
//!```
//!use pcan_basic::can::PcanBasic;
//!use pcan_basic::channel::Channel;
//!use pcan_basic::config::{BitrateConfig, Configuration, FrameReception};
//!use pcan_basic::message::MessageFd;
//!use pcan_basic::simulator::SimulatedDriver;
//!use embedded_can::{Id, StandardId};
//!
//!let mut driver = SimulatedDriver::default();
//!driver.attach(Channel::USBBUS1, "PCAN-USB FD", 1);
//!
//!let mut pcan = PcanBasic::new(driver);
//!
//! // configure the channel
//!let bit_rate = "f_clock_mhz=80, nom_brp=10, nom_tseg1=12, nom_tseg2=3, nom_sjw=1, \
//!                data_brp=4, data_tseg1=7, data_tseg2=2, data_sjw=1";
//!pcan.configure(&Configuration {
//!        channel: Channel::USBBUS1,
//!        bit_rate: BitrateConfig::Fd(bit_rate.parse().unwrap()),
//!        reception: FrameReception {
//!            echo_frames: Some(true),
//!            ..FrameReception::default()
//!        },
//!        ..Configuration::default()
//!    })
//!    .unwrap();
//!
//!assert_eq!(500_000, pcan.bus_speed_nominal(Channel::USBBUS1).unwrap());
//!assert_eq!(2_000_000, pcan.bus_speed_fd(Channel::USBBUS1).unwrap());
//!
//! // Transmit CAN FD message
//!let can_id = Id::Standard(StandardId::new(0x55).unwrap());
//!let message = MessageFd::new(can_id, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], true).unwrap();
//!pcan.write_fd(Channel::USBBUS1, &message).unwrap();
//!
//! // Receive the echo of the message
//!let (echo, _timestamp) = pcan.read_fd(Channel::USBBUS1).unwrap();
//!assert!(echo.message_type().echo());
//!assert_eq!(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 0, 0], echo.payload());
//!```

extern crate alloc;

pub mod bitrate;
pub mod can;
pub mod channel;
pub mod config;
pub mod status;

pub mod filter;
pub mod lookup;
pub mod message;
pub mod native;
pub mod parameter;

pub mod simulator;

#[cfg(test)]
pub(crate) mod mocks;
#[cfg(test)]
mod tests;
