//!# Channel lookup
//! `CAN_LookUpChannel` finds a channel by a comma separated list of `key=value` pairs.
//!
//! ```
//!# use pcan_basic::lookup::LookupQuery;
//!# use pcan_basic::channel::Device;
//! let query = LookupQuery::new().device_type(Device::Usb).device_id(7);
//! assert_eq!("devicetype=pcan_usb,deviceid=7", query.to_string());
//!
//! let parsed: LookupQuery = "devicetype = PCAN_USB, deviceid = 7".parse().unwrap();
//! assert_eq!(query, parsed);
//! ```

use crate::channel::Device;
use crate::parameter::ChannelInformation;
use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;
use log::debug;

/// Lookup channel by device type, e.g. `pcan_usb`
pub const DEVICE_TYPE: &str = "devicetype";
/// Lookup channel by device id
pub const DEVICE_ID: &str = "deviceid";
/// Lookup channel by 0-based CAN controller index
pub const CONTROLLER_NUMBER: &str = "controllernumber";
/// Lookup channel by IP address (LAN channels only)
pub const IP_ADDRESS: &str = "ipaddress";
/// Lookup channel by device unique identifier (USB channels only)
pub const DEVICE_GUID: &str = "deviceguid";

/// Possible errors when parsing a lookup string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Entry is not of the form `key=value`
    Malformed(String),
    UnknownKey(String),
    DuplicateKey(String),
    InvalidValue(String),
    /// No criteria given
    Empty,
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(entry) => write!(f, "malformed lookup entry '{entry}'"),
            Self::UnknownKey(key) => write!(f, "unknown lookup key '{key}'"),
            Self::DuplicateKey(key) => write!(f, "lookup key '{key}' given twice"),
            Self::InvalidValue(key) => write!(f, "invalid value for lookup key '{key}'"),
            Self::Empty => f.write_str("lookup without criteria"),
        }
    }
}

impl core::error::Error for LookupError {}

/// Criteria of a channel lookup, all given criteria must match
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupQuery {
    pub device_type: Option<Device>,
    pub device_id: Option<u32>,
    pub controller_number: Option<u32>,
    pub ip_address: Option<String>,
    pub device_guid: Option<String>,
}

impl LookupQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device_type(mut self, device: Device) -> Self {
        self.device_type = Some(device);
        self
    }

    pub fn device_id(mut self, id: u32) -> Self {
        self.device_id = Some(id);
        self
    }

    pub fn controller_number(mut self, number: u32) -> Self {
        self.controller_number = Some(number);
        self
    }

    pub fn ip_address(mut self, address: &str) -> Self {
        self.ip_address = Some(address.to_string());
        self
    }

    pub fn device_guid(mut self, guid: &str) -> Self {
        self.device_guid = Some(guid.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Compares the criteria stored in a channel descriptor. IP address and GUID are not part of it.
    pub fn matches(&self, info: &ChannelInformation) -> bool {
        self.device_type.map_or(true, |device| info.device() == Some(device))
            && self.device_id.map_or(true, |id| info.device_id == id)
            && self.controller_number.map_or(true, |number| info.controller_number as u32 == number)
    }
}

/// Decimal or `0x` prefixed hexadecimal
fn parse_number(key: &str, value: &str) -> Result<u32, LookupError> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };

    parsed.map_err(|_| LookupError::InvalidValue(key.to_string()))
}

fn set_once<T>(slot: &mut Option<T>, key: &str, value: T) -> Result<(), LookupError> {
    if slot.is_some() {
        return Err(LookupError::DuplicateKey(key.to_string()));
    }

    *slot = Some(value);
    Ok(())
}

impl FromStr for LookupQuery {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut query = Self::default();

        for entry in s.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let (key, value) = entry
                .split_once('=')
                .map(|(key, value)| (key.trim(), value.trim()))
                .ok_or_else(|| LookupError::Malformed(entry.to_string()))?;

            if value.is_empty() {
                return Err(LookupError::InvalidValue(key.to_string()));
            }

            match key.to_ascii_lowercase().as_str() {
                DEVICE_TYPE => {
                    let device = Device::from_lookup_name(value)
                        .filter(|device| *device != Device::None)
                        .ok_or_else(|| LookupError::InvalidValue(key.to_string()))?;
                    set_once(&mut query.device_type, key, device)?;
                }
                DEVICE_ID => set_once(&mut query.device_id, key, parse_number(key, value)?)?,
                CONTROLLER_NUMBER => set_once(&mut query.controller_number, key, parse_number(key, value)?)?,
                IP_ADDRESS => set_once(&mut query.ip_address, key, value.to_string())?,
                DEVICE_GUID => set_once(&mut query.device_guid, key, value.to_string())?,
                _ => return Err(LookupError::UnknownKey(key.to_string())),
            }
        }

        if query.is_empty() {
            debug!("Rejected lookup string without criteria: '{s}'");
            return Err(LookupError::Empty);
        }

        Ok(query)
    }
}

impl fmt::Display for LookupQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut separator = "";
        let mut entry = |f: &mut fmt::Formatter<'_>, key: &str, value: &dyn fmt::Display| {
            let result = write!(f, "{separator}{key}={value}");
            separator = ",";
            result
        };

        if let Some(device) = self.device_type {
            entry(f, DEVICE_TYPE, &device.lookup_name())?;
        }
        if let Some(id) = self.device_id {
            entry(f, DEVICE_ID, &id)?;
        }
        if let Some(number) = self.controller_number {
            entry(f, CONTROLLER_NUMBER, &number)?;
        }
        if let Some(address) = &self.ip_address {
            entry(f, IP_ADDRESS, address)?;
        }
        if let Some(guid) = &self.device_guid {
            entry(f, DEVICE_GUID, guid)?;
        }

        Ok(())
    }
}
