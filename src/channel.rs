//! # Channel handles
//! A PCAN channel is addressed by a 16-bit handle. Channels 1 to 8 of a device family use
//! one byte (`0x41` = PCI channel 1), channels 9 to 16 use two bytes (`0x409` = PCI channel 9).
//! LAN channels always use two bytes (`0x801` = LAN channel 1).
//!
//! ```
//!# use pcan_basic::channel::{Channel, Device};
//! let channel = Channel::new(Device::Usb, 10).unwrap();
//!
//! assert_eq!(Channel::USBBUS10, channel);
//! assert_eq!(0x50A, channel.handle());
//! assert_eq!(Some(Device::Usb), channel.device());
//! assert_eq!(10, channel.index());
//! ```

use core::fmt;
use serde::{Deserialize, Serialize};

/// Highest channel index per device family
pub const MAX_CHANNEL_INDEX: u8 = 16;

/// PCAN hardware channel handle
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Channel(u16);

impl Channel {
    /// Undefined/default value for a PCAN bus
    pub const NONEBUS: Self = Self(0x00);

    pub const PCIBUS1: Self = Self(0x41);
    pub const PCIBUS2: Self = Self(0x42);
    pub const PCIBUS3: Self = Self(0x43);
    pub const PCIBUS4: Self = Self(0x44);
    pub const PCIBUS5: Self = Self(0x45);
    pub const PCIBUS6: Self = Self(0x46);
    pub const PCIBUS7: Self = Self(0x47);
    pub const PCIBUS8: Self = Self(0x48);
    pub const PCIBUS9: Self = Self(0x409);
    pub const PCIBUS10: Self = Self(0x40A);
    pub const PCIBUS11: Self = Self(0x40B);
    pub const PCIBUS12: Self = Self(0x40C);
    pub const PCIBUS13: Self = Self(0x40D);
    pub const PCIBUS14: Self = Self(0x40E);
    pub const PCIBUS15: Self = Self(0x40F);
    pub const PCIBUS16: Self = Self(0x410);

    pub const USBBUS1: Self = Self(0x51);
    pub const USBBUS2: Self = Self(0x52);
    pub const USBBUS3: Self = Self(0x53);
    pub const USBBUS4: Self = Self(0x54);
    pub const USBBUS5: Self = Self(0x55);
    pub const USBBUS6: Self = Self(0x56);
    pub const USBBUS7: Self = Self(0x57);
    pub const USBBUS8: Self = Self(0x58);
    pub const USBBUS9: Self = Self(0x509);
    pub const USBBUS10: Self = Self(0x50A);
    pub const USBBUS11: Self = Self(0x50B);
    pub const USBBUS12: Self = Self(0x50C);
    pub const USBBUS13: Self = Self(0x50D);
    pub const USBBUS14: Self = Self(0x50E);
    pub const USBBUS15: Self = Self(0x50F);
    pub const USBBUS16: Self = Self(0x510);

    pub const LANBUS1: Self = Self(0x801);
    pub const LANBUS2: Self = Self(0x802);
    pub const LANBUS3: Self = Self(0x803);
    pub const LANBUS4: Self = Self(0x804);
    pub const LANBUS5: Self = Self(0x805);
    pub const LANBUS6: Self = Self(0x806);
    pub const LANBUS7: Self = Self(0x807);
    pub const LANBUS8: Self = Self(0x808);
    pub const LANBUS9: Self = Self(0x809);
    pub const LANBUS10: Self = Self(0x80A);
    pub const LANBUS11: Self = Self(0x80B);
    pub const LANBUS12: Self = Self(0x80C);
    pub const LANBUS13: Self = Self(0x80D);
    pub const LANBUS14: Self = Self(0x80E);
    pub const LANBUS15: Self = Self(0x80F);
    pub const LANBUS16: Self = Self(0x810);

    /// Builds the handle of channel `index` (1-16) of the given device family
    pub fn new(device: Device, index: u8) -> Option<Self> {
        if device == Device::None || index == 0 || index > MAX_CHANNEL_INDEX {
            return None;
        }

        let family = device as u16;
        // LAN handles always use the two-byte form
        let handle = if index <= 8 && device != Device::Lan {
            (family << 4) | index as u16
        } else {
            (family << 8) | index as u16
        };

        Some(Self(handle))
    }

    /// Wraps a raw handle without checking it against the known families
    pub const fn from_handle(handle: u16) -> Self {
        Self(handle)
    }

    pub const fn handle(self) -> u16 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == Self::NONEBUS.0
    }

    /// Device family encoded in the handle
    pub fn device(self) -> Option<Device> {
        let family = if self.0 > 0xFF { self.0 >> 8 } else { self.0 >> 4 };

        match Device::from_raw(family as u8) {
            Some(Device::None) | None => None,
            device => device,
        }
    }

    /// 1-based channel index within the device family, 0 for [Channel::NONEBUS]
    pub fn index(self) -> u8 {
        if self.0 > 0xFF {
            (self.0 & 0xFF) as u8
        } else {
            (self.0 & 0x0F) as u8
        }
    }

    /// All 16 handles of a device family in ascending index order
    pub fn all(device: Device) -> impl Iterator<Item = Channel> {
        (1..=MAX_CHANNEL_INDEX).filter_map(move |index| Self::new(device, index))
    }
}

impl From<u16> for Channel {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<Channel> for u16 {
    fn from(value: Channel) -> Self {
        value.0
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Channel({self})")
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.device() {
            Some(device) => write!(f, "{}BUS{}", device.bus_prefix(), self.index()),
            None if self.is_none() => f.write_str("NONEBUS"),
            None => write!(f, "{:#X}", self.0),
        }
    }
}

/// PCAN device family
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Device {
    /// Undefined, unknown or not selected PCAN device value
    #[default]
    None = 0x00,
    /// PCAN-PCI, PCAN-cPCI, PCAN-miniPCI, and PCAN-PCI Express
    Pci = 0x04,
    /// PCAN-USB and PCAN-USB Pro
    Usb = 0x05,
    /// PCAN Gateway devices
    Lan = 0x08,
}

impl Device {
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::None),
            0x04 => Some(Self::Pci),
            0x05 => Some(Self::Usb),
            0x08 => Some(Self::Lan),
            _ => None,
        }
    }

    /// Name used in lookup strings, e.g. `pcan_usb`
    pub fn lookup_name(self) -> &'static str {
        match self {
            Self::None => "pcan_none",
            Self::Pci => "pcan_pci",
            Self::Usb => "pcan_usb",
            Self::Lan => "pcan_lan",
        }
    }

    /// Parses a lookup name, case insensitive
    pub fn from_lookup_name(name: &str) -> Option<Self> {
        [Self::None, Self::Pci, Self::Usb, Self::Lan]
            .into_iter()
            .find(|device| device.lookup_name().eq_ignore_ascii_case(name))
    }

    fn bus_prefix(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Pci => "PCI",
            Self::Usb => "USB",
            Self::Lan => "LAN",
        }
    }
}
