//! # Status codes
//! Every PCAN-Basic function returns a 32-bit status. Several conditions may be set at once,
//! e.g. a bus warning together with a receive queue overrun, so a [Status] is tested with masks
//! rather than compared for equality.
//!
//! ```
//!# use pcan_basic::status::{HandleError, Status};
//! let status = Status::from_bits(0x0000_0048);
//!
//! assert!(status.is_bus_error());
//! assert!(status.contains(Status::QOVERRUN));
//! assert!(!status.is_ok());
//!
//! assert_eq!(Some(HandleError::Client), Status::ILLCLIENT.handle_error());
//! ```

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign};

/// Mask of the handle error field (bits 10 to 12)
const HANDLE_FIELD: u32 = 0x01C00;

/// Bit distinguishing handle errors from HWINUSE/NETINUSE inside the handle field
const HANDLE_ERROR_BIT: u32 = 0x01000;

/// PCAN status/error code
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Status(u32);

impl Status {
    /// No error
    pub const OK: Self = Self(0x00000);
    /// Transmit buffer in CAN controller is full
    pub const XMTFULL: Self = Self(0x00001);
    /// CAN controller was read too late
    pub const OVERRUN: Self = Self(0x00002);
    /// Bus error: an error counter reached the 'light' limit
    pub const BUSLIGHT: Self = Self(0x00004);
    /// Bus error: an error counter reached the 'heavy' limit
    pub const BUSHEAVY: Self = Self(0x00008);
    /// Bus error: an error counter reached the 'warning' limit
    pub const BUSWARNING: Self = Self::BUSHEAVY;
    /// Bus error: the CAN controller is error passive
    pub const BUSPASSIVE: Self = Self(0x40000);
    /// Bus error: the CAN controller is in bus-off state
    pub const BUSOFF: Self = Self(0x00010);
    /// Mask for all bus errors
    pub const ANYBUSERR: Self =
        Self(Self::BUSWARNING.0 | Self::BUSLIGHT.0 | Self::BUSHEAVY.0 | Self::BUSOFF.0 | Self::BUSPASSIVE.0);
    /// Receive queue is empty
    pub const QRCVEMPTY: Self = Self(0x00020);
    /// Receive queue was read too late
    pub const QOVERRUN: Self = Self(0x00040);
    /// Transmit queue is full
    pub const QXMTFULL: Self = Self(0x00080);
    /// Test of the CAN controller hardware registers failed (no hardware found)
    pub const REGTEST: Self = Self(0x00100);
    /// Driver not loaded
    pub const NODRIVER: Self = Self(0x00200);
    /// Hardware already in use by a Net
    pub const HWINUSE: Self = Self(0x00400);
    /// A Client is already connected to the Net
    pub const NETINUSE: Self = Self(0x00800);
    /// Hardware handle is invalid
    pub const ILLHW: Self = Self(0x01400);
    /// Net handle is invalid
    pub const ILLNET: Self = Self(0x01800);
    /// Client handle is invalid
    pub const ILLCLIENT: Self = Self(0x01C00);
    /// Mask for all handle errors
    pub const ILLHANDLE: Self = Self(Self::ILLHW.0 | Self::ILLNET.0 | Self::ILLCLIENT.0);
    /// Resource (FIFO, Client, timeout) cannot be created
    pub const RESOURCE: Self = Self(0x02000);
    /// Invalid parameter
    pub const ILLPARAMTYPE: Self = Self(0x04000);
    /// Invalid parameter value
    pub const ILLPARAMVAL: Self = Self(0x08000);
    /// Unknown error
    pub const UNKNOWN: Self = Self(0x10000);
    /// Invalid data, function, or action
    pub const ILLDATA: Self = Self(0x20000);
    /// Driver object state is wrong for the attempted operation
    pub const ILLMODE: Self = Self(0x80000);
    /// An operation was successfully carried out, however, irregularities were registered
    pub const CAUTION: Self = Self(0x2000000);
    /// Channel is not initialized. Value was changed from 0x40000 to 0x4000000
    pub const INITIALIZE: Self = Self(0x4000000);
    /// Invalid operation. Value was changed from 0x80000 to 0x8000000
    pub const ILLOPERATION: Self = Self(0x8000000);

    /// Wraps a raw status as returned by the native library
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw status value
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if at least one bit of `other` is set
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// True if any bus error (light, heavy/warning, passive, bus-off) is set
    pub const fn is_bus_error(self) -> bool {
        self.intersects(Self::ANYBUSERR)
    }

    pub const fn is_bus_off(self) -> bool {
        self.intersects(Self::BUSOFF)
    }

    pub const fn is_bus_passive(self) -> bool {
        self.intersects(Self::BUSPASSIVE)
    }

    pub const fn is_bus_light(self) -> bool {
        self.intersects(Self::BUSLIGHT)
    }

    pub const fn is_bus_warning(self) -> bool {
        self.intersects(Self::BUSWARNING)
    }

    pub const fn is_receive_queue_empty(self) -> bool {
        self.intersects(Self::QRCVEMPTY)
    }

    pub const fn is_transmit_queue_full(self) -> bool {
        self.intersects(Self::QXMTFULL)
    }

    pub const fn is_caution(self) -> bool {
        self.intersects(Self::CAUTION)
    }

    pub const fn is_not_initialized(self) -> bool {
        self.intersects(Self::INITIALIZE)
    }

    /// True if any handle error (hardware, net, client) is reported
    pub const fn is_handle_error(self) -> bool {
        self.0 & HANDLE_ERROR_BIT != 0
    }

    /// Decodes the handle error field
    pub const fn handle_error(self) -> Option<HandleError> {
        match self.0 & HANDLE_FIELD {
            0x01400 => Some(HandleError::Hardware),
            0x01800 => Some(HandleError::Net),
            0x01C00 => Some(HandleError::Client),
            _ => None,
        }
    }

    /// `Ok` for [Status::OK] and for a lone [Status::CAUTION], the status otherwise
    pub fn into_result(self) -> Result<(), Status> {
        if self.is_ok() {
            return Ok(());
        }

        if self == Self::CAUTION {
            log::warn!("Operation carried out with irregularities: {self}");
            return Ok(());
        }

        Err(self)
    }

    /// Names of all conditions set in this status
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        let handle = match self.handle_error() {
            Some(HandleError::Hardware) => Some("ILLHW"),
            Some(HandleError::Net) => Some("ILLNET"),
            Some(HandleError::Client) => Some("ILLCLIENT"),
            None => None,
        };

        // bits of the handle field only count as HWINUSE/NETINUSE without the handle error bit
        let bits = if handle.is_some() { self.0 & !HANDLE_FIELD } else { self.0 };

        FLAG_NAMES
            .iter()
            .filter(move |(flag, _)| bits & flag.0 != 0)
            .map(|(_, name)| *name)
            .chain(handle)
    }
}

/// Single-bit conditions in ascending order
static FLAG_NAMES: [(Status, &str); 22] = [
    (Status::XMTFULL, "XMTFULL"),
    (Status::OVERRUN, "OVERRUN"),
    (Status::BUSLIGHT, "BUSLIGHT"),
    (Status::BUSHEAVY, "BUSHEAVY"),
    (Status::BUSOFF, "BUSOFF"),
    (Status::QRCVEMPTY, "QRCVEMPTY"),
    (Status::QOVERRUN, "QOVERRUN"),
    (Status::QXMTFULL, "QXMTFULL"),
    (Status::REGTEST, "REGTEST"),
    (Status::NODRIVER, "NODRIVER"),
    (Status::HWINUSE, "HWINUSE"),
    (Status::NETINUSE, "NETINUSE"),
    (Status::RESOURCE, "RESOURCE"),
    (Status::ILLPARAMTYPE, "ILLPARAMTYPE"),
    (Status::ILLPARAMVAL, "ILLPARAMVAL"),
    (Status::UNKNOWN, "UNKNOWN"),
    (Status::ILLDATA, "ILLDATA"),
    (Status::BUSPASSIVE, "BUSPASSIVE"),
    (Status::ILLMODE, "ILLMODE"),
    (Status::CAUTION, "CAUTION"),
    (Status::INITIALIZE, "INITIALIZE"),
    (Status::ILLOPERATION, "ILLOPERATION"),
];

/// Kind of invalid handle reported in the handle error field
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HandleError {
    Hardware,
    Net,
    Client,
}

impl From<u32> for Status {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Status> for u32 {
    fn from(value: Status) -> Self {
        value.0
    }
}

impl BitOr for Status {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Status {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Status {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status({:#07X}: {self})", self.0)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            return f.write_str("OK");
        }

        let mut any = false;
        for name in self.names() {
            if any {
                f.write_str(" | ")?;
            }
            f.write_str(name)?;
            any = true;
        }

        if !any {
            write!(f, "{:#X}", self.0)?;
        }

        Ok(())
    }
}

impl core::error::Error for Status {}
