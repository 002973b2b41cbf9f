//!# Message filters
//! PCAN-Basic filters received messages in two ways:
//! * ID ranges registered with `CAN_FilterMessages`. Each call widens the filter, it never narrows it.
//!   Narrowing happens only by closing or opening the filter ([MessageFilter]) and registering again.
//! * Code/mask acceptance filters ([AcceptanceFilter]) set as 64-bit parameter values.
//!
//! ```
//!# use pcan_basic::filter::{AcceptanceFilter, FilterMode, IdRange};
//! // IDs 0x100 to 0x1FF
//! let range = IdRange::new(0x100, 0x1FF, FilterMode::Standard).unwrap();
//! assert!(range.contains(0x123));
//!
//! // Range exceeding the 11-bit ID space
//! assert_eq!(None, IdRange::new(0x100, 0x800, FilterMode::Standard));
//!
//! // Mask bits set to 1 are irrelevant for acceptance
//! let filter = AcceptanceFilter::new(0x120, 0x00F, FilterMode::Standard).unwrap();
//! assert_eq!(0x0000_0120_0000_000F, filter.value());
//! assert!(filter.accepts(0x12A));
//! assert!(!filter.accepts(0x13A));
//! ```

use crate::message::{MAX_VALUE_EXTENDED_ID, MAX_VALUE_STANDARD_ID};
use crate::parameter::FilterState;
use serde::{Deserialize, Serialize};

/// ID format a filter applies to (`TPCANMode`)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FilterMode {
    /// 11-bit identifiers
    #[default]
    Standard = 0x00,
    /// 29-bit identifiers
    Extended = 0x02,
}

impl FilterMode {
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::Standard),
            0x02 => Some(Self::Extended),
            _ => None,
        }
    }

    /// Highest identifier of the mode
    pub fn max_id(self) -> u32 {
        match self {
            Self::Standard => MAX_VALUE_STANDARD_ID,
            Self::Extended => MAX_VALUE_EXTENDED_ID,
        }
    }
}

/// Inclusive range of identifiers registered with `CAN_FilterMessages`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IdRangeFields")]
pub struct IdRange {
    pub(crate) from: u32,
    pub(crate) to: u32,
    pub(crate) mode: FilterMode,
}

impl IdRange {
    /// Returns `None` if `from > to` or `to` exceeds the ID space of the mode
    pub fn new(from: u32, to: u32, mode: FilterMode) -> Option<Self> {
        if from > to || to > mode.max_id() {
            return None;
        }

        Some(Self { from, to, mode })
    }

    /// Single identifier
    pub fn single(id: u32, mode: FilterMode) -> Option<Self> {
        Self::new(id, id, mode)
    }

    pub fn from_id(&self) -> u32 {
        self.from
    }

    pub fn to_id(&self) -> u32 {
        self.to
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn contains(&self, id: u32) -> bool {
        (self.from..=self.to).contains(&id)
    }
}

#[derive(Deserialize)]
struct IdRangeFields {
    from: u32,
    to: u32,
    #[serde(default)]
    mode: FilterMode,
}

impl TryFrom<IdRangeFields> for IdRange {
    type Error = &'static str;

    fn try_from(value: IdRangeFields) -> Result<Self, Self::Error> {
        Self::new(value.from, value.to, value.mode).ok_or("identifier range empty or out of bounds")
    }
}

/// Closed or fully opened state of the range filter
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageFilter {
    /// No messages will be received
    Close,
    /// All messages will be received
    Open,
}

impl From<MessageFilter> for FilterState {
    fn from(value: MessageFilter) -> Self {
        match value {
            MessageFilter::Close => FilterState::Close,
            MessageFilter::Open => FilterState::Open,
        }
    }
}

/// Code/mask acceptance filter. Mask bits set to 1 are irrelevant for acceptance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "AcceptanceFilterFields")]
pub struct AcceptanceFilter {
    pub(crate) code: u32,
    pub(crate) mask: u32,
    pub(crate) mode: FilterMode,
}

impl AcceptanceFilter {
    /// Returns `None` if code or mask exceed the ID space of the mode
    pub fn new(code: u32, mask: u32, mode: FilterMode) -> Option<Self> {
        if code > mode.max_id() || mask > mode.max_id() {
            return None;
        }

        Some(Self { code, mask, mode })
    }

    /// Filter accepting every identifier, the driver default
    pub fn open(mode: FilterMode) -> Self {
        Self {
            code: 0,
            mask: mode.max_id(),
            mode,
        }
    }

    /// Decodes a parameter value: code in the upper, mask in the lower 32 bits
    pub fn from_value(value: u64, mode: FilterMode) -> Option<Self> {
        Self::new((value >> 32) as u32, value as u32, mode)
    }

    /// Parameter value: code in the upper, mask in the lower 32 bits
    pub fn value(&self) -> u64 {
        ((self.code as u64) << 32) | self.mask as u64
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn accepts(&self, id: u32) -> bool {
        (id ^ self.code) & !self.mask & self.mode.max_id() == 0
    }
}

#[derive(Deserialize)]
struct AcceptanceFilterFields {
    code: u32,
    mask: u32,
    #[serde(default)]
    mode: FilterMode,
}

impl TryFrom<AcceptanceFilterFields> for AcceptanceFilter {
    type Error = &'static str;

    fn try_from(value: AcceptanceFilterFields) -> Result<Self, Self::Error> {
        Self::new(value.code, value.mask, value.mode).ok_or("code or mask out of bounds")
    }
}
