//!# CAN Message
//! PCAN-Basic exchanges frames in three fixed native layouts: [Message] (CAN 2.0, 8 data bytes),
//! [MessageFd] (CAN FD, 64 data bytes) and [MessageXl] (CAN XL, 2048 data bytes).
//! All three keep their native `#[repr(C)]` layout so they can be handed to the driver as is.
//! [Frame] wraps them as one sum type.
//!
//! ## CAN 2.0 message construction example
//! ```
//!# use pcan_basic::message::Message;
//!# use embedded_can::{Id,StandardId};
//!#
//! let message_id = Id::Standard(StandardId::new(0x123).unwrap());
//! let message = Message::new(message_id, &[0x1, 0x2, 0x3]).unwrap();
//!
//! assert_eq!(3, message.len);
//! assert_eq!(&[0x1, 0x2, 0x3], message.payload());
//!```
//! ## CAN FD message construction example
//! ```
//!# use pcan_basic::message::{MessageFd, DLC};
//!# use embedded_can::{Id,ExtendedId};
//!#
//! let message_id = Id::Extended(ExtendedId::new(0x1234_5678).unwrap());
//! // 22 bytes are padded to 24, the next length an FD frame can carry
//! let message = MessageFd::new(message_id, &[0u8; 22], true).unwrap();
//!
//! assert_eq!(DLC::TwentyFour, message.data_length_code().unwrap());
//! assert!(message.message_type().bit_rate_switch());
//! ```

use crate::status::Status;
use core::fmt;
use embedded_can::{ExtendedId, Id, StandardId};
use embedded_time::duration::Microseconds;
use log::debug;
use modular_bitfield_msb::prelude::*;

/// Maximum value for a standard CAN ID of a CAN 2.0A/B / FD message
pub const MAX_VALUE_STANDARD_ID: u32 = 0x7FF;

/// Maximum value for an extended CAN ID of a CAN 2.0A/B / FD message
pub const MAX_VALUE_EXTENDED_ID: u32 = 0x1FFF_FFFF;

/// Maximum value of a CAN XL priority ID
pub const MAX_VALUE_PRIORITY_ID: u32 = 0x7FF;

pub const MAX_LENGTH_DATA_CLASSIC: usize = 8;

pub const MAX_LENGTH_DATA_FD: usize = 64;

/// Maximum amount of data bytes of a CAN-XL message
pub const MAX_LENGTH_DATA_XL: usize = 2048;

/// The PCAN message is a CAN Standard Frame (11-bit identifier)
pub const MESSAGE_STANDARD: u8 = 0x00;
/// The PCAN message is a CAN Remote-Transfer-Request Frame
pub const MESSAGE_RTR: u8 = 0x01;
/// The PCAN message is a CAN Extended Frame (29-bit identifier)
pub const MESSAGE_EXTENDED: u8 = 0x02;
/// The PCAN message represents a FD frame in terms of CiA Specs
pub const MESSAGE_FD: u8 = 0x04;
/// The PCAN message represents a FD bit rate switch (CAN data at a higher bit rate)
pub const MESSAGE_BRS: u8 = 0x08;
/// The PCAN message represents a FD error state indicator (CAN FD transmitter was error active)
pub const MESSAGE_ESI: u8 = 0x10;
/// The PCAN message represents an echo CAN Frame
pub const MESSAGE_ECHO: u8 = 0x20;
/// The PCAN message represents an error frame
pub const MESSAGE_ERRFRAME: u8 = 0x40;
/// The PCAN message represents a PCAN status message
pub const MESSAGE_STATUS: u8 = 0x80;

/// The PCAN message represents a XL frame in terms of CiA Specs
pub const MESSAGE_XL: u16 = 0x100;
/// The PCAN message represents a protocol exception from CAN core
pub const MESSAGE_PROTOCOL_EXCEPTION: u16 = 0x200;
/// The PCAN message represents an error notification from CAN core
pub const MESSAGE_ERROR_NOTIFICATION: u16 = 0x400;

/// Timestamp of a received FD message in microseconds
pub type TimestampFd = u64;

/// Timestamp of a received XL message in microseconds
pub type TimestampXl = u64;

#[bitfield]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
/// Type flags of a message (`MSGTYPE`)
pub struct MessageType {
    /// PCAN status message
    pub status: bool,
    /// Error frame
    pub error_frame: bool,
    /// Echo of a frame sent by this channel
    pub echo: bool,
    /// FD error state indicator
    pub error_state_indicator: bool,
    /// FD bit rate switch
    pub bit_rate_switch: bool,
    /// FD frame
    pub fd: bool,
    /// 29-bit identifier
    pub extended: bool,
    /// Remote transmission request
    pub remote_transmission_request: bool,
}

#[bitfield]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
/// Upper byte of the 16-bit XL message type
pub struct XlMessageFlags {
    #[skip]
    __: B5,
    /// Error notification from CAN core
    pub error_notification: bool,
    /// Protocol exception from CAN core
    pub protocol_exception: bool,
    /// XL frame
    pub xl: bool,
}

/// Data length code of classic and FD frames
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone)]
#[allow(clippy::upper_case_acronyms)]
pub enum DLC {
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Twelve,
    Sixteen,
    Twenty,
    TwentyFour,
    ThirtyTwo,
    FortyEight,
    SixtyFour,
}

impl DLC {
    const ALL: [DLC; 16] = [
        Self::Zero,
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Twelve,
        Self::Sixteen,
        Self::Twenty,
        Self::TwentyFour,
        Self::ThirtyTwo,
        Self::FortyEight,
        Self::SixtyFour,
    ];

    pub fn from_length(value: usize) -> Result<Self, MessageError> {
        Self::ALL
            .into_iter()
            .find(|dlc| dlc.length() == value)
            .ok_or(MessageError::InvalidLength(value))
    }

    /// Smallest code able to carry `value` bytes
    pub fn covering(value: usize) -> Result<Self, MessageError> {
        Self::ALL
            .into_iter()
            .find(|dlc| dlc.length() >= value)
            .ok_or(MessageError::InvalidLength(value))
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Number of payload bytes
    pub fn length(self) -> usize {
        match self {
            Self::Twelve => 12,
            Self::Sixteen => 16,
            Self::Twenty => 20,
            Self::TwentyFour => 24,
            Self::ThirtyTwo => 32,
            Self::FortyEight => 48,
            Self::SixtyFour => 64,
            dlc => dlc as usize,
        }
    }
}

/// Possible errors when creating a message
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone)]
pub enum MessageError {
    /// Payload length invalid
    InvalidLength(usize),
    /// Identifier out of range for the frame format
    InvalidIdentifier(u32),
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(length) => write!(f, "invalid payload length {length}"),
            Self::InvalidIdentifier(id) => write!(f, "identifier {id:#X} out of range"),
        }
    }
}

impl core::error::Error for MessageError {}

/// Splits an identifier into raw value and type flags
fn id_parts(identifier: Id) -> (u32, MessageType) {
    match identifier {
        Id::Standard(sid) => (sid.as_raw() as u32, MessageType::new()),
        Id::Extended(eid) => (eid.as_raw(), MessageType::new().with_extended(true)),
    }
}

/// Rebuilds an identifier from raw value and extended flag
fn to_id(raw: u32, extended: bool) -> Id {
    if extended {
        Id::Extended(ExtendedId::new(raw & MAX_VALUE_EXTENDED_ID).unwrap_or(ExtendedId::ZERO))
    } else {
        Id::Standard(StandardId::new((raw & MAX_VALUE_STANDARD_ID) as u16).unwrap_or(StandardId::ZERO))
    }
}

/// CAN 2.0 message (`TPCANMsg`)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Message {
    /// 11/29-bit message identifier
    pub id: u32,
    /// Type of the message, see [MessageType]
    pub msg_type: u8,
    /// Data length code of the message (0..8)
    pub len: u8,
    /// Data of the message
    pub data: [u8; MAX_LENGTH_DATA_CLASSIC],
}

impl Message {
    /// Creates a data frame with up to 8 bytes
    pub fn new(identifier: Id, data: &[u8]) -> Result<Self, MessageError> {
        if data.len() > MAX_LENGTH_DATA_CLASSIC {
            debug!("Maximum of 8 bytes allowed. Current size: {} bytes", data.len());
            return Err(MessageError::InvalidLength(data.len()));
        }

        let (id, msg_type) = id_parts(identifier);
        let mut message = Self {
            id,
            msg_type: msg_type.into(),
            len: data.len() as u8,
            data: [0; MAX_LENGTH_DATA_CLASSIC],
        };
        message.data[..data.len()].copy_from_slice(data);

        Ok(message)
    }

    /// Creates a remote transmission request frame
    pub fn new_remote(identifier: Id, dlc: usize) -> Result<Self, MessageError> {
        if dlc > MAX_LENGTH_DATA_CLASSIC {
            return Err(MessageError::InvalidLength(dlc));
        }

        let (id, msg_type) = id_parts(identifier);

        Ok(Self {
            id,
            msg_type: msg_type.with_remote_transmission_request(true).into(),
            len: dlc as u8,
            data: [0; MAX_LENGTH_DATA_CLASSIC],
        })
    }

    pub fn message_type(&self) -> MessageType {
        MessageType::from(self.msg_type)
    }

    pub fn identifier(&self) -> Id {
        to_id(self.id, self.message_type().extended())
    }

    /// Payload bytes. The data region is always 8 bytes, a larger `len` is clamped.
    pub fn payload(&self) -> &[u8] {
        if self.message_type().remote_transmission_request() {
            return &[];
        }

        &self.data[..(self.len as usize).min(MAX_LENGTH_DATA_CLASSIC)]
    }

    /// Status carried by a PCAN status message (big-endian in the first four data bytes)
    pub fn carried_status(&self) -> Option<Status> {
        if !self.message_type().status() {
            return None;
        }

        Some(status_from(&self.data))
    }
}

impl embedded_can::Frame for Message {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        Message::new(id.into(), data).ok()
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        Message::new_remote(id.into(), dlc).ok()
    }

    fn is_extended(&self) -> bool {
        self.message_type().extended()
    }

    fn is_remote_frame(&self) -> bool {
        self.message_type().remote_transmission_request()
    }

    fn id(&self) -> Id {
        self.identifier()
    }

    fn dlc(&self) -> usize {
        self.len as usize
    }

    fn data(&self) -> &[u8] {
        self.payload()
    }
}

/// Timestamp of a received CAN 2.0 message (`TPCANTimestamp`)
///
/// Total microseconds = micros + 1000 * millis + 0x1_0000_0000 * 1000 * millis_overflow
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Timestamp {
    /// Base-value: milliseconds: 0.. 2^32-1
    pub millis: u32,
    /// Roll-arounds of millis
    pub millis_overflow: u16,
    /// Microseconds: 0..999
    pub micros: u16,
}

impl Timestamp {
    const MICROS_PER_OVERFLOW: u64 = 0x1_0000_0000 * 1000;

    pub fn total_micros(&self) -> u64 {
        self.micros as u64 + 1000 * self.millis as u64 + Self::MICROS_PER_OVERFLOW * self.millis_overflow as u64
    }

    /// Splits a microsecond counter into the three native fields
    pub fn from_micros(total: u64) -> Self {
        let overflow = total / Self::MICROS_PER_OVERFLOW;
        let remainder = total % Self::MICROS_PER_OVERFLOW;

        Self {
            millis: (remainder / 1000) as u32,
            millis_overflow: overflow as u16,
            micros: (remainder % 1000) as u16,
        }
    }

    pub fn as_duration(&self) -> Microseconds<u64> {
        Microseconds(self.total_micros())
    }
}

/// CAN FD message (`TPCANMsgFD`)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MessageFd {
    /// 11/29-bit message identifier
    pub id: u32,
    /// Type of the message, see [MessageType]
    pub msg_type: u8,
    /// Data length code of the message (0..15)
    pub dlc: u8,
    /// Data of the message
    pub data: [u8; MAX_LENGTH_DATA_FD],
}

impl Default for MessageFd {
    fn default() -> Self {
        Self {
            id: 0,
            msg_type: MESSAGE_STANDARD,
            dlc: 0,
            data: [0; MAX_LENGTH_DATA_FD],
        }
    }
}

impl MessageFd {
    /// Creates an FD data frame. The DLC is the smallest code covering the payload,
    /// padding bytes are zero.
    pub fn new(identifier: Id, data: &[u8], bit_rate_switch: bool) -> Result<Self, MessageError> {
        if data.len() > MAX_LENGTH_DATA_FD {
            debug!("Maximum of 64 bytes allowed. Current size: {} bytes", data.len());
            return Err(MessageError::InvalidLength(data.len()));
        }

        let dlc = DLC::covering(data.len())?;
        let (id, msg_type) = id_parts(identifier);

        let mut message = Self {
            id,
            msg_type: msg_type.with_fd(true).with_bit_rate_switch(bit_rate_switch).into(),
            dlc: dlc.code(),
            data: [0; MAX_LENGTH_DATA_FD],
        };
        message.data[..data.len()].copy_from_slice(data);

        Ok(message)
    }

    /// Carries a CAN 2.0 message in the FD layout, without the FD flag
    pub fn from_classic(message: &Message) -> Self {
        let mut fd = Self {
            id: message.id,
            msg_type: message.msg_type,
            dlc: message.len.min(MAX_LENGTH_DATA_CLASSIC as u8),
            ..Self::default()
        };
        fd.data[..MAX_LENGTH_DATA_CLASSIC].copy_from_slice(&message.data);

        fd
    }

    pub fn message_type(&self) -> MessageType {
        MessageType::from(self.msg_type)
    }

    pub fn identifier(&self) -> Id {
        to_id(self.id, self.message_type().extended())
    }

    pub fn data_length_code(&self) -> Option<DLC> {
        DLC::from_code(self.dlc)
    }

    pub fn payload(&self) -> &[u8] {
        if self.message_type().remote_transmission_request() {
            return &[];
        }

        let length = match self.data_length_code() {
            Some(dlc) if self.message_type().fd() => dlc.length(),
            Some(dlc) => dlc.length().min(MAX_LENGTH_DATA_CLASSIC),
            None => 0,
        };

        &self.data[..length]
    }
}

/// CAN XL message (`TPCANMsgXL`)
///
/// For CAN 2.0 and CAN FD frames only `pid`, `msg_type`, `dlc` and `data` are used.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MessageXl {
    /// CAN XL: priority ID (0..0x7FF); CAN 2.0/FD: 11/29-bit message identifier
    pub pid: u32,
    /// Virtual CAN network ID
    pub vcid: u8,
    /// Type of the message, see [MessageType] and [XlMessageFlags]
    pub msg_type: u16,
    /// Data length code of the message (0..2047)
    pub dlc: u16,
    /// Service data unit (SDU) protocol type
    pub sdt: u8,
    /// Acceptance field, SDU specific high-layer ID
    pub af: u32,
    /// Remote request substitution flag (0..1)
    pub rrs: u8,
    /// Simple extended content flag (0..1)
    pub sec: u8,
    /// Data of the message
    pub data: [u8; MAX_LENGTH_DATA_XL],
}

impl Default for MessageXl {
    fn default() -> Self {
        Self {
            pid: 0,
            vcid: 0,
            msg_type: 0,
            dlc: 0,
            sdt: 0,
            af: 0,
            rrs: 0,
            sec: 0,
            data: [0; MAX_LENGTH_DATA_XL],
        }
    }
}

impl MessageXl {
    /// Creates an XL data frame carrying 1 to 2048 bytes
    pub fn new(priority_id: u16, sdt: u8, vcid: u8, af: u32, data: &[u8]) -> Result<Self, MessageError> {
        if data.is_empty() || data.len() > MAX_LENGTH_DATA_XL {
            debug!("XL payload must carry 1 to 2048 bytes. Current size: {} bytes", data.len());
            return Err(MessageError::InvalidLength(data.len()));
        }

        if priority_id as u32 > MAX_VALUE_PRIORITY_ID {
            return Err(MessageError::InvalidIdentifier(priority_id as u32));
        }

        let mut message = Self {
            pid: priority_id as u32,
            vcid,
            msg_type: MESSAGE_XL,
            dlc: (data.len() - 1) as u16,
            sdt,
            af,
            ..Self::default()
        };
        message.data[..data.len()].copy_from_slice(data);

        Ok(message)
    }

    /// Sets the simple extended content flag
    pub fn with_simple_extended_content(mut self, value: bool) -> Self {
        self.sec = value as u8;
        self
    }

    /// Flags of the lower type byte
    pub fn message_type(&self) -> MessageType {
        MessageType::from((self.msg_type & 0xFF) as u8)
    }

    /// Flags of the upper type byte
    pub fn xl_flags(&self) -> XlMessageFlags {
        XlMessageFlags::from((self.msg_type >> 8) as u8)
    }

    pub fn is_xl(&self) -> bool {
        self.xl_flags().xl()
    }

    /// Number of payload bytes according to the frame format
    pub fn payload_length(&self) -> usize {
        if self.is_xl() {
            return (self.dlc as usize + 1).min(MAX_LENGTH_DATA_XL);
        }

        if self.message_type().remote_transmission_request() {
            return 0;
        }

        match DLC::from_code(self.dlc.min(u8::MAX as u16) as u8) {
            Some(dlc) if self.message_type().fd() => dlc.length(),
            Some(dlc) => dlc.length().min(MAX_LENGTH_DATA_CLASSIC),
            None => 0,
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.data[..self.payload_length()]
    }
}

impl From<&Message> for MessageXl {
    fn from(message: &Message) -> Self {
        let mut xl = Self {
            pid: message.id,
            msg_type: message.msg_type as u16,
            dlc: message.len as u16,
            ..Self::default()
        };
        xl.data[..MAX_LENGTH_DATA_CLASSIC].copy_from_slice(&message.data);

        xl
    }
}

impl From<&MessageFd> for MessageXl {
    fn from(message: &MessageFd) -> Self {
        let mut xl = Self {
            pid: message.id,
            msg_type: message.msg_type as u16,
            dlc: message.dlc as u16,
            ..Self::default()
        };
        xl.data[..MAX_LENGTH_DATA_FD].copy_from_slice(&message.data);

        xl
    }
}

/// Frame format selecting the native read/write entry points
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Classic,
    Fd,
    Xl,
}

/// Any frame PCAN-Basic can transmit, kept in its native layout
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum Frame {
    Classic(Message),
    Fd(MessageFd),
    Xl(MessageXl),
}

impl Frame {
    pub fn kind(&self) -> FrameKind {
        match self {
            Self::Classic(_) => FrameKind::Classic,
            Self::Fd(_) => FrameKind::Fd,
            Self::Xl(_) => FrameKind::Xl,
        }
    }

    /// Raw identifier (priority ID for XL frames)
    pub fn raw_id(&self) -> u32 {
        match self {
            Self::Classic(message) => message.id,
            Self::Fd(message) => message.id,
            Self::Xl(message) => message.pid,
        }
    }

    /// Lower type byte
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Classic(message) => message.message_type(),
            Self::Fd(message) => message.message_type(),
            Self::Xl(message) => message.message_type(),
        }
    }

    pub fn payload(&self) -> &[u8] {
        match self {
            Self::Classic(message) => message.payload(),
            Self::Fd(message) => message.payload(),
            Self::Xl(message) => message.payload(),
        }
    }

    /// Status carried by a PCAN status message of any frame format
    pub fn carried_status(&self) -> Option<Status> {
        if !self.message_type().status() {
            return None;
        }

        let data: &[u8] = match self {
            Self::Classic(message) => &message.data,
            Self::Fd(message) => &message.data,
            Self::Xl(message) => &message.data,
        };

        Some(status_from(data))
    }
}

/// Big-endian status in the first four data bytes
fn status_from(data: &[u8]) -> Status {
    Status::from_bits(u32::from_be_bytes([data[0], data[1], data[2], data[3]]))
}

impl From<Message> for Frame {
    fn from(value: Message) -> Self {
        Self::Classic(value)
    }
}

impl From<MessageFd> for Frame {
    fn from(value: MessageFd) -> Self {
        Self::Fd(value)
    }
}

impl From<MessageXl> for Frame {
    fn from(value: MessageXl) -> Self {
        Self::Xl(value)
    }
}
