//!# Parameters
//! Channel and library settings are read and written through `CAN_GetValue`/`CAN_SetValue`
//! with a parameter identifier and a raw buffer. Each [Parameter] has a fixed [ValueKind]
//! and [Access], so typed accessors can reject wrong usage before the buffer reaches the driver.
//!
//! ```
//!# use pcan_basic::parameter::{Access, Parameter, ValueKind};
//! assert_eq!(ValueKind::U64, Parameter::AcceptanceFilter11Bit.kind());
//! assert_eq!(Access::Read, Parameter::HardwareName.access());
//! assert_eq!(Parameter::BitrateInfoBtr, Parameter::BITRATE_INFO);
//! ```

use crate::channel::{Channel, Device};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use byteorder::{ByteOrder, NativeEndian};
use core::fmt;
use core::ops::BitOr;
use modular_bitfield_msb::prelude::*;
use serde::{Deserialize, Serialize};

/// Maximum length of the name of a device: 32 characters + terminator
pub const MAX_LENGTH_HARDWARE_NAME: usize = 33;

/// Maximum length of a version string: 255 characters + terminator
pub const MAX_LENGTH_VERSION_STRING: usize = 256;

/// Parameter identifier (`TPCANParameter`)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Parameter {
    /// Device identifier
    DeviceId = 0x01,
    /// 5-Volt power
    FiveVoltsPower = 0x02,
    /// Receive event handle
    ReceiveEvent = 0x03,
    /// Message filter state, see [FilterState]
    MessageFilter = 0x04,
    /// PCAN-Basic API version
    ApiVersion = 0x05,
    /// Device channel version
    ChannelVersion = 0x06,
    /// Reset on bus-off
    BusOffAutoReset = 0x07,
    ListenOnly = 0x08,
    /// Directory path for log files
    LogLocation = 0x09,
    /// Debug-log activation status
    LogStatus = 0x0A,
    /// Logged information, see [LogFunction]
    LogConfigure = 0x0B,
    /// Custom insertion of text into the log file
    LogText = 0x0C,
    /// Availability of a channel, see [ChannelCondition]
    ChannelCondition = 0x0D,
    HardwareName = 0x0E,
    /// Message reception status
    ReceiveStatus = 0x0F,
    /// CAN controller number
    ControllerNumber = 0x10,
    /// Directory path for trace files
    TraceLocation = 0x11,
    TraceStatus = 0x12,
    /// Maximum file size of a trace in megabytes
    TraceSize = 0x13,
    /// Trace file storing mode, see [TraceFile]
    TraceConfigure = 0x14,
    /// Blinks the LED of a USB channel
    ChannelIdentifying = 0x15,
    /// Capabilities of a device, see [ChannelFeatures]
    ChannelFeatures = 0x16,
    /// Use of an existing bit rate
    BitrateAdapting = 0x17,
    /// Configured bit rate as BTR0/BTR1 value
    BitrateInfoBtr = 0x18,
    /// Configured bit rate as FD bit-rate string
    BitrateInfoFd = 0x19,
    /// Nominal bus speed in bits per second
    BusSpeedNominal = 0x1A,
    /// FD data bus speed in bits per second
    BusSpeedFd = 0x1B,
    /// Remote IPv4 address of a LAN channel
    IpAddress = 0x1C,
    /// Status of the virtual PCAN-Gateway service, see [ServiceStatus]
    LanServiceStatus = 0x1D,
    AllowStatusFrames = 0x1E,
    AllowRtrFrames = 0x1F,
    AllowErrorFrames = 0x20,
    /// Delay between sending frames in microseconds
    InterframeDelay = 0x21,
    /// Code/mask filter for 11-bit messages
    AcceptanceFilter11Bit = 0x22,
    /// Code/mask filter for 29-bit messages
    AcceptanceFilter29Bit = 0x23,
    /// Output mode of the 32 digital I/O pins (1 = output active)
    IoDigitalConfiguration = 0x24,
    IoDigitalValue = 0x25,
    /// Sets multiple digital I/O pins to high
    IoDigitalSet = 0x26,
    /// Clears multiple digital I/O pins
    IoDigitalClear = 0x27,
    /// Value of a single analog input pin
    IoAnalogValue = 0x28,
    FirmwareVersion = 0x29,
    AttachedChannelsCount = 0x2A,
    /// Information about all attached channels
    AttachedChannels = 0x2B,
    AllowEchoFrames = 0x2C,
    DevicePartNumber = 0x2D,
    /// Hard reset processing on `CAN_Reset`
    HardResetStatus = 0x2E,
    /// Communication direction of a LAN channel, see [LanDirection]
    LanChannelDirection = 0x2F,
    /// Globally unique device identifier
    DeviceGuid = 0x30,
    /// Configured bit rate as classic bit-rate string
    BitrateInfoCc = 0x31,
    /// Configured bit rate as XL bit-rate string
    BitrateInfoXl = 0x32,
    /// XL data bus speed in bits per second
    BusSpeedXl = 0x33,
}

impl Parameter {
    #[deprecated(note = "use Parameter::BusSpeedFd")]
    pub const BUSSPEED_DATA: Self = Self::BusSpeedFd;
    /// Deprecated alias of [Parameter::BitrateInfoBtr]
    pub const BITRATE_INFO: Self = Self::BitrateInfoBtr;

    pub const ALL: [Parameter; 51] = [
        Self::DeviceId,
        Self::FiveVoltsPower,
        Self::ReceiveEvent,
        Self::MessageFilter,
        Self::ApiVersion,
        Self::ChannelVersion,
        Self::BusOffAutoReset,
        Self::ListenOnly,
        Self::LogLocation,
        Self::LogStatus,
        Self::LogConfigure,
        Self::LogText,
        Self::ChannelCondition,
        Self::HardwareName,
        Self::ReceiveStatus,
        Self::ControllerNumber,
        Self::TraceLocation,
        Self::TraceStatus,
        Self::TraceSize,
        Self::TraceConfigure,
        Self::ChannelIdentifying,
        Self::ChannelFeatures,
        Self::BitrateAdapting,
        Self::BitrateInfoBtr,
        Self::BitrateInfoFd,
        Self::BusSpeedNominal,
        Self::BusSpeedFd,
        Self::IpAddress,
        Self::LanServiceStatus,
        Self::AllowStatusFrames,
        Self::AllowRtrFrames,
        Self::AllowErrorFrames,
        Self::InterframeDelay,
        Self::AcceptanceFilter11Bit,
        Self::AcceptanceFilter29Bit,
        Self::IoDigitalConfiguration,
        Self::IoDigitalValue,
        Self::IoDigitalSet,
        Self::IoDigitalClear,
        Self::IoAnalogValue,
        Self::FirmwareVersion,
        Self::AttachedChannelsCount,
        Self::AttachedChannels,
        Self::AllowEchoFrames,
        Self::DevicePartNumber,
        Self::HardResetStatus,
        Self::LanChannelDirection,
        Self::DeviceGuid,
        Self::BitrateInfoCc,
        Self::BitrateInfoXl,
        Self::BusSpeedXl,
    ];

    pub fn from_raw(value: u8) -> Option<Self> {
        Self::ALL.get((value as usize).checked_sub(1)?).copied()
    }

    pub fn raw(self) -> u8 {
        self as u8
    }

    /// Type of the value buffer
    pub fn kind(self) -> ValueKind {
        match self {
            Self::ApiVersion
            | Self::ChannelVersion
            | Self::LogLocation
            | Self::LogText
            | Self::HardwareName
            | Self::TraceLocation
            | Self::BitrateInfoFd
            | Self::IpAddress
            | Self::FirmwareVersion
            | Self::DevicePartNumber
            | Self::DeviceGuid
            | Self::BitrateInfoCc
            | Self::BitrateInfoXl => ValueKind::Text,
            Self::AcceptanceFilter11Bit | Self::AcceptanceFilter29Bit => ValueKind::U64,
            Self::ReceiveEvent => ValueKind::Handle,
            Self::AttachedChannels => ValueKind::ChannelList,
            _ => ValueKind::U32,
        }
    }

    /// Whether the parameter can be read, written or both
    pub fn access(self) -> Access {
        match self {
            Self::LogText | Self::IoDigitalSet | Self::IoDigitalClear => Access::Write,
            Self::ApiVersion
            | Self::ChannelVersion
            | Self::ChannelCondition
            | Self::HardwareName
            | Self::ChannelFeatures
            | Self::BitrateInfoBtr
            | Self::BitrateInfoFd
            | Self::BusSpeedNominal
            | Self::BusSpeedFd
            | Self::IpAddress
            | Self::LanServiceStatus
            | Self::IoAnalogValue
            | Self::FirmwareVersion
            | Self::AttachedChannelsCount
            | Self::AttachedChannels
            | Self::DevicePartNumber
            | Self::LanChannelDirection
            | Self::DeviceGuid
            | Self::BitrateInfoCc
            | Self::BitrateInfoXl
            | Self::BusSpeedXl => Access::Read,
            _ => Access::ReadWrite,
        }
    }

    /// True for parameters that apply to the library instead of a channel
    pub fn is_global(self) -> bool {
        matches!(
            self,
            Self::ApiVersion
                | Self::LogLocation
                | Self::LogStatus
                | Self::LogConfigure
                | Self::LogText
                | Self::AttachedChannelsCount
                | Self::AttachedChannels
                | Self::LanServiceStatus
        )
    }
}

/// Type of a parameter value buffer
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// NUL terminated string, 256 byte buffer
    Text,
    U32,
    U64,
    /// Native event handle, pointer sized
    Handle,
    /// Array of [ChannelInformation]
    ChannelList,
}

impl ValueKind {
    /// Fixed buffer length, `None` for the channel list
    pub fn buffer_len(self) -> Option<usize> {
        match self {
            Self::Text => Some(MAX_LENGTH_VERSION_STRING),
            Self::U32 => Some(4),
            Self::U64 => Some(8),
            Self::Handle => Some(core::mem::size_of::<usize>()),
            Self::ChannelList => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    Read,
    Write,
    ReadWrite,
}

impl Access {
    pub fn readable(self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    pub fn writable(self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }
}

/// Typed value of a parameter
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Text(String),
    U32(u32),
    U64(u64),
    Handle(usize),
    Channels(Vec<ChannelInformation>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::U32(_) => ValueKind::U32,
            Self::U64(_) => ValueKind::U64,
            Self::Handle(_) => ValueKind::Handle,
            Self::Channels(_) => ValueKind::ChannelList,
        }
    }

    /// Native buffer of the value. Text is NUL terminated.
    pub(crate) fn encode(&self) -> Vec<u8> {
        match self {
            Self::Text(text) => {
                let mut buffer = Vec::with_capacity(text.len() + 1);
                buffer.extend_from_slice(text.as_bytes());
                buffer.push(0);
                buffer
            }
            Self::U32(value) => value.to_ne_bytes().to_vec(),
            Self::U64(value) => value.to_ne_bytes().to_vec(),
            Self::Handle(value) => value.to_ne_bytes().to_vec(),
            Self::Channels(channels) => {
                let mut buffer = alloc::vec![0u8; channels.len() * ChannelInformation::SIZE];
                for (info, chunk) in channels.iter().zip(buffer.chunks_exact_mut(ChannelInformation::SIZE)) {
                    info.write_bytes(chunk);
                }
                buffer
            }
        }
    }

    /// Decodes a native buffer of the given kind
    pub(crate) fn decode(kind: ValueKind, buffer: &[u8]) -> Self {
        match kind {
            ValueKind::Text => Self::Text(decode_text(buffer)),
            ValueKind::U32 => Self::U32(NativeEndian::read_u32(&pad::<4>(buffer))),
            ValueKind::U64 => Self::U64(NativeEndian::read_u64(&pad::<8>(buffer))),
            ValueKind::Handle => {
                let mut bytes = [0u8; core::mem::size_of::<usize>()];
                let length = buffer.len().min(bytes.len());
                bytes[..length].copy_from_slice(&buffer[..length]);
                Self::Handle(usize::from_ne_bytes(bytes))
            }
            ValueKind::ChannelList => Self::Channels(
                buffer
                    .chunks_exact(ChannelInformation::SIZE)
                    .filter_map(ChannelInformation::from_bytes)
                    .collect(),
            ),
        }
    }
}

fn pad<const N: usize>(buffer: &[u8]) -> [u8; N] {
    let mut bytes = [0u8; N];
    let length = buffer.len().min(N);
    bytes[..length].copy_from_slice(&buffer[..length]);
    bytes
}

/// String up to the first NUL, invalid UTF-8 replaced
pub(crate) fn decode_text(buffer: &[u8]) -> String {
    let end = buffer.iter().position(|byte| *byte == 0).unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..end]).to_string()
}

/// Off/on value of boolean parameters
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum ParameterState {
    Off = 0x00,
    On = 0x01,
}

impl ParameterState {
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            0x00 => Some(Self::Off),
            0x01 => Some(Self::On),
            _ => None,
        }
    }
}

impl From<bool> for ParameterState {
    fn from(value: bool) -> Self {
        if value {
            Self::On
        } else {
            Self::Off
        }
    }
}

/// Value of [Parameter::MessageFilter]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum FilterState {
    /// No messages will be received
    Close = 0x00,
    /// All messages will be received
    Open = 0x01,
    /// Only registered messages will be received
    Custom = 0x02,
}

impl FilterState {
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            0x00 => Some(Self::Close),
            0x01 => Some(Self::Open),
            0x02 => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Value of [Parameter::ChannelCondition]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum ChannelCondition {
    /// Illegal handle or hardware not available
    Unavailable = 0x00,
    /// Available to be connected
    Available = 0x01,
    /// Valid and already in use
    Occupied = 0x02,
    /// In use by PCAN-View, but available to connect
    PcanView = 0x03,
}

impl ChannelCondition {
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            0x00 => Some(Self::Unavailable),
            0x01 => Some(Self::Available),
            0x02 => Some(Self::Occupied),
            0x03 => Some(Self::PcanView),
            _ => None,
        }
    }
}

/// Value of [Parameter::LanChannelDirection]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum LanDirection {
    /// Incoming communication only
    Read = 0x01,
    /// Outgoing communication only
    Write = 0x02,
    ReadWrite = 0x03,
}

impl LanDirection {
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            0x01 => Some(Self::Read),
            0x02 => Some(Self::Write),
            0x03 => Some(Self::ReadWrite),
            _ => None,
        }
    }
}

/// Value of [Parameter::LanServiceStatus]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum ServiceStatus {
    Stopped = 0x01,
    Running = 0x04,
}

impl ServiceStatus {
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            0x01 => Some(Self::Stopped),
            0x04 => Some(Self::Running),
            _ => None,
        }
    }
}

/// Mask of [Parameter::LogConfigure]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogFunction(u32);

impl LogFunction {
    /// System exceptions and errors
    pub const DEFAULT: Self = Self(0x00);
    /// Entries to the API functions
    pub const ENTRY: Self = Self(0x01);
    /// Parameters passed to the API functions
    pub const PARAMETERS: Self = Self(0x02);
    /// Exits from the API functions
    pub const LEAVE: Self = Self(0x04);
    /// Messages passed to `CAN_Write`
    pub const WRITE: Self = Self(0x08);
    /// Messages received within `CAN_Read`
    pub const READ: Self = Self(0x10);
    pub const ALL: Self = Self(0xFFFF);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for LogFunction {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Mask of [Parameter::TraceConfigure]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceFile(u32);

impl TraceFile {
    /// Single file written until it reaches the trace size
    pub const SINGLE: Self = Self(0x00);
    /// Data distributed over several files of trace size
    pub const SEGMENTED: Self = Self(0x01);
    /// Date in the file name
    pub const DATE: Self = Self(0x02);
    /// Start time in the file name
    pub const TIME: Self = Self(0x04);
    /// Overwrites traces with the same name
    pub const OVERWRITE: Self = Self(0x80);
    /// Data length column instead of DLC column
    pub const DATA_LENGTH: Self = Self(0x100);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for TraceFile {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[bitfield]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
/// Capabilities of a device (low byte of [Parameter::ChannelFeatures])
pub struct ChannelFeatures {
    #[skip]
    __: B4,
    /// CAN XL support
    pub xl_capable: bool,
    /// I/O functionality for electronic circuits (USB-Chip devices)
    pub io_capable: bool,
    /// Delay between sending frames (FPGA based USB devices)
    pub delay_capable: bool,
    /// CAN FD support
    pub fd_capable: bool,
}

impl ChannelFeatures {
    pub const FD_CAPABLE: u32 = 0x01;
    pub const DELAY_CAPABLE: u32 = 0x02;
    pub const IO_CAPABLE: u32 = 0x04;
    pub const XL_CAPABLE: u32 = 0x08;

    pub fn from_raw(value: u32) -> Self {
        Self::from((value & 0xFF) as u8)
    }

    pub fn raw(self) -> u32 {
        u8::from(self) as u32
    }
}

/// Description of an attached channel (`TPCANChannelInformation`)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChannelInformation {
    /// Channel handle
    pub channel_handle: u16,
    /// Kind of PCAN device, see [Device]
    pub device_type: u8,
    /// CAN controller number
    pub controller_number: u8,
    /// Device capabilities, see [ChannelFeatures]
    pub device_features: u32,
    /// Device name, NUL terminated
    pub device_name: [u8; MAX_LENGTH_HARDWARE_NAME],
    /// Device number
    pub device_id: u32,
    /// Availability status, see [ChannelCondition]
    pub channel_condition: u32,
}

impl Default for ChannelInformation {
    fn default() -> Self {
        Self {
            channel_handle: 0,
            device_type: 0,
            controller_number: 0,
            device_features: 0,
            device_name: [0; MAX_LENGTH_HARDWARE_NAME],
            device_id: 0,
            channel_condition: 0,
        }
    }
}

impl ChannelInformation {
    /// Native size including padding
    pub const SIZE: usize = 52;

    const DEVICE_NAME_OFFSET: usize = 8;
    const DEVICE_ID_OFFSET: usize = 44;
    const CONDITION_OFFSET: usize = 48;

    /// Builds an entry, truncating the name to 32 bytes
    pub fn new(channel: Channel, device_name: &str, device_id: u32, condition: ChannelCondition) -> Self {
        let mut info = Self {
            channel_handle: channel.handle(),
            device_type: channel.device().unwrap_or_default() as u8,
            device_id,
            channel_condition: condition as u32,
            ..Self::default()
        };

        let length = device_name.len().min(MAX_LENGTH_HARDWARE_NAME - 1);
        info.device_name[..length].copy_from_slice(&device_name.as_bytes()[..length]);

        info
    }

    pub fn channel(&self) -> Channel {
        Channel::from_handle(self.channel_handle)
    }

    pub fn device(&self) -> Option<Device> {
        Device::from_raw(self.device_type)
    }

    pub fn name(&self) -> String {
        decode_text(&self.device_name)
    }

    pub fn features(&self) -> ChannelFeatures {
        ChannelFeatures::from_raw(self.device_features)
    }

    pub fn condition(&self) -> Option<ChannelCondition> {
        ChannelCondition::from_raw(self.channel_condition)
    }

    /// Reads one native entry, `None` if `bytes` is shorter than [ChannelInformation::SIZE]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }

        let mut device_name = [0u8; MAX_LENGTH_HARDWARE_NAME];
        device_name.copy_from_slice(&bytes[Self::DEVICE_NAME_OFFSET..Self::DEVICE_NAME_OFFSET + MAX_LENGTH_HARDWARE_NAME]);

        Some(Self {
            channel_handle: NativeEndian::read_u16(&bytes[0..2]),
            device_type: bytes[2],
            controller_number: bytes[3],
            device_features: NativeEndian::read_u32(&bytes[4..8]),
            device_name,
            device_id: NativeEndian::read_u32(&bytes[Self::DEVICE_ID_OFFSET..Self::DEVICE_ID_OFFSET + 4]),
            channel_condition: NativeEndian::read_u32(&bytes[Self::CONDITION_OFFSET..Self::CONDITION_OFFSET + 4]),
        })
    }

    /// Writes one native entry, padding bytes are zeroed.
    /// Returns false and leaves `bytes` untouched if it is shorter than [ChannelInformation::SIZE].
    pub fn write_bytes(&self, bytes: &mut [u8]) -> bool {
        if bytes.len() < Self::SIZE {
            return false;
        }

        bytes[..Self::SIZE].fill(0);
        NativeEndian::write_u16(&mut bytes[0..2], self.channel_handle);
        bytes[2] = self.device_type;
        bytes[3] = self.controller_number;
        NativeEndian::write_u32(&mut bytes[4..8], self.device_features);
        bytes[Self::DEVICE_NAME_OFFSET..Self::DEVICE_NAME_OFFSET + MAX_LENGTH_HARDWARE_NAME]
            .copy_from_slice(&self.device_name);
        NativeEndian::write_u32(&mut bytes[Self::DEVICE_ID_OFFSET..Self::DEVICE_ID_OFFSET + 4], self.device_id);
        NativeEndian::write_u32(&mut bytes[Self::CONDITION_OFFSET..Self::CONDITION_OFFSET + 4], self.channel_condition);
        true
    }
}

/// Primary language of error texts
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u16)]
pub enum Language {
    #[default]
    Neutral = 0x00,
    German = 0x07,
    English = 0x09,
    Spanish = 0x0A,
    French = 0x0C,
    Italian = 0x10,
}

impl Language {
    pub fn from_raw(value: u16) -> Option<Self> {
        match value {
            0x00 => Some(Self::Neutral),
            0x07 => Some(Self::German),
            0x09 => Some(Self::English),
            0x0A => Some(Self::Spanish),
            0x0C => Some(Self::French),
            0x10 => Some(Self::Italian),
            _ => None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}({:#04X})", self.raw())
    }
}
