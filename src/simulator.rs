//!# Simulated driver
//! [SimulatedDriver] implements [NativeDriver] in memory, so the typed API can be used without
//! PEAK hardware. It keeps an attached channel table, per channel receive and transmit queues,
//! range and code/mask filters, parameter storage and a microsecond clock.
//!
//! Frames enter a channel with [SimulatedDriver::deliver] and leave it with
//! [SimulatedDriver::take_transmitted]. The transmit queue is bounded, a full queue
//! reports [Status::QXMTFULL].
//!
//! ```
//!# use pcan_basic::can::PcanBasic;
//!# use pcan_basic::bitrate::Baudrate;
//!# use pcan_basic::channel::Channel;
//!# use pcan_basic::message::{Frame, Message};
//!# use pcan_basic::simulator::SimulatedDriver;
//!# use embedded_can::{Id, StandardId};
//!# use embedded_time::duration::Microseconds;
//!#
//! let mut driver = SimulatedDriver::default();
//! driver.attach(Channel::PCIBUS2, "PCAN-PCI", 3);
//!
//! let mut pcan = PcanBasic::new(driver);
//! pcan.initialize(Channel::PCIBUS2, Baudrate::Baud250K).unwrap();
//!
//! let message = Message::new(Id::Standard(StandardId::new(0x7FF).unwrap()), &[1, 2, 3]).unwrap();
//! pcan.driver_mut().advance_clock(Microseconds(1_500u64));
//! assert!(pcan.driver_mut().deliver(Channel::PCIBUS2, Frame::Classic(message)));
//!
//! let (received, timestamp) = pcan.read(Channel::PCIBUS2).unwrap();
//! assert_eq!(message, received);
//! assert_eq!(1, timestamp.millis);
//! assert_eq!(500, timestamp.micros);
//! ```

use crate::channel::{Channel, Device};
use crate::filter::{AcceptanceFilter, FilterMode, IdRange};
use crate::lookup::LookupQuery;
use crate::message::{
    Frame, FrameKind, Message, MessageFd, MessageXl, Timestamp, TimestampFd, TimestampXl, DLC,
    MAX_LENGTH_DATA_CLASSIC, MAX_LENGTH_DATA_XL, MAX_VALUE_EXTENDED_ID, MAX_VALUE_PRIORITY_ID, MAX_VALUE_STANDARD_ID,
    MESSAGE_ECHO, MESSAGE_STATUS,
};
use crate::native::NativeDriver;
use crate::parameter::{
    decode_text, Access, ChannelCondition, ChannelFeatures, ChannelInformation, FilterState, LanDirection, Language,
    Parameter, ParameterState, ServiceStatus, Value, ValueKind, MAX_LENGTH_VERSION_STRING,
};
use crate::bitrate::{Baudrate, BitrateFd, BitrateXl};
use crate::status::Status;
use alloc::collections::{BTreeMap, VecDeque};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::str::FromStr;
use embedded_time::duration::Microseconds;
use log::trace;

/// Default capacity of each transmit queue
pub const DEFAULT_TRANSMIT_CAPACITY: usize = 64;

/// Version reported for [Parameter::ApiVersion]
pub const SIMULATED_API_VERSION: &str = "4.10.0.0";

/// Bit rate a channel was initialized with
#[derive(Clone, Debug, PartialEq, Eq)]
enum Mode {
    Classic(Baudrate),
    Fd(BitrateFd, String),
    Xl(BitrateXl, String),
}

impl Mode {
    fn kind(&self) -> FrameKind {
        match self {
            Self::Classic(_) => FrameKind::Classic,
            Self::Fd(..) => FrameKind::Fd,
            Self::Xl(..) => FrameKind::Xl,
        }
    }
}

/// Range filter state, see `CAN_FilterMessages`
#[derive(Clone, Debug, PartialEq, Eq)]
struct RangeFilter {
    state: FilterState,
    ranges: Vec<IdRange>,
}

impl Default for RangeFilter {
    fn default() -> Self {
        Self {
            state: FilterState::Open,
            ranges: Vec::new(),
        }
    }
}

impl RangeFilter {
    fn accepts(&self, id: u32, mode: FilterMode) -> bool {
        match self.state {
            FilterState::Close => false,
            FilterState::Open => true,
            FilterState::Custom => self.ranges.iter().any(|range| range.mode() == mode && range.contains(id)),
        }
    }

    fn widen(&mut self, range: IdRange) {
        if self.state != FilterState::Custom {
            self.ranges.clear();
            self.state = FilterState::Custom;
        }

        self.ranges.push(range);
    }
}

#[derive(Clone, Debug)]
struct SimulatedChannel {
    info: ChannelInformation,
    ip_address: String,
    device_guid: String,
    version: String,
    mode: Option<Mode>,
    received: VecDeque<(Frame, u64)>,
    transmitted: VecDeque<Frame>,
    filter: RangeFilter,
    acceptance: [AcceptanceFilter; 2],
    values: BTreeMap<u8, Vec<u8>>,
    bus_status: Status,
}

impl SimulatedChannel {
    fn new(info: ChannelInformation) -> Self {
        Self {
            info,
            ip_address: String::new(),
            device_guid: String::new(),
            version: String::new(),
            mode: None,
            received: VecDeque::new(),
            transmitted: VecDeque::new(),
            filter: RangeFilter::default(),
            acceptance: [
                AcceptanceFilter::open(FilterMode::Standard),
                AcceptanceFilter::open(FilterMode::Extended),
            ],
            values: BTreeMap::new(),
            bus_status: Status::OK,
        }
    }

    fn is_initialized(&self) -> bool {
        self.mode.is_some()
    }

    fn state(&self, parameter: Parameter) -> bool {
        let default = matches!(parameter, Parameter::AllowStatusFrames | Parameter::AllowRtrFrames);
        self.values
            .get(&parameter.raw())
            .map_or(default, |value| value.iter().any(|byte| *byte != 0))
    }

    fn acceptance(&self, mode: FilterMode) -> &AcceptanceFilter {
        match mode {
            FilterMode::Standard => &self.acceptance[0],
            FilterMode::Extended => &self.acceptance[1],
        }
    }

    fn features(&self) -> ChannelFeatures {
        self.info.features()
    }

    /// Drops the state bound to an initialization
    fn release(&mut self) {
        self.mode = None;
        self.received.clear();
        self.transmitted.clear();
        self.filter = RangeFilter::default();
        self.acceptance = [
            AcceptanceFilter::open(FilterMode::Standard),
            AcceptanceFilter::open(FilterMode::Extended),
        ];
        self.bus_status = Status::OK;
    }
}

/// In-memory PCAN-Basic driver
#[derive(Clone, Debug)]
pub struct SimulatedDriver {
    channels: BTreeMap<u16, SimulatedChannel>,
    values: BTreeMap<u8, Vec<u8>>,
    log_lines: Vec<String>,
    clock: u64,
    transmit_capacity: usize,
}

impl Default for SimulatedDriver {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSMIT_CAPACITY)
    }
}

impl SimulatedDriver {
    /// Driver without attached channels
    pub fn new(transmit_capacity: usize) -> Self {
        Self {
            channels: BTreeMap::new(),
            values: BTreeMap::new(),
            log_lines: Vec::new(),
            clock: 0,
            transmit_capacity,
        }
    }

    /// Attaches an FD capable channel
    pub fn attach(&mut self, channel: Channel, name: &str, device_id: u32) -> &mut Self {
        let mut info = ChannelInformation::new(channel, name, device_id, ChannelCondition::Available);
        info.device_features = ChannelFeatures::FD_CAPABLE;
        self.attach_info(info)
    }

    /// Attaches a channel described by `info`
    pub fn attach_info(&mut self, info: ChannelInformation) -> &mut Self {
        trace!("Attached {} as {}", info.name(), info.channel());
        self.channels.insert(info.channel_handle, SimulatedChannel::new(info));
        self
    }

    /// Removes a channel as if it was unplugged
    pub fn detach(&mut self, channel: Channel) -> &mut Self {
        trace!("Detached {channel}");
        self.channels.remove(&channel.handle());
        self
    }

    pub fn set_features(&mut self, channel: Channel, features: ChannelFeatures) -> &mut Self {
        if let Some(state) = self.channels.get_mut(&channel.handle()) {
            state.info.device_features = features.raw();
        }
        self
    }

    pub fn set_controller_number(&mut self, channel: Channel, number: u8) -> &mut Self {
        if let Some(state) = self.channels.get_mut(&channel.handle()) {
            state.info.controller_number = number;
        }
        self
    }

    /// Address reported and matched for LAN channels
    pub fn set_ip_address(&mut self, channel: Channel, address: &str) -> &mut Self {
        if let Some(state) = self.channels.get_mut(&channel.handle()) {
            state.ip_address = address.to_string();
        }
        self
    }

    pub fn set_device_guid(&mut self, channel: Channel, guid: &str) -> &mut Self {
        if let Some(state) = self.channels.get_mut(&channel.handle()) {
            state.device_guid = guid.to_string();
        }
        self
    }

    /// Channel and firmware version text
    pub fn set_version(&mut self, channel: Channel, version: &str) -> &mut Self {
        if let Some(state) = self.channels.get_mut(&channel.handle()) {
            state.version = version.to_string();
        }
        self
    }

    pub fn advance_clock(&mut self, duration: Microseconds<u64>) {
        self.clock = self.clock.saturating_add(duration.0);
    }

    pub fn now(&self) -> Microseconds<u64> {
        Microseconds(self.clock)
    }

    /// Puts a frame on the bus of an initialized channel. Returns false if the channel is not
    /// initialized, cannot carry the frame format or filters it out.
    pub fn deliver(&mut self, channel: Channel, frame: Frame) -> bool {
        let clock = self.clock;
        let Some(state) = self.channels.get_mut(&channel.handle()) else {
            return false;
        };
        let Some(mode) = &state.mode else {
            return false;
        };

        let carried = matches!(
            (mode.kind(), frame.kind()),
            (FrameKind::Classic, FrameKind::Classic)
                | (FrameKind::Fd, FrameKind::Classic | FrameKind::Fd)
                | (FrameKind::Xl, _)
        );
        if !carried {
            trace!("{channel} cannot carry {:?} frames", frame.kind());
            return false;
        }

        let message_type = frame.message_type();
        let filter_mode = if message_type.extended() {
            FilterMode::Extended
        } else {
            FilterMode::Standard
        };

        let accepted = (!message_type.remote_transmission_request() || state.state(Parameter::AllowRtrFrames))
            && (!message_type.error_frame() || state.state(Parameter::AllowErrorFrames))
            && (!message_type.status() || state.state(Parameter::AllowStatusFrames))
            && state.filter.accepts(frame.raw_id(), filter_mode)
            && state.acceptance(filter_mode).accepts(frame.raw_id());

        if accepted {
            trace!("{channel} received frame {:#X} at {clock} µs", frame.raw_id());
            state.received.push_back((frame, clock));
        }

        accepted
    }

    /// Frames waiting in the transmit queue, oldest first
    pub fn transmitted(&self, channel: Channel) -> Vec<Frame> {
        self.channels
            .get(&channel.handle())
            .map(|state| state.transmitted.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Sends all queued frames, freeing the transmit queue
    pub fn take_transmitted(&mut self, channel: Channel) -> Vec<Frame> {
        self.channels
            .get_mut(&channel.handle())
            .map(|state| state.transmitted.drain(..).collect())
            .unwrap_or_default()
    }

    /// Number of frames waiting to be read
    pub fn pending(&self, channel: Channel) -> usize {
        self.channels.get(&channel.handle()).map_or(0, |state| state.received.len())
    }

    /// Sets the bus status reported by `CAN_GetStatus`. With status frames allowed,
    /// a status message carrying the new status is queued.
    pub fn inject_status(&mut self, channel: Channel, status: Status) {
        let clock = self.clock;
        let Some(state) = self.channels.get_mut(&channel.handle()) else {
            return;
        };

        trace!("{channel} bus status changed to {status}");
        state.bus_status = status;

        let Some(mode) = &state.mode else {
            return;
        };

        if state.state(Parameter::AllowStatusFrames) {
            let mut message = Message {
                msg_type: MESSAGE_STATUS,
                len: 4,
                ..Message::default()
            };
            message.data[..4].copy_from_slice(&status.bits().to_be_bytes());

            let frame = match mode.kind() {
                FrameKind::Classic => Frame::Classic(message),
                FrameKind::Fd => Frame::Fd(MessageFd::from_classic(&message)),
                FrameKind::Xl => Frame::Xl(MessageXl::from(&message)),
            };
            state.received.push_back((frame, clock));
        }
    }

    /// Texts written with [Parameter::LogText]
    pub fn log_lines(&self) -> &[String] {
        &self.log_lines
    }

    fn initialized(&mut self, channel: u16) -> Result<&mut SimulatedChannel, Status> {
        match self.channels.get_mut(&channel) {
            Some(state) if state.is_initialized() => Ok(state),
            _ => Err(Status::INITIALIZE),
        }
    }

    fn open(&mut self, channel: u16, mode: Mode) -> Status {
        let Some(state) = self.channels.get_mut(&channel) else {
            return Status::ILLHW;
        };

        if state.is_initialized() {
            return Status::RESOURCE;
        }

        let features = state.features();
        let supported = match mode.kind() {
            FrameKind::Classic => true,
            FrameKind::Fd => features.fd_capable(),
            FrameKind::Xl => features.xl_capable(),
        };
        if !supported {
            return Status::ILLOPERATION;
        }

        trace!("{} initialized as {:?}", Channel::from_handle(channel), mode.kind());
        state.mode = Some(mode);
        Status::OK
    }

    /// Pops the next frame of an initialized channel read with the given entry point
    fn next_frame(&mut self, channel: u16, kind: FrameKind) -> Result<(Frame, u64), Status> {
        let state = self.initialized(channel)?;

        if state.mode.as_ref().map(Mode::kind) != Some(kind) {
            return Err(Status::ILLOPERATION);
        }

        state.received.pop_front().ok_or(Status::QRCVEMPTY)
    }

    fn queue(&mut self, channel: u16, frame: Frame) -> Status {
        let capacity = self.transmit_capacity;
        let clock = self.clock;
        let state = match self.initialized(channel) {
            Ok(state) => state,
            Err(status) => return status,
        };

        if state.mode.as_ref().map(Mode::kind) != Some(frame.kind()) {
            return Status::ILLOPERATION;
        }

        if state.state(Parameter::ListenOnly) {
            return Status::ILLOPERATION;
        }

        if state.bus_status.is_bus_off() {
            return state.bus_status;
        }

        if state.transmitted.len() >= capacity {
            return Status::QXMTFULL;
        }

        if state.state(Parameter::AllowEchoFrames) {
            state.received.push_back((echo(frame), clock));
        }

        state.transmitted.push_back(frame);
        Status::OK
    }

    fn get_channel_value(&self, channel: u16, parameter: Parameter) -> Result<Value, Status> {
        let Some(state) = self.channels.get(&channel) else {
            return match parameter {
                Parameter::ChannelCondition => Ok(Value::U32(ChannelCondition::Unavailable as u32)),
                _ => Err(Status::ILLHW),
            };
        };

        let features = state.features();
        let value = match parameter {
            Parameter::ChannelCondition => {
                let condition = if state.is_initialized() {
                    ChannelCondition::Occupied
                } else {
                    ChannelCondition::Available
                };
                Value::U32(condition as u32)
            }
            Parameter::DeviceId => Value::U32(state.info.device_id),
            Parameter::ControllerNumber => Value::U32(state.info.controller_number as u32),
            Parameter::ChannelFeatures => Value::U32(state.info.device_features),
            Parameter::HardwareName => Value::Text(state.info.name()),
            Parameter::ChannelVersion | Parameter::FirmwareVersion => Value::Text(state.version.clone()),
            Parameter::DeviceGuid => Value::Text(state.device_guid.clone()),
            Parameter::IpAddress | Parameter::LanChannelDirection if state.info.device() != Some(Device::Lan) => {
                return Err(Status::ILLPARAMTYPE)
            }
            Parameter::IpAddress => Value::Text(state.ip_address.clone()),
            Parameter::LanChannelDirection => Value::U32(LanDirection::ReadWrite as u32),
            Parameter::IoDigitalConfiguration | Parameter::IoDigitalValue | Parameter::IoAnalogValue
                if !features.io_capable() =>
            {
                return Err(Status::ILLPARAMTYPE)
            }
            Parameter::InterframeDelay if !features.delay_capable() => return Err(Status::ILLPARAMTYPE),
            Parameter::MessageFilter => Value::U32(state.filter.state as u32),
            Parameter::AcceptanceFilter11Bit => Value::U64(state.acceptance(FilterMode::Standard).value()),
            Parameter::AcceptanceFilter29Bit => Value::U64(state.acceptance(FilterMode::Extended).value()),
            Parameter::AllowStatusFrames
            | Parameter::AllowRtrFrames
            | Parameter::AllowErrorFrames
            | Parameter::AllowEchoFrames
            | Parameter::ListenOnly
            | Parameter::BusOffAutoReset => Value::U32(ParameterState::from(state.state(parameter)) as u32),
            Parameter::BitrateInfoBtr
            | Parameter::BitrateInfoFd
            | Parameter::BitrateInfoXl
            | Parameter::BitrateInfoCc
            | Parameter::BusSpeedNominal
            | Parameter::BusSpeedFd
            | Parameter::BusSpeedXl => bit_rate_value(state.mode.as_ref().ok_or(Status::INITIALIZE)?, parameter)?,
            _ => stored(&state.values, parameter),
        };

        Ok(value)
    }

    fn set_channel_value(&mut self, channel: u16, parameter: Parameter, value: Value) -> Status {
        let Some(state) = self.channels.get_mut(&channel) else {
            return Status::ILLHW;
        };

        let features = state.features();
        let unsupported = match parameter {
            Parameter::IoDigitalConfiguration
            | Parameter::IoDigitalValue
            | Parameter::IoDigitalSet
            | Parameter::IoDigitalClear => !features.io_capable(),
            Parameter::InterframeDelay => !features.delay_capable(),
            _ => false,
        };
        if unsupported {
            return Status::ILLPARAMTYPE;
        }

        match (parameter, value) {
            (Parameter::DeviceId, Value::U32(id)) => state.info.device_id = id,
            (Parameter::ControllerNumber, Value::U32(number)) => {
                state.info.controller_number = match u8::try_from(number) {
                    Ok(number) => number,
                    Err(_) => return Status::ILLPARAMVAL,
                }
            }
            (Parameter::MessageFilter, Value::U32(value)) => match FilterState::from_raw(value) {
                Some(filter @ (FilterState::Close | FilterState::Open)) => {
                    if !state.is_initialized() {
                        return Status::INITIALIZE;
                    }
                    state.filter = RangeFilter {
                        state: filter,
                        ranges: Vec::new(),
                    };
                }
                _ => return Status::ILLPARAMVAL,
            },
            (Parameter::AcceptanceFilter11Bit | Parameter::AcceptanceFilter29Bit, Value::U64(value)) => {
                let (mode, index) = match parameter {
                    Parameter::AcceptanceFilter11Bit => (FilterMode::Standard, 0),
                    _ => (FilterMode::Extended, 1),
                };
                if !state.is_initialized() {
                    return Status::INITIALIZE;
                }
                match AcceptanceFilter::from_value(value, mode) {
                    Some(filter) => state.acceptance[index] = filter,
                    None => return Status::ILLPARAMVAL,
                }
            }
            (_, Value::U32(value)) if is_switch(parameter) => {
                if ParameterState::from_raw(value).is_none() {
                    return Status::ILLPARAMVAL;
                }
                // listen-only is the one switch usable before initialization
                if parameter != Parameter::ListenOnly && !state.is_initialized() {
                    return Status::INITIALIZE;
                }
                state.values.insert(parameter.raw(), value.to_ne_bytes().to_vec());
            }
            (_, value) => {
                state.values.insert(parameter.raw(), value.encode());
            }
        }

        trace!("{} {parameter} set", Channel::from_handle(channel));
        Status::OK
    }

    fn get_global_value(&self, parameter: Parameter) -> Result<Value, Status> {
        let value = match parameter {
            Parameter::ApiVersion => Value::Text(SIMULATED_API_VERSION.to_string()),
            Parameter::AttachedChannelsCount => Value::U32(self.channels.len() as u32),
            Parameter::AttachedChannels => Value::Channels(self.channel_list()),
            Parameter::LanServiceStatus => Value::U32(ServiceStatus::Stopped as u32),
            _ => stored(&self.values, parameter),
        };

        Ok(value)
    }

    fn set_global_value(&mut self, parameter: Parameter, value: Value) -> Status {
        match (parameter, value) {
            (Parameter::LogText, Value::Text(text)) => self.log_lines.push(text),
            (Parameter::LogStatus, Value::U32(value)) if ParameterState::from_raw(value).is_none() => {
                return Status::ILLPARAMVAL
            }
            (_, value) => {
                self.values.insert(parameter.raw(), value.encode());
            }
        }

        Status::OK
    }

    fn channel_list(&self) -> Vec<ChannelInformation> {
        self.channels
            .values()
            .map(|state| {
                let mut info = state.info;
                info.channel_condition = if state.is_initialized() {
                    ChannelCondition::Occupied as u32
                } else {
                    ChannelCondition::Available as u32
                };
                info
            })
            .collect()
    }
}

/// Checks the caller's buffer length before decoding a value to set
fn decode_value(kind: ValueKind, buffer: &[u8]) -> Result<Value, Status> {
    let valid = match (kind, kind.buffer_len()) {
        (ValueKind::ChannelList, _) | (_, None) => return Err(Status::ILLPARAMTYPE),
        (ValueKind::Text, Some(length)) => !buffer.is_empty() && buffer.len() <= length,
        (_, Some(length)) => buffer.len() == length,
    };

    if !valid {
        return Err(Status::ILLPARAMVAL);
    }

    Ok(Value::decode(kind, buffer))
}

/// Copies a value into the caller's buffer, checking its length against the kind
fn write_value(value: &Value, buffer: &mut [u8]) -> Status {
    let bytes = value.encode();

    let fits = match value {
        Value::Text(_) => !buffer.is_empty() && bytes.len() <= buffer.len(),
        Value::Channels(_) => {
            !buffer.is_empty() && bytes.len() <= buffer.len() && buffer.len() % ChannelInformation::SIZE == 0
        }
        _ => bytes.len() == buffer.len(),
    };
    if !fits {
        return Status::ILLPARAMVAL;
    }

    if let Value::Channels(_) = value {
        buffer.fill(0);
    }

    buffer[..bytes.len()].copy_from_slice(&bytes);
    Status::OK
}

fn fixed<const N: usize>(buffer: &[u8]) -> Result<[u8; N], Status> {
    buffer.try_into().map_err(|_| Status::ILLPARAMVAL)
}

/// Stored value of a generic parameter, zero or empty if never set
fn stored(values: &BTreeMap<u8, Vec<u8>>, parameter: Parameter) -> Value {
    let bytes = values.get(&parameter.raw()).map(Vec::as_slice).unwrap_or_default();

    match parameter.kind() {
        ValueKind::Text => Value::Text(decode_text(bytes)),
        ValueKind::U64 => Value::U64(fixed(bytes).map(u64::from_ne_bytes).unwrap_or_default()),
        ValueKind::Handle => Value::Handle(fixed(bytes).map(usize::from_ne_bytes).unwrap_or_default()),
        _ => Value::U32(fixed(bytes).map(u32::from_ne_bytes).unwrap_or_default()),
    }
}

/// Parameters accepting only [ParameterState] values
fn is_switch(parameter: Parameter) -> bool {
    matches!(
        parameter,
        Parameter::ListenOnly
            | Parameter::BusOffAutoReset
            | Parameter::AllowStatusFrames
            | Parameter::AllowRtrFrames
            | Parameter::AllowErrorFrames
            | Parameter::AllowEchoFrames
            | Parameter::ReceiveStatus
            | Parameter::TraceStatus
            | Parameter::ChannelIdentifying
            | Parameter::BitrateAdapting
            | Parameter::HardResetStatus
            | Parameter::FiveVoltsPower
    )
}

/// Bit rate information derived from the initialization
fn bit_rate_value(mode: &Mode, parameter: Parameter) -> Result<Value, Status> {
    let speed = |clock: u64, brp: u32, tseg1: u32, tseg2: u32| -> u32 {
        let quanta = brp as u64 * (1 + tseg1 as u64 + tseg2 as u64);
        clock.checked_div(quanta).unwrap_or(0) as u32
    };

    let value = match (mode, parameter) {
        (Mode::Classic(baudrate), Parameter::BitrateInfoBtr) => Value::U32(baudrate.btr0btr1() as u32),
        (Mode::Classic(baudrate), Parameter::BusSpeedNominal) => Value::U32(baudrate.bits_per_second()),
        (Mode::Fd(_, text), Parameter::BitrateInfoFd) => Value::Text(text.clone()),
        (Mode::Fd(bitrate, _), Parameter::BusSpeedNominal) => Value::U32(speed(
            bitrate.clock.hz(),
            bitrate.nom_brp,
            bitrate.nom_tseg1,
            bitrate.nom_tseg2,
        )),
        (Mode::Fd(bitrate, _), Parameter::BusSpeedFd) => Value::U32(speed(
            bitrate.clock.hz(),
            bitrate.data_brp,
            bitrate.data_tseg1,
            bitrate.data_tseg2,
        )),
        (Mode::Xl(_, text), Parameter::BitrateInfoXl) => Value::Text(text.clone()),
        (Mode::Xl(bitrate, _), Parameter::BusSpeedNominal) => Value::U32(speed(
            bitrate.clock.hz(),
            bitrate.brp,
            bitrate.nom_tseg1,
            bitrate.nom_tseg2,
        )),
        (Mode::Xl(bitrate, _), Parameter::BusSpeedFd) => Value::U32(
            bitrate
                .fd
                .map_or(0, |phase| speed(bitrate.clock.hz(), bitrate.brp, phase.tseg1, phase.tseg2)),
        ),
        (Mode::Xl(bitrate, _), Parameter::BusSpeedXl) => Value::U32(
            bitrate
                .xl
                .map_or(0, |phase| speed(bitrate.clock.hz(), bitrate.brp, phase.tseg1, phase.tseg2)),
        ),
        _ => return Err(Status::ILLPARAMTYPE),
    };

    Ok(value)
}

/// Copy of a transmitted frame flagged as echo
fn echo(frame: Frame) -> Frame {
    match frame {
        Frame::Classic(mut message) => {
            message.msg_type |= MESSAGE_ECHO;
            Frame::Classic(message)
        }
        Frame::Fd(mut message) => {
            message.msg_type |= MESSAGE_ECHO;
            Frame::Fd(message)
        }
        Frame::Xl(mut message) => {
            message.msg_type |= MESSAGE_ECHO as u16;
            Frame::Xl(message)
        }
    }
}

fn valid_id(id: u32, extended: bool) -> bool {
    if extended {
        id <= MAX_VALUE_EXTENDED_ID
    } else {
        id <= MAX_VALUE_STANDARD_ID
    }
}

fn valid_classic(message: &Message) -> bool {
    valid_id(message.id, message.message_type().extended()) && message.len as usize <= MAX_LENGTH_DATA_CLASSIC
}

fn valid_fd(message: &MessageFd) -> bool {
    let message_type = message.message_type();
    let max_dlc = if message_type.fd() { DLC::SixtyFour } else { DLC::Eight };

    valid_id(message.id, message_type.extended()) && message.dlc <= max_dlc.code()
}

fn valid_xl(message: &MessageXl) -> bool {
    if message.is_xl() {
        return message.pid <= MAX_VALUE_PRIORITY_ID && (message.dlc as usize) < MAX_LENGTH_DATA_XL;
    }

    let message_type = message.message_type();
    let max_dlc = if message_type.fd() { DLC::SixtyFour } else { DLC::Eight };
    valid_id(message.pid, message_type.extended()) && message.dlc <= max_dlc.code() as u16
}

/// English description of a single condition
fn describe(name: &str) -> &'static str {
    match name {
        "XMTFULL" => "Transmit buffer in CAN controller is full",
        "OVERRUN" => "CAN controller was read too late",
        "BUSLIGHT" => "Bus error: an error counter reached the 'light' limit",
        "BUSHEAVY" => "Bus error: an error counter reached the 'heavy' limit",
        "BUSOFF" => "Bus error: the CAN controller is in bus-off state",
        "QRCVEMPTY" => "Receive queue is empty",
        "QOVERRUN" => "Receive queue was read too late",
        "QXMTFULL" => "Transmit queue is full",
        "REGTEST" => "Test of the CAN controller hardware registers failed (no hardware found)",
        "NODRIVER" => "Driver not loaded",
        "HWINUSE" => "Hardware already in use by a Net",
        "NETINUSE" => "A Client is already connected to the Net",
        "ILLHW" => "Hardware handle is invalid",
        "ILLNET" => "Net handle is invalid",
        "ILLCLIENT" => "Client handle is invalid",
        "RESOURCE" => "Resource (FIFO, Client, timeout) cannot be created",
        "ILLPARAMTYPE" => "Invalid parameter",
        "ILLPARAMVAL" => "Invalid parameter value",
        "ILLDATA" => "Invalid data, function, or action",
        "BUSPASSIVE" => "Bus error: the CAN controller is error passive",
        "ILLMODE" => "Driver object state is wrong for the attempted operation",
        "CAUTION" => "An operation was successfully carried out, however, irregularities were registered",
        "INITIALIZE" => "Channel is not initialized",
        "ILLOPERATION" => "Invalid operation",
        _ => "Unknown error",
    }
}

fn error_text(error: Status) -> String {
    if error.is_ok() {
        return "No error".to_string();
    }

    let mut text = String::new();
    for name in error.names() {
        if !text.is_empty() {
            text.push_str("; ");
        }
        text.push_str(describe(name));
    }

    if text.is_empty() {
        text.push_str(describe(""));
    }

    // room for the NUL terminator
    let mut end = text.len().min(MAX_LENGTH_VERSION_STRING - 1);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);

    text
}

impl NativeDriver for SimulatedDriver {
    fn initialize(&mut self, channel: u16, btr0btr1: u16) -> u32 {
        match Baudrate::from_btr0btr1(btr0btr1) {
            Some(baudrate) => self.open(channel, Mode::Classic(baudrate)).bits(),
            None => Status::ILLPARAMVAL.bits(),
        }
    }

    fn initialize_fd(&mut self, channel: u16, bitrate: &str) -> u32 {
        match BitrateFd::from_str(bitrate) {
            Ok(parsed) => self.open(channel, Mode::Fd(parsed, bitrate.to_string())).bits(),
            Err(_) => Status::ILLPARAMVAL.bits(),
        }
    }

    fn initialize_xl(&mut self, channel: u16, bitrate: &str) -> u32 {
        match BitrateXl::from_str(bitrate) {
            Ok(parsed) => self.open(channel, Mode::Xl(parsed, bitrate.to_string())).bits(),
            Err(_) => Status::ILLPARAMVAL.bits(),
        }
    }

    fn uninitialize(&mut self, channel: u16) -> u32 {
        if Channel::from_handle(channel).is_none() {
            trace!("Releasing all channels");
            self.channels.values_mut().for_each(SimulatedChannel::release);
            return Status::OK.bits();
        }

        match self.initialized(channel) {
            Ok(state) => {
                state.release();
                Status::OK.bits()
            }
            Err(status) => status.bits(),
        }
    }

    fn reset(&mut self, channel: u16) -> u32 {
        match self.initialized(channel) {
            Ok(state) => {
                state.received.clear();
                state.transmitted.clear();
                state.bus_status = Status::OK;
                Status::OK.bits()
            }
            Err(status) => status.bits(),
        }
    }

    fn get_status(&mut self, channel: u16) -> u32 {
        match self.initialized(channel) {
            Ok(state) => state.bus_status.bits(),
            Err(status) => status.bits(),
        }
    }

    fn read(&mut self, channel: u16, message: &mut Message, timestamp: &mut Timestamp) -> u32 {
        match self.next_frame(channel, FrameKind::Classic) {
            Ok((Frame::Classic(frame), time)) => {
                *message = frame;
                *timestamp = Timestamp::from_micros(time);
                Status::OK.bits()
            }
            Ok(_) => Status::ILLOPERATION.bits(),
            Err(status) => status.bits(),
        }
    }

    fn read_untimed(&mut self, channel: u16, message: &mut Message) -> u32 {
        let mut timestamp = Timestamp::default();
        self.read(channel, message, &mut timestamp)
    }

    fn read_fd(&mut self, channel: u16, message: &mut MessageFd, timestamp: &mut TimestampFd) -> u32 {
        match self.next_frame(channel, FrameKind::Fd) {
            Ok((frame, time)) => {
                *message = match frame {
                    Frame::Classic(classic) => MessageFd::from_classic(&classic),
                    Frame::Fd(fd) => fd,
                    Frame::Xl(_) => return Status::ILLOPERATION.bits(),
                };
                *timestamp = time;
                Status::OK.bits()
            }
            Err(status) => status.bits(),
        }
    }

    fn read_fd_untimed(&mut self, channel: u16, message: &mut MessageFd) -> u32 {
        let mut timestamp = 0;
        self.read_fd(channel, message, &mut timestamp)
    }

    fn read_xl(&mut self, channel: u16, message: &mut MessageXl, timestamp: &mut TimestampXl) -> u32 {
        match self.next_frame(channel, FrameKind::Xl) {
            Ok((frame, time)) => {
                *message = match frame {
                    Frame::Classic(classic) => MessageXl::from(&classic),
                    Frame::Fd(fd) => MessageXl::from(&fd),
                    Frame::Xl(xl) => xl,
                };
                *timestamp = time;
                Status::OK.bits()
            }
            Err(status) => status.bits(),
        }
    }

    fn read_xl_untimed(&mut self, channel: u16, message: &mut MessageXl) -> u32 {
        let mut timestamp = 0;
        self.read_xl(channel, message, &mut timestamp)
    }

    fn write(&mut self, channel: u16, message: &Message) -> u32 {
        if !valid_classic(message) {
            return Status::ILLPARAMVAL.bits();
        }

        self.queue(channel, Frame::Classic(*message)).bits()
    }

    fn write_fd(&mut self, channel: u16, message: &MessageFd) -> u32 {
        if !valid_fd(message) {
            return Status::ILLPARAMVAL.bits();
        }

        self.queue(channel, Frame::Fd(*message)).bits()
    }

    fn write_xl(&mut self, channel: u16, message: &MessageXl) -> u32 {
        if !valid_xl(message) {
            return Status::ILLPARAMVAL.bits();
        }

        self.queue(channel, Frame::Xl(*message)).bits()
    }

    fn filter_messages(&mut self, channel: u16, from_id: u32, to_id: u32, mode: u8) -> u32 {
        let state = match self.initialized(channel) {
            Ok(state) => state,
            Err(status) => return status.bits(),
        };

        let range = FilterMode::from_raw(mode).and_then(|mode| IdRange::new(from_id, to_id, mode));
        match range {
            Some(range) => {
                state.filter.widen(range);
                Status::OK.bits()
            }
            None => Status::ILLPARAMVAL.bits(),
        }
    }

    fn get_value(&mut self, channel: u16, parameter: u8, buffer: &mut [u8]) -> u32 {
        let Some(parameter) = Parameter::from_raw(parameter) else {
            return Status::ILLPARAMTYPE.bits();
        };

        if !parameter.access().readable() {
            return Status::ILLPARAMTYPE.bits();
        }

        let value = if parameter.is_global() {
            self.get_global_value(parameter)
        } else {
            self.get_channel_value(channel, parameter)
        };

        match value {
            Ok(value) => write_value(&value, buffer).bits(),
            Err(status) => status.bits(),
        }
    }

    fn set_value(&mut self, channel: u16, parameter: u8, buffer: &[u8]) -> u32 {
        let Some(parameter) = Parameter::from_raw(parameter) else {
            return Status::ILLPARAMTYPE.bits();
        };

        if parameter.access() == Access::Read {
            return Status::ILLPARAMTYPE.bits();
        }

        let value = match decode_value(parameter.kind(), buffer) {
            Ok(value) => value,
            Err(status) => return status.bits(),
        };

        if parameter.is_global() {
            self.set_global_value(parameter, value).bits()
        } else {
            self.set_channel_value(channel, parameter, value).bits()
        }
    }

    fn get_error_text(&mut self, error: u32, language: u16, buffer: &mut [u8]) -> u32 {
        if buffer.len() < MAX_LENGTH_VERSION_STRING || Language::from_raw(language).is_none() {
            return Status::ILLPARAMVAL.bits();
        }

        write_value(&Value::Text(error_text(Status::from_bits(error))), buffer).bits()
    }

    fn lookup_channel(&mut self, parameters: &str, found: &mut u16) -> u32 {
        let Ok(query) = LookupQuery::from_str(parameters) else {
            return Status::ILLPARAMVAL.bits();
        };

        let channel = self.channels.values().find(|state| {
            query.matches(&state.info)
                && query.ip_address.as_ref().map_or(true, |address| *address == state.ip_address)
                && query.device_guid.as_ref().map_or(true, |guid| guid.eq_ignore_ascii_case(&state.device_guid))
        });

        *found = channel.map_or(Channel::NONEBUS.handle(), |state| state.info.channel_handle);
        Status::OK.bits()
    }
}
