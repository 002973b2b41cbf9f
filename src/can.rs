//!# PCAN-Basic API
//! [PcanBasic] wraps a [NativeDriver] with typed arguments and results. Every failing native
//! status is returned unchanged as `Err(Status)`. A lone [Status::CAUTION] counts as success.
//!
//!```
//!# use pcan_basic::can::{CanController, PcanBasic};
//!# use pcan_basic::bitrate::Baudrate;
//!# use pcan_basic::channel::Channel;
//!# use pcan_basic::message::{Frame, FrameKind, Message};
//!# use pcan_basic::simulator::SimulatedDriver;
//!# use embedded_can::{Id, StandardId};
//!#
//! let mut driver = SimulatedDriver::default();
//! driver.attach(Channel::USBBUS1, "PCAN-USB", 0);
//!
//! let mut pcan = PcanBasic::new(driver);
//! pcan.initialize(Channel::USBBUS1, Baudrate::Baud500K).unwrap();
//!
//! let id = Id::Standard(StandardId::new(0x123).unwrap());
//! let message = Message::new(id, &[0xDE, 0xAD]).unwrap();
//! pcan.transmit(Channel::USBBUS1, &Frame::Classic(message)).unwrap();
//!
//! assert_eq!(vec![Frame::Classic(message)], pcan.driver().transmitted(Channel::USBBUS1));
//!
//! // Nothing received yet
//! let status = pcan.receive(Channel::USBBUS1, FrameKind::Classic).unwrap_err();
//! assert!(status.is_receive_queue_empty());
//! ```

use crate::bitrate::{Baudrate, BitrateFd, BitrateXl};
use crate::channel::{Channel, Device};
use crate::config::{BitrateConfig, Configuration};
use crate::filter::{AcceptanceFilter, FilterMode, IdRange, MessageFilter};
use crate::lookup::LookupQuery;
use crate::message::{Frame, FrameKind, Message, MessageFd, MessageXl, Timestamp, TimestampFd, TimestampXl};
use crate::native::NativeDriver;
use crate::parameter::{
    decode_text, Access, ChannelCondition, ChannelFeatures, ChannelInformation, FilterState, Language, LanDirection,
    LogFunction, Parameter, ParameterState, ServiceStatus, TraceFile, Value, ValueKind, MAX_LENGTH_VERSION_STRING,
};
use crate::status::Status;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use byteorder::{ByteOrder, NativeEndian};
use core::str::FromStr;
use embedded_time::duration::Microseconds;
use log::debug;

/// Trait for sending and receiving frames of any format
pub trait CanController {
    type Error;

    /// Writes the frame with the entry point matching its format
    fn transmit(&mut self, channel: Channel, frame: &Frame) -> Result<(), Self::Error>;

    /// Reads the next frame of the given format together with its reception time
    fn receive(&mut self, channel: Channel, kind: FrameKind) -> Result<(Frame, Microseconds<u64>), Self::Error>;

    /// Widens the reception filter by the given range
    fn set_filter(&mut self, channel: Channel, range: IdRange) -> Result<(), Self::Error>;
}

impl<D: NativeDriver> CanController for PcanBasic<D> {
    type Error = Status;

    fn transmit(&mut self, channel: Channel, frame: &Frame) -> Result<(), Status> {
        match frame {
            Frame::Classic(message) => self.write(channel, message),
            Frame::Fd(message) => self.write_fd(channel, message),
            Frame::Xl(message) => self.write_xl(channel, message),
        }
    }

    fn receive(&mut self, channel: Channel, kind: FrameKind) -> Result<(Frame, Microseconds<u64>), Status> {
        match kind {
            FrameKind::Classic => {
                let (message, timestamp) = self.read(channel)?;
                Ok((Frame::Classic(message), timestamp.as_duration()))
            }
            FrameKind::Fd => {
                let (message, timestamp) = self.read_fd(channel)?;
                Ok((Frame::Fd(message), Microseconds(timestamp)))
            }
            FrameKind::Xl => {
                let (message, timestamp) = self.read_xl(channel)?;
                Ok((Frame::Xl(message), Microseconds(timestamp)))
            }
        }
    }

    fn set_filter(&mut self, channel: Channel, range: IdRange) -> Result<(), Status> {
        self.filter_messages(channel, range)
    }
}

/// Typed PCAN-Basic API over a native driver
#[derive(Debug, Default)]
pub struct PcanBasic<D: NativeDriver> {
    driver: D,
}

impl<D: NativeDriver> PcanBasic<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn into_inner(self) -> D {
        self.driver
    }

    /// Initializes a classic channel
    pub fn initialize(&mut self, channel: Channel, baudrate: Baudrate) -> Result<(), Status> {
        let status = self.driver.initialize(channel.handle(), baudrate.btr0btr1());
        Self::check("CAN_Initialize", channel, status)
    }

    /// Initializes an FD channel
    pub fn initialize_fd(&mut self, channel: Channel, bitrate: &BitrateFd) -> Result<(), Status> {
        let status = self.driver.initialize_fd(channel.handle(), &bitrate.to_string());
        Self::check("CAN_InitializeFD", channel, status)
    }

    /// Initializes an FD channel with a bit-rate string. Incomplete or malformed strings are
    /// rejected with [Status::ILLPARAMVAL] before reaching the driver, valid ones are passed as is.
    pub fn initialize_fd_str(&mut self, channel: Channel, bitrate: &str) -> Result<(), Status> {
        if let Err(error) = BitrateFd::from_str(bitrate) {
            debug!("Invalid FD bit rate for {channel}: {error}");
            return Err(Status::ILLPARAMVAL);
        }

        let status = self.driver.initialize_fd(channel.handle(), bitrate);
        Self::check("CAN_InitializeFD", channel, status)
    }

    /// Initializes an XL channel
    pub fn initialize_xl(&mut self, channel: Channel, bitrate: &BitrateXl) -> Result<(), Status> {
        let status = self.driver.initialize_xl(channel.handle(), &bitrate.to_string());
        Self::check("CAN_InitializeXL", channel, status)
    }

    /// Initializes an XL channel with a bit-rate string, validated like [PcanBasic::initialize_fd_str]
    pub fn initialize_xl_str(&mut self, channel: Channel, bitrate: &str) -> Result<(), Status> {
        if let Err(error) = BitrateXl::from_str(bitrate) {
            debug!("Invalid XL bit rate for {channel}: {error}");
            return Err(Status::ILLPARAMVAL);
        }

        let status = self.driver.initialize_xl(channel.handle(), bitrate);
        Self::check("CAN_InitializeXL", channel, status)
    }

    pub fn uninitialize(&mut self, channel: Channel) -> Result<(), Status> {
        let status = self.driver.uninitialize(channel.handle());
        Self::check("CAN_Uninitialize", channel, status)
    }

    /// Releases every channel initialized by this process
    pub fn uninitialize_all(&mut self) -> Result<(), Status> {
        self.uninitialize(Channel::NONEBUS)
    }

    /// Clears the receive and transmit queues. The hardware is not touched.
    pub fn reset(&mut self, channel: Channel) -> Result<(), Status> {
        let status = self.driver.reset(channel.handle());
        Self::check("CAN_Reset", channel, status)
    }

    /// Current bus status, e.g. [Status::BUSOFF]. Returned as value, not as error.
    pub fn get_status(&mut self, channel: Channel) -> Status {
        Status::from_bits(self.driver.get_status(channel.handle()))
    }

    /// Reads the next classic message. An empty queue fails with [Status::QRCVEMPTY].
    pub fn read(&mut self, channel: Channel) -> Result<(Message, Timestamp), Status> {
        let mut message = Message::default();
        let mut timestamp = Timestamp::default();

        let status = self.driver.read(channel.handle(), &mut message, &mut timestamp);
        Self::check("CAN_Read", channel, status)?;

        Ok((message, timestamp))
    }

    pub fn read_untimed(&mut self, channel: Channel) -> Result<Message, Status> {
        let mut message = Message::default();

        let status = self.driver.read_untimed(channel.handle(), &mut message);
        Self::check("CAN_Read", channel, status)?;

        Ok(message)
    }

    pub fn read_fd(&mut self, channel: Channel) -> Result<(MessageFd, TimestampFd), Status> {
        let mut message = MessageFd::default();
        let mut timestamp = 0;

        let status = self.driver.read_fd(channel.handle(), &mut message, &mut timestamp);
        Self::check("CAN_ReadFD", channel, status)?;

        Ok((message, timestamp))
    }

    pub fn read_fd_untimed(&mut self, channel: Channel) -> Result<MessageFd, Status> {
        let mut message = MessageFd::default();

        let status = self.driver.read_fd_untimed(channel.handle(), &mut message);
        Self::check("CAN_ReadFD", channel, status)?;

        Ok(message)
    }

    pub fn read_xl(&mut self, channel: Channel) -> Result<(MessageXl, TimestampXl), Status> {
        let mut message = MessageXl::default();
        let mut timestamp = 0;

        let status = self.driver.read_xl(channel.handle(), &mut message, &mut timestamp);
        Self::check("CAN_ReadXL", channel, status)?;

        Ok((message, timestamp))
    }

    pub fn read_xl_untimed(&mut self, channel: Channel) -> Result<MessageXl, Status> {
        let mut message = MessageXl::default();

        let status = self.driver.read_xl_untimed(channel.handle(), &mut message);
        Self::check("CAN_ReadXL", channel, status)?;

        Ok(message)
    }

    /// Queues a classic message. A full queue fails with [Status::QXMTFULL].
    pub fn write(&mut self, channel: Channel, message: &Message) -> Result<(), Status> {
        let status = self.driver.write(channel.handle(), message);
        Self::check("CAN_Write", channel, status)
    }

    pub fn write_fd(&mut self, channel: Channel, message: &MessageFd) -> Result<(), Status> {
        let status = self.driver.write_fd(channel.handle(), message);
        Self::check("CAN_WriteFD", channel, status)
    }

    pub fn write_xl(&mut self, channel: Channel, message: &MessageXl) -> Result<(), Status> {
        let status = self.driver.write_xl(channel.handle(), message);
        Self::check("CAN_WriteXL", channel, status)
    }

    /// Adds an ID range to the reception filter. Ranges only widen the filter.
    pub fn filter_messages(&mut self, channel: Channel, range: IdRange) -> Result<(), Status> {
        let status = self
            .driver
            .filter_messages(channel.handle(), range.from_id(), range.to_id(), range.mode() as u8);
        Self::check("CAN_FilterMessages", channel, status)
    }

    /// Closes or fully opens the reception filter, dropping all registered ranges
    pub fn set_message_filter(&mut self, channel: Channel, filter: MessageFilter) -> Result<(), Status> {
        self.set_u32(channel, Parameter::MessageFilter, FilterState::from(filter) as u32)
    }

    pub fn message_filter(&mut self, channel: Channel) -> Result<FilterState, Status> {
        let value = self.get_u32(channel, Parameter::MessageFilter)?;
        FilterState::from_raw(value).ok_or_else(|| Self::unexpected(Parameter::MessageFilter, value))
    }

    /// Reads a text parameter
    pub fn get_text(&mut self, channel: Channel, parameter: Parameter) -> Result<String, Status> {
        Self::check_kind(parameter, ValueKind::Text, Access::Read)?;

        let mut buffer = [0u8; MAX_LENGTH_VERSION_STRING];
        self.get_raw(channel, parameter, &mut buffer)?;

        Ok(decode_text(&buffer))
    }

    pub fn get_u32(&mut self, channel: Channel, parameter: Parameter) -> Result<u32, Status> {
        Self::check_kind(parameter, ValueKind::U32, Access::Read)?;

        let mut buffer = [0u8; 4];
        self.get_raw(channel, parameter, &mut buffer)?;

        Ok(NativeEndian::read_u32(&buffer))
    }

    pub fn get_u64(&mut self, channel: Channel, parameter: Parameter) -> Result<u64, Status> {
        Self::check_kind(parameter, ValueKind::U64, Access::Read)?;

        let mut buffer = [0u8; 8];
        self.get_raw(channel, parameter, &mut buffer)?;

        Ok(NativeEndian::read_u64(&buffer))
    }

    /// Reads a pointer sized event handle
    pub fn get_handle(&mut self, channel: Channel, parameter: Parameter) -> Result<usize, Status> {
        Self::check_kind(parameter, ValueKind::Handle, Access::Read)?;

        let mut buffer = [0u8; core::mem::size_of::<usize>()];
        self.get_raw(channel, parameter, &mut buffer)?;

        Ok(usize::from_ne_bytes(buffer))
    }

    /// Writes a text parameter. Text containing NUL or longer than 255 bytes fails with [Status::ILLPARAMVAL].
    pub fn set_text(&mut self, channel: Channel, parameter: Parameter, text: &str) -> Result<(), Status> {
        Self::check_kind(parameter, ValueKind::Text, Access::Write)?;

        if text.contains('\0') || text.len() >= MAX_LENGTH_VERSION_STRING {
            debug!("Text for {parameter} rejected: {} bytes", text.len());
            return Err(Status::ILLPARAMVAL);
        }

        let buffer = Value::Text(String::from(text)).encode();
        self.set_raw(channel, parameter, &buffer)
    }

    pub fn set_u32(&mut self, channel: Channel, parameter: Parameter, value: u32) -> Result<(), Status> {
        Self::check_kind(parameter, ValueKind::U32, Access::Write)?;
        self.set_raw(channel, parameter, &value.to_ne_bytes())
    }

    pub fn set_u64(&mut self, channel: Channel, parameter: Parameter, value: u64) -> Result<(), Status> {
        Self::check_kind(parameter, ValueKind::U64, Access::Write)?;
        self.set_raw(channel, parameter, &value.to_ne_bytes())
    }

    pub fn set_handle(&mut self, channel: Channel, parameter: Parameter, handle: usize) -> Result<(), Status> {
        Self::check_kind(parameter, ValueKind::Handle, Access::Write)?;
        self.set_raw(channel, parameter, &handle.to_ne_bytes())
    }

    /// Reads any readable parameter as [Value]
    pub fn get_value(&mut self, channel: Channel, parameter: Parameter) -> Result<Value, Status> {
        match parameter.kind() {
            ValueKind::Text => self.get_text(channel, parameter).map(Value::Text),
            ValueKind::U32 => self.get_u32(channel, parameter).map(Value::U32),
            ValueKind::U64 => self.get_u64(channel, parameter).map(Value::U64),
            ValueKind::Handle => self.get_handle(channel, parameter).map(Value::Handle),
            ValueKind::ChannelList => self.attached_channels().map(Value::Channels),
        }
    }

    /// Writes any writable parameter. The value must match the kind of the parameter.
    pub fn set_value(&mut self, channel: Channel, parameter: Parameter, value: &Value) -> Result<(), Status> {
        match value {
            Value::Text(text) => self.set_text(channel, parameter, text),
            Value::U32(value) => self.set_u32(channel, parameter, *value),
            Value::U64(value) => self.set_u64(channel, parameter, *value),
            Value::Handle(handle) => self.set_handle(channel, parameter, *handle),
            Value::Channels(_) => {
                debug!("Channel information is read-only, {parameter} not written");
                Err(Status::ILLPARAMTYPE)
            }
        }
    }

    /// Information about all attached channels
    pub fn attached_channels(&mut self) -> Result<Vec<ChannelInformation>, Status> {
        let count = self.get_u32(Channel::NONEBUS, Parameter::AttachedChannelsCount)? as usize;
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut channels = vec![ChannelInformation::default(); count];
        self.attached_channels_into(&mut channels)?;

        Ok(channels)
    }

    /// Fills the given slice with channel information. An empty slice fails with
    /// [Status::ILLPARAMVAL] without calling the driver.
    pub fn attached_channels_into(&mut self, channels: &mut [ChannelInformation]) -> Result<(), Status> {
        if channels.is_empty() {
            debug!("Channel information requested into zero capacity buffer");
            return Err(Status::ILLPARAMVAL);
        }

        let mut buffer = vec![0u8; channels.len() * ChannelInformation::SIZE];
        self.get_raw(Channel::NONEBUS, Parameter::AttachedChannels, &mut buffer)?;

        let entries = buffer.chunks_exact(ChannelInformation::SIZE).filter_map(ChannelInformation::from_bytes);
        for (info, entry) in channels.iter_mut().zip(entries) {
            *info = entry;
        }

        Ok(())
    }

    pub fn channel_condition(&mut self, channel: Channel) -> Result<ChannelCondition, Status> {
        let value = self.get_u32(channel, Parameter::ChannelCondition)?;
        ChannelCondition::from_raw(value).ok_or_else(|| Self::unexpected(Parameter::ChannelCondition, value))
    }

    pub fn channel_features(&mut self, channel: Channel) -> Result<ChannelFeatures, Status> {
        self.get_u32(channel, Parameter::ChannelFeatures).map(ChannelFeatures::from_raw)
    }

    pub fn hardware_name(&mut self, channel: Channel) -> Result<String, Status> {
        self.get_text(channel, Parameter::HardwareName)
    }

    /// Version of the PCAN-Basic library
    pub fn api_version(&mut self) -> Result<String, Status> {
        self.get_text(Channel::NONEBUS, Parameter::ApiVersion)
    }

    pub fn channel_version(&mut self, channel: Channel) -> Result<String, Status> {
        self.get_text(channel, Parameter::ChannelVersion)
    }

    pub fn firmware_version(&mut self, channel: Channel) -> Result<String, Status> {
        self.get_text(channel, Parameter::FirmwareVersion)
    }

    pub fn device_part_number(&mut self, channel: Channel) -> Result<String, Status> {
        self.get_text(channel, Parameter::DevicePartNumber)
    }

    pub fn device_guid(&mut self, channel: Channel) -> Result<String, Status> {
        self.get_text(channel, Parameter::DeviceGuid)
    }

    /// Remote IPv4 address of a LAN channel
    pub fn ip_address(&mut self, channel: Channel) -> Result<String, Status> {
        self.get_text(channel, Parameter::IpAddress)
    }

    pub fn device_id(&mut self, channel: Channel) -> Result<u32, Status> {
        self.get_u32(channel, Parameter::DeviceId)
    }

    pub fn set_device_id(&mut self, channel: Channel, id: u32) -> Result<(), Status> {
        self.set_u32(channel, Parameter::DeviceId, id)
    }

    /// Can be set before initialization
    pub fn set_listen_only(&mut self, channel: Channel, enabled: bool) -> Result<(), Status> {
        self.set_state(channel, Parameter::ListenOnly, enabled)
    }

    pub fn set_bus_off_auto_reset(&mut self, channel: Channel, enabled: bool) -> Result<(), Status> {
        self.set_state(channel, Parameter::BusOffAutoReset, enabled)
    }

    /// Loops transmitted frames back as echo frames
    pub fn set_allow_echo_frames(&mut self, channel: Channel, enabled: bool) -> Result<(), Status> {
        self.set_state(channel, Parameter::AllowEchoFrames, enabled)
    }

    pub fn set_allow_status_frames(&mut self, channel: Channel, enabled: bool) -> Result<(), Status> {
        self.set_state(channel, Parameter::AllowStatusFrames, enabled)
    }

    pub fn set_allow_rtr_frames(&mut self, channel: Channel, enabled: bool) -> Result<(), Status> {
        self.set_state(channel, Parameter::AllowRtrFrames, enabled)
    }

    pub fn set_allow_error_frames(&mut self, channel: Channel, enabled: bool) -> Result<(), Status> {
        self.set_state(channel, Parameter::AllowErrorFrames, enabled)
    }

    /// Blinks the LED of a USB channel
    pub fn identify_channel(&mut self, channel: Channel, enabled: bool) -> Result<(), Status> {
        self.set_state(channel, Parameter::ChannelIdentifying, enabled)
    }

    /// Sets the code/mask filter of the filter's mode
    pub fn set_acceptance_filter(&mut self, channel: Channel, filter: &AcceptanceFilter) -> Result<(), Status> {
        self.set_u64(channel, Self::acceptance_parameter(filter.mode()), filter.value())
    }

    pub fn acceptance_filter(&mut self, channel: Channel, mode: FilterMode) -> Result<AcceptanceFilter, Status> {
        let parameter = Self::acceptance_parameter(mode);
        let value = self.get_u64(channel, parameter)?;

        AcceptanceFilter::from_value(value, mode).ok_or_else(|| {
            debug!("Unexpected value {value:#018X} of {parameter}");
            Status::ILLDATA
        })
    }

    /// Code/mask filter for 11-bit identifiers
    pub fn set_acceptance_filter_11bit(&mut self, channel: Channel, code: u32, mask: u32) -> Result<(), Status> {
        let filter = AcceptanceFilter::new(code, mask, FilterMode::Standard).ok_or(Status::ILLPARAMVAL)?;
        self.set_acceptance_filter(channel, &filter)
    }

    /// Code/mask filter for 29-bit identifiers
    pub fn set_acceptance_filter_29bit(&mut self, channel: Channel, code: u32, mask: u32) -> Result<(), Status> {
        let filter = AcceptanceFilter::new(code, mask, FilterMode::Extended).ok_or(Status::ILLPARAMVAL)?;
        self.set_acceptance_filter(channel, &filter)
    }

    /// Information logged by the library
    pub fn set_log_configuration(&mut self, functions: LogFunction) -> Result<(), Status> {
        self.set_u32(Channel::NONEBUS, Parameter::LogConfigure, functions.bits())
    }

    pub fn set_log_status(&mut self, enabled: bool) -> Result<(), Status> {
        self.set_state(Channel::NONEBUS, Parameter::LogStatus, enabled)
    }

    pub fn set_log_location(&mut self, path: &str) -> Result<(), Status> {
        self.set_text(Channel::NONEBUS, Parameter::LogLocation, path)
    }

    /// Inserts custom text into the library log
    pub fn log_text(&mut self, text: &str) -> Result<(), Status> {
        self.set_text(Channel::NONEBUS, Parameter::LogText, text)
    }

    pub fn set_trace_configuration(&mut self, channel: Channel, mode: TraceFile) -> Result<(), Status> {
        self.set_u32(channel, Parameter::TraceConfigure, mode.bits())
    }

    pub fn set_trace_location(&mut self, channel: Channel, path: &str) -> Result<(), Status> {
        self.set_text(channel, Parameter::TraceLocation, path)
    }

    pub fn set_trace_status(&mut self, channel: Channel, enabled: bool) -> Result<(), Status> {
        self.set_state(channel, Parameter::TraceStatus, enabled)
    }

    /// Maximum trace file size in megabytes
    pub fn set_trace_size(&mut self, channel: Channel, megabytes: u32) -> Result<(), Status> {
        self.set_u32(channel, Parameter::TraceSize, megabytes)
    }

    /// Configured bit rate of an FD channel
    pub fn bitrate_info_fd(&mut self, channel: Channel) -> Result<BitrateFd, Status> {
        let text = self.get_text(channel, Parameter::BitrateInfoFd)?;
        BitrateFd::from_str(&text).map_err(|error| {
            debug!("Unexpected FD bit rate '{text}': {error}");
            Status::ILLDATA
        })
    }

    /// Configured bit rate of an XL channel
    pub fn bitrate_info_xl(&mut self, channel: Channel) -> Result<BitrateXl, Status> {
        let text = self.get_text(channel, Parameter::BitrateInfoXl)?;
        BitrateXl::from_str(&text).map_err(|error| {
            debug!("Unexpected XL bit rate '{text}': {error}");
            Status::ILLDATA
        })
    }

    /// Nominal bus speed in bits per second
    pub fn bus_speed_nominal(&mut self, channel: Channel) -> Result<u32, Status> {
        self.get_u32(channel, Parameter::BusSpeedNominal)
    }

    /// FD data phase speed in bits per second
    pub fn bus_speed_fd(&mut self, channel: Channel) -> Result<u32, Status> {
        self.get_u32(channel, Parameter::BusSpeedFd)
    }

    /// XL data phase speed in bits per second
    pub fn bus_speed_xl(&mut self, channel: Channel) -> Result<u32, Status> {
        self.get_u32(channel, Parameter::BusSpeedXl)
    }

    pub fn lan_channel_direction(&mut self, channel: Channel) -> Result<LanDirection, Status> {
        let value = self.get_u32(channel, Parameter::LanChannelDirection)?;
        LanDirection::from_raw(value).ok_or_else(|| Self::unexpected(Parameter::LanChannelDirection, value))
    }

    pub fn lan_service_status(&mut self) -> Result<ServiceStatus, Status> {
        let value = self.get_u32(Channel::NONEBUS, Parameter::LanServiceStatus)?;
        ServiceStatus::from_raw(value).ok_or_else(|| Self::unexpected(Parameter::LanServiceStatus, value))
    }

    /// Description of a status in the given language
    pub fn get_error_text(&mut self, error: Status, language: Language) -> Result<String, Status> {
        let mut buffer = [0u8; MAX_LENGTH_VERSION_STRING];

        let status = self.driver.get_error_text(error.bits(), language as u16, &mut buffer);
        Self::check("CAN_GetErrorText", Channel::NONEBUS, status)?;

        Ok(decode_text(&buffer))
    }

    /// First channel matching all criteria, `None` if nothing matches
    pub fn lookup_channel(&mut self, query: &LookupQuery) -> Result<Option<Channel>, Status> {
        if query.is_empty() {
            debug!("Channel lookup without criteria");
            return Err(Status::ILLPARAMVAL);
        }

        if query.device_type == Some(Device::None) {
            debug!("Channel lookup for device type pcan_none");
            return Err(Status::ILLPARAMVAL);
        }

        let parameters = query.to_string();
        self.lookup(&parameters)
    }

    /// Lookup with a raw `key=value` string, validated before reaching the driver
    pub fn lookup_channel_str(&mut self, parameters: &str) -> Result<Option<Channel>, Status> {
        if let Err(error) = LookupQuery::from_str(parameters) {
            debug!("Invalid lookup string '{parameters}': {error}");
            return Err(Status::ILLPARAMVAL);
        }

        self.lookup(parameters)
    }

    /// Sets listen-only, initializes with the configured bit rate, then applies
    /// reception settings and filters. Stops at the first failure.
    pub fn configure(&mut self, config: &Configuration) -> Result<(), Status> {
        let channel = config.channel;

        if config.listen_only {
            self.set_listen_only(channel, true)?;
        }

        match &config.bit_rate {
            BitrateConfig::Classic(baudrate) => self.initialize(channel, *baudrate)?,
            BitrateConfig::Fd(bitrate) => self.initialize_fd(channel, bitrate)?,
            BitrateConfig::Xl(bitrate) => self.initialize_xl(channel, bitrate)?,
        }

        if config.bus_off_auto_reset {
            self.set_bus_off_auto_reset(channel, true)?;
        }

        let reception = &config.reception;
        let flags = [
            (Parameter::AllowEchoFrames, reception.echo_frames),
            (Parameter::AllowStatusFrames, reception.status_frames),
            (Parameter::AllowRtrFrames, reception.rtr_frames),
            (Parameter::AllowErrorFrames, reception.error_frames),
        ];
        for (parameter, enabled) in flags {
            if let Some(enabled) = enabled {
                self.set_state(channel, parameter, enabled)?;
            }
        }

        if let Some(filter) = config.message_filter {
            self.set_message_filter(channel, filter)?;
        }

        for range in &config.filters {
            self.filter_messages(channel, *range)?;
        }

        for filter in &config.acceptance_filters {
            self.set_acceptance_filter(channel, filter)?;
        }

        debug!("Channel {channel} configured");
        Ok(())
    }

    fn lookup(&mut self, parameters: &str) -> Result<Option<Channel>, Status> {
        let mut found = Channel::NONEBUS.handle();

        let status = self.driver.lookup_channel(parameters, &mut found);
        Self::check("CAN_LookUpChannel", Channel::NONEBUS, status)?;

        let channel = Channel::from_handle(found);
        Ok((!channel.is_none()).then_some(channel))
    }

    fn set_state(&mut self, channel: Channel, parameter: Parameter, enabled: bool) -> Result<(), Status> {
        self.set_u32(channel, parameter, ParameterState::from(enabled) as u32)
    }

    fn get_raw(&mut self, channel: Channel, parameter: Parameter, buffer: &mut [u8]) -> Result<(), Status> {
        let status = self.driver.get_value(channel.handle(), parameter.raw(), buffer);
        Self::check("CAN_GetValue", channel, status)
    }

    fn set_raw(&mut self, channel: Channel, parameter: Parameter, buffer: &[u8]) -> Result<(), Status> {
        let status = self.driver.set_value(channel.handle(), parameter.raw(), buffer);
        Self::check("CAN_SetValue", channel, status)
    }

    fn acceptance_parameter(mode: FilterMode) -> Parameter {
        match mode {
            FilterMode::Standard => Parameter::AcceptanceFilter11Bit,
            FilterMode::Extended => Parameter::AcceptanceFilter29Bit,
        }
    }

    /// Rejects accessors not matching the declared kind or access of the parameter
    fn check_kind(parameter: Parameter, kind: ValueKind, access: Access) -> Result<(), Status> {
        let permitted = match access {
            Access::Read => parameter.access().readable(),
            Access::Write => parameter.access().writable(),
            Access::ReadWrite => parameter.access() == Access::ReadWrite,
        };

        if parameter.kind() != kind || !permitted {
            debug!(
                "{parameter} is {:?}/{:?}, accessed as {kind:?}/{access:?}",
                parameter.kind(),
                parameter.access()
            );
            return Err(Status::ILLPARAMTYPE);
        }

        Ok(())
    }

    fn unexpected(parameter: Parameter, value: u32) -> Status {
        debug!("Unexpected value {value:#X} of {parameter}");
        Status::ILLDATA
    }

    fn check(function: &str, channel: Channel, status: u32) -> Result<(), Status> {
        Status::from_bits(status).into_result().inspect_err(|status| {
            debug!("{function} on {channel} failed: {status}");
        })
    }
}
