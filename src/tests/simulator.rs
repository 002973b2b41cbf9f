use crate::bitrate::{Baudrate, BitrateFd, BitrateXl};
use crate::can::{CanController, PcanBasic};
use crate::channel::{Channel, Device};
use crate::filter::{AcceptanceFilter, FilterMode, IdRange, MessageFilter};
use crate::lookup::LookupQuery;
use crate::message::{Frame, FrameKind, Message, MessageFd, MessageXl, MESSAGE_ERRFRAME};
use crate::native::NativeDriver;
use crate::parameter::{
    ChannelCondition, ChannelFeatures, ChannelInformation, FilterState, LanDirection, Language, Parameter,
    ServiceStatus, Value,
};
use crate::simulator::{SimulatedDriver, SIMULATED_API_VERSION};
use crate::status::Status;
use alloc::string::String;
use embedded_can::{ExtendedId, Id, StandardId};
use embedded_time::duration::Microseconds;

const FD_BITRATE: &str = "f_clock_mhz=80,nom_brp=10,nom_tseg1=12,nom_tseg2=3,nom_sjw=1,\
                          data_brp=4,data_tseg1=7,data_tseg2=2,data_sjw=1";

const XL_BITRATE: &str = "f_clock_mhz=160,brp=2,nom_tseg1=127,nom_tseg2=32,nom_sjw=32,\
                          fd_tseg1=31,fd_tseg2=8,fd_sjw=8,fd_ssp_offset=32,\
                          xl_tseg1=11,xl_tseg2=4,xl_sjw=4,xl_ssp_offset=12,\
                          xl_pwm_offset=1,xl_pwm_short=2,xl_pwm_long=3,\
                          xl_transceiver_mode_switch=1,xl_error_signaling=1";

fn standard(id: u16, data: &[u8]) -> Message {
    Message::new(Id::Standard(StandardId::new(id).unwrap()), data).unwrap()
}

fn extended(id: u32, data: &[u8]) -> Message {
    Message::new(Id::Extended(ExtendedId::new(id).unwrap()), data).unwrap()
}

/// USB channel 1 attached and initialized with 500 kBit/s
fn initialized() -> PcanBasic<SimulatedDriver> {
    let mut driver = SimulatedDriver::default();
    driver.attach(Channel::USBBUS1, "PCAN-USB", 1);

    let mut pcan = PcanBasic::new(driver);
    pcan.initialize(Channel::USBBUS1, Baudrate::Baud500K).unwrap();
    pcan
}

#[test]
fn test_initialize_unattached() {
    let mut pcan = PcanBasic::new(SimulatedDriver::default());

    assert_eq!(Err(Status::ILLHW), pcan.initialize(Channel::USBBUS1, Baudrate::Baud500K));
    assert_eq!(
        Err(Status::ILLHW),
        pcan.initialize_fd_str(Channel::USBBUS1, FD_BITRATE)
    );
}

#[test]
fn test_initialize_twice() {
    let mut pcan = initialized();

    assert_eq!(Err(Status::RESOURCE), pcan.initialize(Channel::USBBUS1, Baudrate::Baud500K));
    assert_eq!(Ok(()), pcan.uninitialize(Channel::USBBUS1));
    assert_eq!(Ok(()), pcan.initialize(Channel::USBBUS1, Baudrate::Baud1M));
}

#[test]
fn test_not_initialized() {
    let mut driver = SimulatedDriver::default();
    driver.attach(Channel::USBBUS1, "PCAN-USB", 1);
    let mut pcan = PcanBasic::new(driver);

    assert_eq!(Err(Status::INITIALIZE), pcan.read(Channel::USBBUS1));
    assert_eq!(Err(Status::INITIALIZE), pcan.write(Channel::USBBUS1, &standard(0x1, &[])));
    assert_eq!(Err(Status::INITIALIZE), pcan.reset(Channel::USBBUS1));
    assert_eq!(Err(Status::INITIALIZE), pcan.uninitialize(Channel::USBBUS1));
    assert!(pcan.get_status(Channel::USBBUS1).is_not_initialized());
    assert_eq!(
        Err(Status::INITIALIZE),
        pcan.filter_messages(Channel::USBBUS1, IdRange::single(0x1, FilterMode::Standard).unwrap())
    );
    assert_eq!(Err(Status::INITIALIZE), pcan.bus_speed_nominal(Channel::USBBUS1));
    assert_eq!(Err(Status::INITIALIZE), pcan.set_allow_echo_frames(Channel::USBBUS1, true));
    assert!(!pcan.driver_mut().deliver(Channel::USBBUS1, Frame::Classic(standard(0x1, &[]))));
}

#[test]
fn test_initialize_unsupported_mode() {
    let mut driver = SimulatedDriver::default();
    driver
        .attach(Channel::USBBUS1, "PCAN-USB", 1)
        .set_features(Channel::USBBUS1, ChannelFeatures::from_raw(0));
    driver.attach(Channel::USBBUS2, "PCAN-USB FD", 2);
    let mut pcan = PcanBasic::new(driver);

    assert_eq!(
        Err(Status::ILLOPERATION),
        pcan.initialize_fd_str(Channel::USBBUS1, FD_BITRATE)
    );
    assert_eq!(
        Err(Status::ILLOPERATION),
        pcan.initialize_xl_str(Channel::USBBUS2, XL_BITRATE)
    );
    assert_eq!(Ok(()), pcan.initialize_fd_str(Channel::USBBUS2, FD_BITRATE));
}

#[test]
fn test_initialize_invalid_bitrate() {
    let mut driver = SimulatedDriver::default();
    driver.attach(Channel::USBBUS1, "PCAN-USB FD", 1);

    assert_eq!(Status::ILLPARAMVAL.bits(), driver.initialize(0x51, 0x1234));
    assert_eq!(Status::ILLPARAMVAL.bits(), driver.initialize_fd(0x51, "f_clock=80000000"));
    assert_eq!(Status::ILLPARAMVAL.bits(), driver.initialize_xl(0x51, FD_BITRATE));
}

#[test]
fn test_transmit_and_receive() {
    let mut pcan = initialized();
    let message = extended(0x1ABC_DEF0, &[0xDE, 0xAD]);

    assert_eq!(Ok(()), pcan.write(Channel::USBBUS1, &message));
    assert_eq!(
        vec![Frame::Classic(message)],
        pcan.driver_mut().take_transmitted(Channel::USBBUS1)
    );
    assert!(pcan.driver().transmitted(Channel::USBBUS1).is_empty());

    pcan.driver_mut().advance_clock(Microseconds(4_321u64));
    assert!(pcan.driver_mut().deliver(Channel::USBBUS1, Frame::Classic(message)));
    assert_eq!(1, pcan.driver().pending(Channel::USBBUS1));

    let (frame, time) = pcan.receive(Channel::USBBUS1, FrameKind::Classic).unwrap();
    assert_eq!(Frame::Classic(message), frame);
    assert_eq!(Microseconds(4_321u64), time);
    assert!(pcan.read_untimed(Channel::USBBUS1).unwrap_err().is_receive_queue_empty());
}

#[test]
fn test_write_invalid_message() {
    let mut pcan = initialized();
    let message = Message {
        id: 0x800,
        ..Message::default()
    };

    assert_eq!(Err(Status::ILLPARAMVAL), pcan.write(Channel::USBBUS1, &message));

    let message = Message {
        id: 0x1,
        len: 9,
        ..Message::default()
    };
    assert_eq!(Err(Status::ILLPARAMVAL), pcan.write(Channel::USBBUS1, &message));
}

#[test]
fn test_wrong_entry_point() {
    let mut pcan = initialized();
    let fd = MessageFd::from_classic(&standard(0x1, &[1]));

    assert_eq!(Err(Status::ILLOPERATION), pcan.read_fd(Channel::USBBUS1));
    assert_eq!(Err(Status::ILLOPERATION), pcan.write_fd(Channel::USBBUS1, &fd));
    assert!(!pcan.driver_mut().deliver(Channel::USBBUS1, Frame::Fd(fd)));
}

#[test]
fn test_transmit_queue_full() {
    let mut driver = SimulatedDriver::new(2);
    driver.attach(Channel::USBBUS1, "PCAN-USB", 1);
    let mut pcan = PcanBasic::new(driver);
    pcan.initialize(Channel::USBBUS1, Baudrate::Baud125K).unwrap();

    let message = standard(0x10, &[1, 2]);
    assert_eq!(Ok(()), pcan.write(Channel::USBBUS1, &message));
    assert_eq!(Ok(()), pcan.write(Channel::USBBUS1, &message));
    assert!(pcan.write(Channel::USBBUS1, &message).unwrap_err().is_transmit_queue_full());

    assert_eq!(2, pcan.driver_mut().take_transmitted(Channel::USBBUS1).len());
    assert_eq!(Ok(()), pcan.write(Channel::USBBUS1, &message));
}

#[test]
fn test_echo_frames() {
    let mut pcan = initialized();
    pcan.set_allow_echo_frames(Channel::USBBUS1, true).unwrap();

    let message = standard(0x42, &[7]);
    pcan.write(Channel::USBBUS1, &message).unwrap();

    let echo = pcan.read_untimed(Channel::USBBUS1).unwrap();
    assert!(echo.message_type().echo());
    assert_eq!(0x42, echo.id);
    assert_eq!(&[7], echo.payload());

    let transmitted = pcan.driver().transmitted(Channel::USBBUS1);
    assert_eq!(vec![Frame::Classic(message)], transmitted);
}

#[test]
fn test_listen_only() {
    let mut driver = SimulatedDriver::default();
    driver.attach(Channel::USBBUS1, "PCAN-USB", 1);
    let mut pcan = PcanBasic::new(driver);

    assert_eq!(Ok(()), pcan.set_listen_only(Channel::USBBUS1, true));
    pcan.initialize(Channel::USBBUS1, Baudrate::Baud500K).unwrap();

    assert_eq!(
        Err(Status::ILLOPERATION),
        pcan.write(Channel::USBBUS1, &standard(0x1, &[]))
    );
    assert!(pcan.driver_mut().deliver(Channel::USBBUS1, Frame::Classic(standard(0x1, &[]))));
    assert_eq!(Ok(Value::U32(1)), pcan.get_value(Channel::USBBUS1, Parameter::ListenOnly));
}

#[test]
fn test_bus_off() {
    let mut pcan = initialized();
    pcan.driver_mut().inject_status(Channel::USBBUS1, Status::BUSOFF);

    assert!(pcan.get_status(Channel::USBBUS1).is_bus_off());
    assert_eq!(Err(Status::BUSOFF), pcan.write(Channel::USBBUS1, &standard(0x1, &[])));

    let status_message = pcan.read_untimed(Channel::USBBUS1).unwrap();
    assert!(status_message.message_type().status());
    assert_eq!(Some(Status::BUSOFF), status_message.carried_status());

    assert_eq!(Ok(()), pcan.reset(Channel::USBBUS1));
    assert!(pcan.get_status(Channel::USBBUS1).is_ok());
    assert_eq!(Ok(()), pcan.write(Channel::USBBUS1, &standard(0x1, &[])));
}

#[test]
fn test_status_frames_disabled() {
    let mut pcan = initialized();
    pcan.set_allow_status_frames(Channel::USBBUS1, false).unwrap();
    pcan.driver_mut().inject_status(Channel::USBBUS1, Status::BUSPASSIVE);

    assert!(pcan.get_status(Channel::USBBUS1).is_bus_passive());
    assert_eq!(0, pcan.driver().pending(Channel::USBBUS1));
}

#[test]
fn test_reset_clears_queues() {
    let mut pcan = initialized();
    pcan.write(Channel::USBBUS1, &standard(0x1, &[])).unwrap();
    pcan.driver_mut().deliver(Channel::USBBUS1, Frame::Classic(standard(0x2, &[])));

    assert_eq!(Ok(()), pcan.reset(Channel::USBBUS1));
    assert!(pcan.driver().transmitted(Channel::USBBUS1).is_empty());
    assert_eq!(0, pcan.driver().pending(Channel::USBBUS1));
}

#[test]
fn test_range_filter() {
    let mut pcan = initialized();
    assert_eq!(Ok(FilterState::Open), pcan.message_filter(Channel::USBBUS1));

    pcan.filter_messages(Channel::USBBUS1, IdRange::new(0x100, 0x1FF, FilterMode::Standard).unwrap())
        .unwrap();
    assert_eq!(Ok(FilterState::Custom), pcan.message_filter(Channel::USBBUS1));

    let driver = pcan.driver_mut();
    assert!(driver.deliver(Channel::USBBUS1, Frame::Classic(standard(0x150, &[]))));
    assert!(!driver.deliver(Channel::USBBUS1, Frame::Classic(standard(0x250, &[]))));
    assert!(!driver.deliver(Channel::USBBUS1, Frame::Classic(extended(0x150, &[]))));

    pcan.set_filter(Channel::USBBUS1, IdRange::single(0x300, FilterMode::Standard).unwrap())
        .unwrap();
    assert!(pcan.driver_mut().deliver(Channel::USBBUS1, Frame::Classic(standard(0x300, &[]))));
    assert!(pcan.driver_mut().deliver(Channel::USBBUS1, Frame::Classic(standard(0x1FF, &[]))));

    pcan.set_message_filter(Channel::USBBUS1, MessageFilter::Close).unwrap();
    assert_eq!(Ok(FilterState::Close), pcan.message_filter(Channel::USBBUS1));
    assert!(!pcan.driver_mut().deliver(Channel::USBBUS1, Frame::Classic(standard(0x150, &[]))));

    pcan.set_message_filter(Channel::USBBUS1, MessageFilter::Open).unwrap();
    assert!(pcan.driver_mut().deliver(Channel::USBBUS1, Frame::Classic(extended(0x1234, &[]))));
}

#[test]
fn test_custom_filter_state_not_settable() {
    let mut pcan = initialized();

    assert_eq!(
        Err(Status::ILLPARAMVAL),
        pcan.set_u32(Channel::USBBUS1, Parameter::MessageFilter, FilterState::Custom as u32)
    );
}

#[test]
fn test_acceptance_filter() {
    let mut pcan = initialized();
    assert_eq!(
        Ok(AcceptanceFilter::open(FilterMode::Standard)),
        pcan.acceptance_filter(Channel::USBBUS1, FilterMode::Standard)
    );

    pcan.set_acceptance_filter_11bit(Channel::USBBUS1, 0x100, 0x00F).unwrap();
    assert_eq!(
        Ok(AcceptanceFilter::new(0x100, 0x00F, FilterMode::Standard).unwrap()),
        pcan.acceptance_filter(Channel::USBBUS1, FilterMode::Standard)
    );

    let driver = pcan.driver_mut();
    assert!(driver.deliver(Channel::USBBUS1, Frame::Classic(standard(0x10F, &[]))));
    assert!(!driver.deliver(Channel::USBBUS1, Frame::Classic(standard(0x110, &[]))));
    assert!(driver.deliver(Channel::USBBUS1, Frame::Classic(extended(0x110, &[]))));
}

#[test]
fn test_acceptance_filter_invalid_value() {
    let mut pcan = initialized();

    assert_eq!(
        Err(Status::ILLPARAMVAL),
        pcan.set_u64(Channel::USBBUS1, Parameter::AcceptanceFilter11Bit, 0x0000_0800_0000_0000)
    );
}

#[test]
fn test_rtr_and_error_frames() {
    let mut pcan = initialized();
    let remote = Message::new_remote(Id::Standard(StandardId::new(0x20).unwrap()), 2).unwrap();
    let error = Message {
        msg_type: MESSAGE_ERRFRAME,
        len: 4,
        ..Message::default()
    };

    assert!(pcan.driver_mut().deliver(Channel::USBBUS1, Frame::Classic(remote)));
    assert!(!pcan.driver_mut().deliver(Channel::USBBUS1, Frame::Classic(error)));

    pcan.set_allow_rtr_frames(Channel::USBBUS1, false).unwrap();
    pcan.set_allow_error_frames(Channel::USBBUS1, true).unwrap();

    assert!(!pcan.driver_mut().deliver(Channel::USBBUS1, Frame::Classic(remote)));
    assert!(pcan.driver_mut().deliver(Channel::USBBUS1, Frame::Classic(error)));
}

#[test]
fn test_fd_channel() {
    let mut driver = SimulatedDriver::default();
    driver.attach(Channel::USBBUS2, "PCAN-USB FD", 1);
    let mut pcan = PcanBasic::new(driver);
    pcan.initialize_fd(Channel::USBBUS2, &FD_BITRATE.parse().unwrap()).unwrap();

    assert_eq!(Ok(500_000), pcan.bus_speed_nominal(Channel::USBBUS2));
    assert_eq!(Ok(2_000_000), pcan.bus_speed_fd(Channel::USBBUS2));
    assert_eq!(Ok(FD_BITRATE.parse::<BitrateFd>().unwrap()), pcan.bitrate_info_fd(Channel::USBBUS2));
    assert_eq!(Err(Status::ILLPARAMTYPE), pcan.bus_speed_xl(Channel::USBBUS2));

    let classic = standard(0x33, &[1, 2, 3]);
    pcan.driver_mut().advance_clock(Microseconds(2_000u64));
    assert!(pcan.driver_mut().deliver(Channel::USBBUS2, Frame::Classic(classic)));

    let (message, timestamp) = pcan.read_fd(Channel::USBBUS2).unwrap();
    assert_eq!(MessageFd::from_classic(&classic), message);
    assert_eq!(2_000, timestamp);
    assert_eq!(Err(Status::ILLOPERATION), pcan.read(Channel::USBBUS2));
}

#[test]
fn test_xl_channel() {
    let mut driver = SimulatedDriver::default();
    driver.attach(Channel::USBBUS3, "PCAN-USB XL", 1).set_features(
        Channel::USBBUS3,
        ChannelFeatures::from_raw(ChannelFeatures::FD_CAPABLE | ChannelFeatures::XL_CAPABLE),
    );
    let mut pcan = PcanBasic::new(driver);
    pcan.initialize_xl_str(Channel::USBBUS3, XL_BITRATE).unwrap();

    assert_eq!(Ok(500_000), pcan.bus_speed_nominal(Channel::USBBUS3));
    assert_eq!(Ok(2_000_000), pcan.bus_speed_fd(Channel::USBBUS3));
    assert_eq!(Ok(5_000_000), pcan.bus_speed_xl(Channel::USBBUS3));
    assert_eq!(
        Ok(XL_BITRATE.parse::<BitrateXl>().unwrap()),
        pcan.bitrate_info_xl(Channel::USBBUS3)
    );

    let message = MessageXl::new(0x10, 1, 2, 0xAF, &[5; 100]).unwrap();
    pcan.write_xl(Channel::USBBUS3, &message).unwrap();
    assert_eq!(vec![Frame::Xl(message)], pcan.driver().transmitted(Channel::USBBUS3));

    let classic = standard(0x7, &[1]);
    pcan.driver_mut().deliver(Channel::USBBUS3, Frame::Classic(classic));
    assert_eq!(Ok(MessageXl::from(&classic)), pcan.read_xl_untimed(Channel::USBBUS3));
}

#[test]
fn test_classic_bit_rate_information() {
    let mut pcan = initialized();

    assert_eq!(
        Ok(Baudrate::Baud500K.btr0btr1() as u32),
        pcan.get_u32(Channel::USBBUS1, Parameter::BitrateInfoBtr)
    );
    assert_eq!(Ok(500_000), pcan.bus_speed_nominal(Channel::USBBUS1));
    assert_eq!(Err(Status::ILLPARAMTYPE), pcan.bitrate_info_fd(Channel::USBBUS1));
}

#[test]
fn test_channel_parameters() {
    let mut pcan = initialized();
    let channel = Channel::USBBUS1;

    pcan.set_device_id(channel, 0xABCD).unwrap();
    assert_eq!(Ok(0xABCD), pcan.device_id(channel));

    pcan.set_u32(channel, Parameter::ControllerNumber, 1).unwrap();
    assert_eq!(Ok(Value::U32(1)), pcan.get_value(channel, Parameter::ControllerNumber));
    assert_eq!(
        Err(Status::ILLPARAMVAL),
        pcan.set_u32(channel, Parameter::ControllerNumber, 0x100)
    );

    pcan.set_trace_location(channel, "/tmp/traces").unwrap();
    assert_eq!(Ok(String::from("/tmp/traces")), pcan.get_text(channel, Parameter::TraceLocation));

    pcan.set_trace_size(channel, 10).unwrap();
    assert_eq!(Ok(10), pcan.get_u32(channel, Parameter::TraceSize));

    pcan.set_handle(channel, Parameter::ReceiveEvent, 0x1234).unwrap();
    assert_eq!(Ok(0x1234), pcan.get_handle(channel, Parameter::ReceiveEvent));

    pcan.set_bus_off_auto_reset(channel, true).unwrap();
    assert_eq!(Ok(1), pcan.get_u32(channel, Parameter::BusOffAutoReset));
    assert_eq!(Err(Status::ILLPARAMVAL), pcan.set_u32(channel, Parameter::BusOffAutoReset, 2));

    assert_eq!(Ok(String::from("PCAN-USB")), pcan.hardware_name(channel));
    assert_eq!(Ok(String::new()), pcan.channel_version(channel));
}

#[test]
fn test_switch_requires_initialization() {
    let mut driver = SimulatedDriver::default();
    driver.attach(Channel::USBBUS1, "PCAN-USB", 1);
    let mut pcan = PcanBasic::new(driver);

    assert_eq!(
        Err(Status::INITIALIZE),
        pcan.set_bus_off_auto_reset(Channel::USBBUS1, true)
    );
    assert_eq!(Ok(()), pcan.set_device_id(Channel::USBBUS1, 4));
}

#[test]
fn test_global_parameters() {
    let mut pcan = PcanBasic::new(SimulatedDriver::default());

    assert_eq!(Ok(String::from(SIMULATED_API_VERSION)), pcan.api_version());
    assert_eq!(Ok(ServiceStatus::Stopped), pcan.lan_service_status());

    pcan.log_text("first").unwrap();
    pcan.log_text("second").unwrap();
    assert_eq!(
        &[String::from("first"), String::from("second")],
        pcan.driver().log_lines()
    );

    pcan.set_log_location("/var/log/pcan").unwrap();
    assert_eq!(
        Ok(String::from("/var/log/pcan")),
        pcan.get_text(Channel::NONEBUS, Parameter::LogLocation)
    );

    pcan.set_log_status(true).unwrap();
    assert_eq!(Ok(1), pcan.get_u32(Channel::NONEBUS, Parameter::LogStatus));
    assert_eq!(
        Err(Status::ILLPARAMVAL),
        pcan.set_u32(Channel::NONEBUS, Parameter::LogStatus, 5)
    );
}

#[test]
fn test_lan_parameters() {
    let mut driver = SimulatedDriver::default();
    driver
        .attach(Channel::LANBUS1, "PCAN-Ethernet Gateway", 1)
        .set_ip_address(Channel::LANBUS1, "192.168.1.10");
    driver.attach(Channel::USBBUS1, "PCAN-USB", 2);
    let mut pcan = PcanBasic::new(driver);

    assert_eq!(Ok(String::from("192.168.1.10")), pcan.ip_address(Channel::LANBUS1));
    assert_eq!(Ok(LanDirection::ReadWrite), pcan.lan_channel_direction(Channel::LANBUS1));
    assert_eq!(Err(Status::ILLPARAMTYPE), pcan.ip_address(Channel::USBBUS1));
    assert_eq!(Err(Status::ILLPARAMTYPE), pcan.lan_channel_direction(Channel::USBBUS1));
}

#[test]
fn test_io_parameters() {
    let mut driver = SimulatedDriver::default();
    driver.attach(Channel::USBBUS1, "PCAN-USB", 1);
    driver.attach(Channel::USBBUS2, "PCAN-USB Pro FD", 2).set_features(
        Channel::USBBUS2,
        ChannelFeatures::from_raw(ChannelFeatures::FD_CAPABLE | ChannelFeatures::IO_CAPABLE),
    );
    let mut pcan = PcanBasic::new(driver);

    assert_eq!(
        Err(Status::ILLPARAMTYPE),
        pcan.get_u32(Channel::USBBUS1, Parameter::IoDigitalConfiguration)
    );
    assert_eq!(
        Err(Status::ILLPARAMTYPE),
        pcan.set_u32(Channel::USBBUS1, Parameter::IoDigitalSet, 1)
    );
    assert_eq!(
        Err(Status::ILLPARAMTYPE),
        pcan.get_u32(Channel::USBBUS1, Parameter::InterframeDelay)
    );

    pcan.set_u32(Channel::USBBUS2, Parameter::IoDigitalConfiguration, 0x0F).unwrap();
    assert_eq!(Ok(0x0F), pcan.get_u32(Channel::USBBUS2, Parameter::IoDigitalConfiguration));
}

#[test]
fn test_channel_condition() {
    let mut driver = SimulatedDriver::default();
    driver.attach(Channel::USBBUS1, "PCAN-USB", 1);
    let mut pcan = PcanBasic::new(driver);

    assert_eq!(Ok(ChannelCondition::Available), pcan.channel_condition(Channel::USBBUS1));
    pcan.initialize(Channel::USBBUS1, Baudrate::Baud500K).unwrap();
    assert_eq!(Ok(ChannelCondition::Occupied), pcan.channel_condition(Channel::USBBUS1));
    assert_eq!(Ok(ChannelCondition::Unavailable), pcan.channel_condition(Channel::PCIBUS1));
    assert_eq!(Err(Status::ILLHW), pcan.device_id(Channel::PCIBUS1));

    pcan.driver_mut().detach(Channel::USBBUS1);
    assert_eq!(Ok(ChannelCondition::Unavailable), pcan.channel_condition(Channel::USBBUS1));
}

#[test]
fn test_attached_channels() {
    let mut driver = SimulatedDriver::default();
    driver.attach(Channel::USBBUS1, "PCAN-USB FD", 1);
    driver.attach(Channel::PCIBUS1, "PCAN-PCI", 7);
    let mut pcan = PcanBasic::new(driver);
    pcan.initialize(Channel::USBBUS1, Baudrate::Baud500K).unwrap();

    let channels = pcan.attached_channels().unwrap();
    assert_eq!(2, channels.len());

    assert_eq!(Channel::PCIBUS1, channels[0].channel());
    assert_eq!(Some(Device::Pci), channels[0].device());
    assert_eq!("PCAN-PCI", channels[0].name());
    assert_eq!(7, channels[0].device_id);
    assert_eq!(Some(ChannelCondition::Available), channels[0].condition());

    assert_eq!(Channel::USBBUS1, channels[1].channel());
    assert_eq!(Some(ChannelCondition::Occupied), channels[1].condition());
    assert!(channels[1].features().fd_capable());
}

#[test]
fn test_attached_channels_buffer() {
    let mut driver = SimulatedDriver::default();
    driver.attach(Channel::USBBUS1, "PCAN-USB", 1);
    driver.attach(Channel::USBBUS2, "PCAN-USB", 2);

    let mut small = [0u8; ChannelInformation::SIZE];
    assert_eq!(Status::ILLPARAMVAL.bits(), driver.get_value(0, 0x2B, &mut small));

    let mut large = [0xFFu8; 3 * ChannelInformation::SIZE];
    assert_eq!(Status::OK.bits(), driver.get_value(0, 0x2B, &mut large));
    assert_eq!(0x52, ChannelInformation::from_bytes(&large[ChannelInformation::SIZE..]).unwrap().channel_handle);
    assert!(large[2 * ChannelInformation::SIZE..].iter().all(|byte| *byte == 0));

    let mut odd = [0u8; 2 * ChannelInformation::SIZE + 1];
    assert_eq!(Status::ILLPARAMVAL.bits(), driver.get_value(0, 0x2B, &mut odd));

    let mut pcan = PcanBasic::new(driver);
    let mut channels = [ChannelInformation::default(); 1];
    assert_eq!(Err(Status::ILLPARAMVAL), pcan.attached_channels_into(&mut channels));
}

#[test]
fn test_attached_channels_none() {
    let mut pcan = PcanBasic::new(SimulatedDriver::default());
    assert_eq!(Ok(vec![]), pcan.attached_channels());
}

#[test]
fn test_buffer_length_checked() {
    let mut driver = SimulatedDriver::default();
    driver.attach(Channel::USBBUS1, "PCAN-USB", 1);

    assert_eq!(Status::ILLPARAMVAL.bits(), driver.set_value(0x51, 0x01, &[1, 2]));
    assert_eq!(Status::ILLPARAMVAL.bits(), driver.get_value(0x51, 0x01, &mut [0u8; 8]));
    assert_eq!(Status::ILLPARAMVAL.bits(), driver.set_value(0x00, 0x0C, &[]));
    assert_eq!(Status::ILLPARAMTYPE.bits(), driver.get_value(0x51, 0x99, &mut [0u8; 4]));
    assert_eq!(Status::ILLPARAMTYPE.bits(), driver.set_value(0x51, 0x0D, &[0u8; 4]));
    assert_eq!(Status::ILLPARAMTYPE.bits(), driver.get_value(0x00, 0x0C, &mut [0u8; 16]));
}

#[test]
fn test_lookup_channel() {
    let mut driver = SimulatedDriver::default();
    driver.attach(Channel::USBBUS1, "PCAN-USB", 5);
    driver
        .attach(Channel::USBBUS2, "PCAN-USB", 5)
        .set_controller_number(Channel::USBBUS2, 1)
        .set_device_guid(Channel::USBBUS2, "3f2504e0-4f89-11d3-9a0c-0305e82c3301");
    driver
        .attach(Channel::LANBUS1, "PCAN-Ethernet Gateway", 9)
        .set_ip_address(Channel::LANBUS1, "10.0.0.2");
    let mut pcan = PcanBasic::new(driver);

    let query = LookupQuery::new().device_type(Device::Usb).device_id(5);
    assert_eq!(Ok(Some(Channel::USBBUS1)), pcan.lookup_channel(&query));

    let query = query.controller_number(1);
    assert_eq!(Ok(Some(Channel::USBBUS2)), pcan.lookup_channel(&query));

    let query = LookupQuery::new().device_guid("3F2504E0-4F89-11D3-9A0C-0305E82C3301");
    assert_eq!(Ok(Some(Channel::USBBUS2)), pcan.lookup_channel(&query));

    assert_eq!(Ok(Some(Channel::LANBUS1)), pcan.lookup_channel_str("ipaddress=10.0.0.2"));
    assert_eq!(Ok(None), pcan.lookup_channel_str("devicetype=pcan_pci"));
}

#[test]
fn test_error_text() {
    let mut pcan = PcanBasic::new(SimulatedDriver::default());

    assert_eq!(
        Ok(String::from("No error")),
        pcan.get_error_text(Status::OK, Language::Neutral)
    );
    assert_eq!(
        Ok(String::from("Receive queue is empty")),
        pcan.get_error_text(Status::QRCVEMPTY, Language::English)
    );
    assert_eq!(
        Ok(String::from("Receive queue was read too late; Transmit queue is full")),
        pcan.get_error_text(Status::QOVERRUN | Status::QXMTFULL, Language::German)
    );
}

#[test]
fn test_error_text_combined_status_truncated() {
    let mut pcan = PcanBasic::new(SimulatedDriver::default());
    let status = Status::CAUTION | Status::REGTEST | Status::BUSPASSIVE | Status::ILLMODE;

    let text = pcan.get_error_text(status, Language::English).unwrap();

    assert_eq!(255, text.len());
    assert!(text.starts_with("Test of the CAN controller hardware registers failed (no hardware found); "));
}

#[test]
fn test_error_text_invalid() {
    let mut driver = SimulatedDriver::default();

    assert_eq!(Status::ILLPARAMVAL.bits(), driver.get_error_text(0x20, 0x09, &mut [0u8; 64]));
    assert_eq!(Status::ILLPARAMVAL.bits(), driver.get_error_text(0x20, 0x42, &mut [0u8; 256]));
}

#[test]
fn test_uninitialize_all() {
    let mut driver = SimulatedDriver::default();
    driver.attach(Channel::USBBUS1, "PCAN-USB", 1);
    driver.attach(Channel::USBBUS2, "PCAN-USB", 2);
    let mut pcan = PcanBasic::new(driver);
    pcan.initialize(Channel::USBBUS1, Baudrate::Baud500K).unwrap();
    pcan.initialize(Channel::USBBUS2, Baudrate::Baud500K).unwrap();

    assert_eq!(Ok(()), pcan.uninitialize_all());
    assert_eq!(Ok(ChannelCondition::Available), pcan.channel_condition(Channel::USBBUS1));
    assert_eq!(Ok(ChannelCondition::Available), pcan.channel_condition(Channel::USBBUS2));
    assert_eq!(Err(Status::INITIALIZE), pcan.uninitialize(Channel::USBBUS1));
}

#[test]
fn test_uninitialize_releases_filters() {
    let mut pcan = initialized();
    pcan.set_message_filter(Channel::USBBUS1, MessageFilter::Close).unwrap();
    pcan.uninitialize(Channel::USBBUS1).unwrap();
    pcan.initialize(Channel::USBBUS1, Baudrate::Baud500K).unwrap();

    assert_eq!(Ok(FilterState::Open), pcan.message_filter(Channel::USBBUS1));
}
