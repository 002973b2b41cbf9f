use crate::channel::{Channel, Device, MAX_CHANNEL_INDEX};
use alloc::string::ToString;
use alloc::vec::Vec;

#[test]
fn test_handle_values() {
    assert_eq!(0x00, Channel::NONEBUS.handle());

    assert_eq!(0x41, Channel::PCIBUS1.handle());
    assert_eq!(0x48, Channel::PCIBUS8.handle());
    assert_eq!(0x409, Channel::PCIBUS9.handle());
    assert_eq!(0x410, Channel::PCIBUS16.handle());

    assert_eq!(0x51, Channel::USBBUS1.handle());
    assert_eq!(0x58, Channel::USBBUS8.handle());
    assert_eq!(0x509, Channel::USBBUS9.handle());
    assert_eq!(0x510, Channel::USBBUS16.handle());

    assert_eq!(0x801, Channel::LANBUS1.handle());
    assert_eq!(0x808, Channel::LANBUS8.handle());
    assert_eq!(0x809, Channel::LANBUS9.handle());
    assert_eq!(0x810, Channel::LANBUS16.handle());
}

#[test]
fn test_device_values() {
    assert_eq!(0x00, Device::None as u8);
    assert_eq!(0x04, Device::Pci as u8);
    assert_eq!(0x05, Device::Usb as u8);
    assert_eq!(0x08, Device::Lan as u8);
    assert_eq!(Device::None, Device::default());

    assert_eq!(Some(Device::Lan), Device::from_raw(0x08));
    assert_eq!(None, Device::from_raw(0x01));
}

#[test]
fn test_new() {
    assert_eq!(Some(Channel::PCIBUS1), Channel::new(Device::Pci, 1));
    assert_eq!(Some(Channel::PCIBUS9), Channel::new(Device::Pci, 9));
    assert_eq!(Some(Channel::USBBUS8), Channel::new(Device::Usb, 8));
    assert_eq!(Some(Channel::USBBUS16), Channel::new(Device::Usb, 16));
    assert_eq!(Some(Channel::LANBUS1), Channel::new(Device::Lan, 1));
    assert_eq!(Some(Channel::LANBUS12), Channel::new(Device::Lan, 12));

    assert_eq!(None, Channel::new(Device::Usb, 0));
    assert_eq!(None, Channel::new(Device::Usb, MAX_CHANNEL_INDEX + 1));
    assert_eq!(None, Channel::new(Device::None, 1));
}

#[test]
fn test_device_and_index() {
    assert_eq!(Some(Device::Pci), Channel::PCIBUS3.device());
    assert_eq!(3, Channel::PCIBUS3.index());
    assert_eq!(Some(Device::Pci), Channel::PCIBUS14.device());
    assert_eq!(14, Channel::PCIBUS14.index());
    assert_eq!(Some(Device::Usb), Channel::USBBUS5.device());
    assert_eq!(5, Channel::USBBUS5.index());
    assert_eq!(Some(Device::Lan), Channel::LANBUS2.device());
    assert_eq!(2, Channel::LANBUS2.index());

    assert_eq!(None, Channel::NONEBUS.device());
    assert_eq!(0, Channel::NONEBUS.index());
    assert!(Channel::NONEBUS.is_none());
    assert!(!Channel::USBBUS1.is_none());

    assert_eq!(None, Channel::from_handle(0x61).device());
}

#[test]
fn test_all() {
    let channels: Vec<Channel> = Channel::all(Device::Usb).collect();

    assert_eq!(16, channels.len());
    assert_eq!(Channel::USBBUS1, channels[0]);
    assert_eq!(Channel::USBBUS8, channels[7]);
    assert_eq!(Channel::USBBUS9, channels[8]);
    assert_eq!(Channel::USBBUS16, channels[15]);

    assert_eq!(0, Channel::all(Device::None).count());
}

#[test]
fn test_display() {
    assert_eq!("USBBUS10", Channel::USBBUS10.to_string());
    assert_eq!("PCIBUS1", Channel::PCIBUS1.to_string());
    assert_eq!("LANBUS16", Channel::LANBUS16.to_string());
    assert_eq!("NONEBUS", Channel::NONEBUS.to_string());
    assert_eq!("0x61", Channel::from_handle(0x61).to_string());
    assert_eq!("Channel(USBBUS1)", format!("{:?}", Channel::USBBUS1));
}

#[test]
fn test_lookup_names() {
    assert_eq!("pcan_usb", Device::Usb.lookup_name());
    assert_eq!("pcan_pci", Device::Pci.lookup_name());
    assert_eq!("pcan_lan", Device::Lan.lookup_name());
    assert_eq!(Some(Device::Usb), Device::from_lookup_name("PCAN_USB"));
    assert_eq!(None, Device::from_lookup_name("pcan_isa"));
}

#[test]
fn test_conversion() {
    assert_eq!(Channel::USBBUS1, Channel::from(0x51u16));
    assert_eq!(0x51u16, u16::from(Channel::USBBUS1));
    assert_eq!(Channel::NONEBUS, Channel::default());
}
