//!# Native entry points
//! [NativeDriver] mirrors the C ABI of the PCAN-Basic library: one method per exported function,
//! same argument order and widths, raw status return. Pointers become references and slices,
//! so a driver can be substituted in tests (see [SimulatedDriver](crate::simulator::SimulatedDriver)).
//!
//! With the `native` feature, [PcanBasicLibrary] links the vendor library
//! (`PCANBasic.dll`, `libpcanbasic.so` or `libPCBUSB.dylib`).

use crate::message::{Message, MessageFd, MessageXl, Timestamp, TimestampFd, TimestampXl};

/// Raw PCAN-Basic API. Every method returns the native status code.
pub trait NativeDriver {
    /// `CAN_Initialize`. Hardware type, I/O port and interrupt are only relevant for
    /// non-plug-and-play hardware and passed as 0.
    fn initialize(&mut self, channel: u16, btr0btr1: u16) -> u32;

    /// `CAN_InitializeFD`
    fn initialize_fd(&mut self, channel: u16, bitrate: &str) -> u32;

    /// `CAN_InitializeXL`
    fn initialize_xl(&mut self, channel: u16, bitrate: &str) -> u32;

    /// `CAN_Uninitialize`. `PCAN_NONEBUS` releases all channels.
    fn uninitialize(&mut self, channel: u16) -> u32;

    /// `CAN_Reset`. Clears the receive and transmit queues.
    fn reset(&mut self, channel: u16) -> u32;

    /// `CAN_GetStatus`
    fn get_status(&mut self, channel: u16) -> u32;

    /// `CAN_Read`
    fn read(&mut self, channel: u16, message: &mut Message, timestamp: &mut Timestamp) -> u32;

    /// `CAN_Read` with a null timestamp buffer
    fn read_untimed(&mut self, channel: u16, message: &mut Message) -> u32;

    /// `CAN_ReadFD`
    fn read_fd(&mut self, channel: u16, message: &mut MessageFd, timestamp: &mut TimestampFd) -> u32;

    /// `CAN_ReadFD` with a null timestamp buffer
    fn read_fd_untimed(&mut self, channel: u16, message: &mut MessageFd) -> u32;

    /// `CAN_ReadXL`
    fn read_xl(&mut self, channel: u16, message: &mut MessageXl, timestamp: &mut TimestampXl) -> u32;

    /// `CAN_ReadXL` with a null timestamp buffer
    fn read_xl_untimed(&mut self, channel: u16, message: &mut MessageXl) -> u32;

    /// `CAN_Write`
    fn write(&mut self, channel: u16, message: &Message) -> u32;

    /// `CAN_WriteFD`
    fn write_fd(&mut self, channel: u16, message: &MessageFd) -> u32;

    /// `CAN_WriteXL`
    fn write_xl(&mut self, channel: u16, message: &MessageXl) -> u32;

    /// `CAN_FilterMessages`
    fn filter_messages(&mut self, channel: u16, from_id: u32, to_id: u32, mode: u8) -> u32;

    /// `CAN_GetValue`, the slice length is passed as buffer length
    fn get_value(&mut self, channel: u16, parameter: u8, buffer: &mut [u8]) -> u32;

    /// `CAN_SetValue`, the slice length is passed as buffer length
    fn set_value(&mut self, channel: u16, parameter: u8, buffer: &[u8]) -> u32;

    /// `CAN_GetErrorText`, buffer must hold at least 256 bytes
    fn get_error_text(&mut self, error: u32, language: u16, buffer: &mut [u8]) -> u32;

    /// `CAN_LookUpChannel`
    fn lookup_channel(&mut self, parameters: &str, found: &mut u16) -> u32;
}

#[cfg(feature = "native")]
pub use library::PcanBasicLibrary;

#[cfg(feature = "native")]
mod library {
    use super::NativeDriver;
    use crate::message::{Message, MessageFd, MessageXl, Timestamp, TimestampFd, TimestampXl};
    use crate::status::Status;
    use alloc::ffi::CString;
    use core::ffi::{c_char, c_void};
    use log::debug;

    #[allow(non_snake_case)]
    mod ffi {
        use crate::message::{Message, MessageFd, MessageXl, Timestamp};
        use core::ffi::{c_char, c_void};

        #[cfg_attr(windows, link(name = "PCANBasic"))]
        #[cfg_attr(target_os = "linux", link(name = "pcanbasic"))]
        #[cfg_attr(target_os = "macos", link(name = "PCBUSB"))]
        extern "system" {
            pub fn CAN_Initialize(channel: u16, btr0btr1: u16, hw_type: u8, io_port: u32, interrupt: u16) -> u32;
            pub fn CAN_InitializeFD(channel: u16, bitrate_fd: *const c_char) -> u32;
            pub fn CAN_InitializeXL(channel: u16, bitrate_xl: *const c_char) -> u32;
            pub fn CAN_Uninitialize(channel: u16) -> u32;
            pub fn CAN_Reset(channel: u16) -> u32;
            pub fn CAN_GetStatus(channel: u16) -> u32;
            pub fn CAN_Read(channel: u16, message: *mut Message, timestamp: *mut Timestamp) -> u32;
            pub fn CAN_ReadFD(channel: u16, message: *mut MessageFd, timestamp: *mut u64) -> u32;
            pub fn CAN_ReadXL(channel: u16, message: *mut MessageXl, timestamp: *mut u64) -> u32;
            pub fn CAN_Write(channel: u16, message: *const Message) -> u32;
            pub fn CAN_WriteFD(channel: u16, message: *const MessageFd) -> u32;
            pub fn CAN_WriteXL(channel: u16, message: *const MessageXl) -> u32;
            pub fn CAN_FilterMessages(channel: u16, from_id: u32, to_id: u32, mode: u8) -> u32;
            pub fn CAN_GetValue(channel: u16, parameter: u8, buffer: *mut c_void, buffer_length: u32) -> u32;
            pub fn CAN_SetValue(channel: u16, parameter: u8, buffer: *mut c_void, buffer_length: u32) -> u32;
            pub fn CAN_GetErrorText(error: u32, language: u16, buffer: *mut c_char) -> u32;
            pub fn CAN_LookUpChannel(parameters: *mut c_char, found_channel: *mut u16) -> u32;
        }
    }

    /// Converts to a C string, `None` on interior NUL bytes
    fn c_string(value: &str) -> Option<CString> {
        match CString::new(value) {
            Ok(string) => Some(string),
            Err(_) => {
                debug!("String with interior NUL byte rejected: {value:?}");
                None
            }
        }
    }

    /// Vendor library linked at build time
    #[derive(Copy, Clone, Debug, Default)]
    pub struct PcanBasicLibrary;

    impl NativeDriver for PcanBasicLibrary {
        fn initialize(&mut self, channel: u16, btr0btr1: u16) -> u32 {
            unsafe { ffi::CAN_Initialize(channel, btr0btr1, 0, 0, 0) }
        }

        fn initialize_fd(&mut self, channel: u16, bitrate: &str) -> u32 {
            match c_string(bitrate) {
                Some(bitrate) => unsafe { ffi::CAN_InitializeFD(channel, bitrate.as_ptr()) },
                None => Status::ILLPARAMVAL.bits(),
            }
        }

        fn initialize_xl(&mut self, channel: u16, bitrate: &str) -> u32 {
            match c_string(bitrate) {
                Some(bitrate) => unsafe { ffi::CAN_InitializeXL(channel, bitrate.as_ptr()) },
                None => Status::ILLPARAMVAL.bits(),
            }
        }

        fn uninitialize(&mut self, channel: u16) -> u32 {
            unsafe { ffi::CAN_Uninitialize(channel) }
        }

        fn reset(&mut self, channel: u16) -> u32 {
            unsafe { ffi::CAN_Reset(channel) }
        }

        fn get_status(&mut self, channel: u16) -> u32 {
            unsafe { ffi::CAN_GetStatus(channel) }
        }

        fn read(&mut self, channel: u16, message: &mut Message, timestamp: &mut Timestamp) -> u32 {
            unsafe { ffi::CAN_Read(channel, message, timestamp) }
        }

        fn read_untimed(&mut self, channel: u16, message: &mut Message) -> u32 {
            unsafe { ffi::CAN_Read(channel, message, core::ptr::null_mut()) }
        }

        fn read_fd(&mut self, channel: u16, message: &mut MessageFd, timestamp: &mut TimestampFd) -> u32 {
            unsafe { ffi::CAN_ReadFD(channel, message, timestamp) }
        }

        fn read_fd_untimed(&mut self, channel: u16, message: &mut MessageFd) -> u32 {
            unsafe { ffi::CAN_ReadFD(channel, message, core::ptr::null_mut()) }
        }

        fn read_xl(&mut self, channel: u16, message: &mut MessageXl, timestamp: &mut TimestampXl) -> u32 {
            unsafe { ffi::CAN_ReadXL(channel, message, timestamp) }
        }

        fn read_xl_untimed(&mut self, channel: u16, message: &mut MessageXl) -> u32 {
            unsafe { ffi::CAN_ReadXL(channel, message, core::ptr::null_mut()) }
        }

        fn write(&mut self, channel: u16, message: &Message) -> u32 {
            unsafe { ffi::CAN_Write(channel, message) }
        }

        fn write_fd(&mut self, channel: u16, message: &MessageFd) -> u32 {
            unsafe { ffi::CAN_WriteFD(channel, message) }
        }

        fn write_xl(&mut self, channel: u16, message: &MessageXl) -> u32 {
            unsafe { ffi::CAN_WriteXL(channel, message) }
        }

        fn filter_messages(&mut self, channel: u16, from_id: u32, to_id: u32, mode: u8) -> u32 {
            unsafe { ffi::CAN_FilterMessages(channel, from_id, to_id, mode) }
        }

        fn get_value(&mut self, channel: u16, parameter: u8, buffer: &mut [u8]) -> u32 {
            let Ok(length) = u32::try_from(buffer.len()) else {
                return Status::ILLPARAMVAL.bits();
            };

            unsafe { ffi::CAN_GetValue(channel, parameter, buffer.as_mut_ptr() as *mut c_void, length) }
        }

        fn set_value(&mut self, channel: u16, parameter: u8, buffer: &[u8]) -> u32 {
            let Ok(length) = u32::try_from(buffer.len()) else {
                return Status::ILLPARAMVAL.bits();
            };

            // the library reads only, the C prototype is not const
            unsafe { ffi::CAN_SetValue(channel, parameter, buffer.as_ptr() as *mut c_void, length) }
        }

        fn get_error_text(&mut self, error: u32, language: u16, buffer: &mut [u8]) -> u32 {
            if buffer.len() < crate::parameter::MAX_LENGTH_VERSION_STRING {
                return Status::ILLPARAMVAL.bits();
            }

            unsafe { ffi::CAN_GetErrorText(error, language, buffer.as_mut_ptr() as *mut c_char) }
        }

        fn lookup_channel(&mut self, parameters: &str, found: &mut u16) -> u32 {
            match c_string(parameters) {
                Some(parameters) => {
                    let mut bytes = parameters.into_bytes_with_nul();
                    unsafe { ffi::CAN_LookUpChannel(bytes.as_mut_ptr() as *mut c_char, found) }
                }
                None => Status::ILLPARAMVAL.bits(),
            }
        }
    }
}
