use crate::message::{Message, MessageFd, MessageXl, Timestamp, TimestampFd, TimestampXl};
use crate::native::NativeDriver;
use mockall::mock;

mock! {
    pub Driver {}

    impl NativeDriver for Driver {
        fn initialize(&mut self, channel: u16, btr0btr1: u16) -> u32;
        fn initialize_fd(&mut self, channel: u16, bitrate: &str) -> u32;
        fn initialize_xl(&mut self, channel: u16, bitrate: &str) -> u32;
        fn uninitialize(&mut self, channel: u16) -> u32;
        fn reset(&mut self, channel: u16) -> u32;
        fn get_status(&mut self, channel: u16) -> u32;
        fn read(&mut self, channel: u16, message: &mut Message, timestamp: &mut Timestamp) -> u32;
        fn read_untimed(&mut self, channel: u16, message: &mut Message) -> u32;
        fn read_fd(&mut self, channel: u16, message: &mut MessageFd, timestamp: &mut TimestampFd) -> u32;
        fn read_fd_untimed(&mut self, channel: u16, message: &mut MessageFd) -> u32;
        fn read_xl(&mut self, channel: u16, message: &mut MessageXl, timestamp: &mut TimestampXl) -> u32;
        fn read_xl_untimed(&mut self, channel: u16, message: &mut MessageXl) -> u32;
        fn write(&mut self, channel: u16, message: &Message) -> u32;
        fn write_fd(&mut self, channel: u16, message: &MessageFd) -> u32;
        fn write_xl(&mut self, channel: u16, message: &MessageXl) -> u32;
        fn filter_messages(&mut self, channel: u16, from_id: u32, to_id: u32, mode: u8) -> u32;
        fn get_value(&mut self, channel: u16, parameter: u8, buffer: &mut [u8]) -> u32;
        fn set_value(&mut self, channel: u16, parameter: u8, buffer: &[u8]) -> u32;
        fn get_error_text(&mut self, error: u32, language: u16, buffer: &mut [u8]) -> u32;
        fn lookup_channel(&mut self, parameters: &str, found: &mut u16) -> u32;
    }
}
