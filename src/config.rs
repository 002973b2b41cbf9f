//!# Channel configuration
//! A [Configuration] bundles everything needed to bring a channel up. It can be loaded
//! with any serde format and is applied by [PcanBasic::configure](crate::can::PcanBasic::configure).

use crate::bitrate::{Baudrate, BitrateFd, BitrateXl};
use crate::channel::Channel;
use crate::filter::{AcceptanceFilter, IdRange, MessageFilter};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Entire configuration of one channel
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Channel handle
    pub channel: Channel,

    /// Bit rate, also selecting classic, FD or XL mode
    #[serde(default)]
    pub bit_rate: BitrateConfig,

    /// Set before initialization
    #[serde(default)]
    pub listen_only: bool,

    /// Reset the channel automatically on bus-off
    #[serde(default)]
    pub bus_off_auto_reset: bool,

    /// Reception of special frames, unset flags keep the driver default
    #[serde(default)]
    pub reception: FrameReception,

    /// Applied before the ID ranges
    #[serde(default)]
    pub message_filter: Option<MessageFilter>,

    /// ID ranges registered in order
    #[serde(default)]
    pub filters: Vec<IdRange>,

    /// Code/mask filters, at most one per filter mode takes effect
    #[serde(default)]
    pub acceptance_filters: Vec<AcceptanceFilter>,
}

/// Bit rate of the channel
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitrateConfig {
    /// CAN 2.0 with BTR0/BTR1 value
    Classic(Baudrate),
    /// CAN FD bit-rate string
    Fd(BitrateFd),
    /// CAN XL bit-rate string
    Xl(BitrateXl),
}

impl Default for BitrateConfig {
    fn default() -> Self {
        Self::Classic(Baudrate::Baud500K)
    }
}

/// Reception of echo, status, RTR and error frames
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameReception {
    #[serde(default)]
    pub echo_frames: Option<bool>,
    #[serde(default)]
    pub status_frames: Option<bool>,
    #[serde(default)]
    pub rtr_frames: Option<bool>,
    #[serde(default)]
    pub error_frames: Option<bool>,
}
