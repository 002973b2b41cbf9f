use log::{info, warn};
use pcan_basic::can::{CanController, PcanBasic};
use pcan_basic::channel::Channel;
use pcan_basic::config::{BitrateConfig, Configuration};
use pcan_basic::message::{Frame, FrameKind};
use pcan_basic::native::NativeDriver;
use pcan_basic::parameter::Language;
use pcan_basic::status::Status;
use std::thread;
use std::time::Duration;

/// Polling interval while the receive queue is empty
const IDLE: Duration = Duration::from_millis(10);

pub struct Monitor<D: NativeDriver> {
    pcan: PcanBasic<D>,
    config: Configuration,
}

impl<D: NativeDriver> Monitor<D> {
    pub fn new(pcan: PcanBasic<D>, config: Configuration) -> Self {
        Self { pcan, config }
    }

    pub fn channel(&self) -> Channel {
        self.config.channel
    }

    pub fn driver_mut(&mut self) -> &mut D {
        self.pcan.driver_mut()
    }

    /// Lists attached hardware and brings the configured channel up
    pub fn start(&mut self) -> Result<(), Status> {
        if let Ok(version) = self.pcan.api_version() {
            info!("PCAN-Basic {version}");
        }

        for info in self.pcan.attached_channels()? {
            info!(
                "{}: {} (device {}, {:?})",
                info.channel(),
                info.name(),
                info.device_id,
                info.condition()
            );
        }

        self.pcan.configure(&self.config).inspect_err(|status| self.explain(*status))?;
        info!("Listening on {}", self.config.channel);
        Ok(())
    }

    /// Prints frames until the channel fails
    pub fn run(&mut self) -> Result<(), Status> {
        loop {
            if !self.poll()? {
                thread::sleep(IDLE);
            }
        }
    }

    /// Prints all queued frames
    pub fn drain(&mut self) -> Result<(), Status> {
        while self.poll()? {}
        self.pcan.uninitialize(self.config.channel)
    }

    /// Returns false if the receive queue was empty
    fn poll(&mut self) -> Result<bool, Status> {
        match self.pcan.receive(self.config.channel, self.kind()) {
            Ok((frame, time)) => {
                Self::print(&frame, time.0);
                Ok(true)
            }
            Err(status) if status.is_receive_queue_empty() => Ok(false),
            Err(status) if status.is_bus_error() => {
                warn!("Bus error: {status}");
                Ok(false)
            }
            Err(status) => Err(status),
        }
    }

    fn kind(&self) -> FrameKind {
        match self.config.bit_rate {
            BitrateConfig::Classic(_) => FrameKind::Classic,
            BitrateConfig::Fd(_) => FrameKind::Fd,
            BitrateConfig::Xl(_) => FrameKind::Xl,
        }
    }

    fn print(frame: &Frame, micros: u64) {
        if let Some(status) = frame.carried_status() {
            warn!("{:>12} µs  status {status}", micros);
            return;
        }

        info!("{:>12} µs  {:08X}  {:02X?}", micros, frame.raw_id(), frame.payload());
    }

    fn explain(&mut self, status: Status) {
        if let Ok(text) = self.pcan.get_error_text(status, Language::English) {
            warn!("{text}");
        }
    }
}
