//! Framed radio adapter.
//!
//! Implements [`RadioPort`] by serialising each outbound [`RadioMessage`]
//! with `postcard` into a COBS frame (zero-delimited) and handing it to a
//! [`FrameTransport`].  On hardware the transport is the UART link to the
//! radio bridge; in tests it is a `Vec` of captured frames.
//!
//! ```text
//!   NodeService ──▶ FramedRadio ──postcard+COBS──▶ FrameTransport ──▶ UART
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use crate::app::ports::{ChildKind, ChildSensor, RadioPort};
use crate::error::RadioError;

/// Large enough for the longest presentation frame plus COBS overhead.
pub const MAX_FRAME_LEN: usize = 96;

/// Every message the node sends to its controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RadioMessage<'a> {
    /// Sketch identity, sent once at startup.
    Sketch { name: &'a str, version: &'a str },
    /// One child sensor announcement.
    Present { child_id: u8, kind: ChildKind },
    /// A reading on a child channel with `precision` decimals.
    Set { child_id: u8, value: f32, precision: u8 },
    /// Standardised battery level, 0–100.
    BatteryLevel { percent: u8 },
}

/// Byte-level link that carries whole frames.
pub trait FrameTransport {
    fn send_frame(&mut self, frame: &[u8]) -> Result<(), RadioError>;
}

pub struct FramedRadio<T> {
    transport: T,
    buf: [u8; MAX_FRAME_LEN],
}

impl<T: FrameTransport> FramedRadio<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            buf: [0; MAX_FRAME_LEN],
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn send(&mut self, msg: &RadioMessage<'_>) -> Result<(), RadioError> {
        let frame = postcard::to_slice_cobs(msg, &mut self.buf).map_err(|_| RadioError::Encode)?;
        debug!("Radio: {} byte frame {:?}", frame.len(), msg);
        self.transport.send_frame(frame)
    }
}

impl<T: FrameTransport> RadioPort for FramedRadio<T> {
    fn present(
        &mut self,
        sketch_name: &str,
        sketch_version: &str,
        children: &[ChildSensor],
    ) -> Result<(), RadioError> {
        self.send(&RadioMessage::Sketch {
            name: sketch_name,
            version: sketch_version,
        })?;
        for child in children {
            self.send(&RadioMessage::Present {
                child_id: child.id,
                kind: child.kind,
            })?;
        }
        Ok(())
    }

    fn emit(&mut self, child_id: u8, value: f32, precision: u8) -> Result<(), RadioError> {
        self.send(&RadioMessage::Set {
            child_id,
            value,
            precision,
        })
    }

    fn emit_battery_percent(&mut self, percent: u8) -> Result<(), RadioError> {
        self.send(&RadioMessage::BatteryLevel { percent })
    }
}

// ── UART transport (ESP-IDF) ──────────────────────────────────

#[cfg(target_os = "espidf")]
pub use uart::UartTransport;

#[cfg(target_os = "espidf")]
mod uart {
    use esp_idf_hal::delay::BLOCK;
    use esp_idf_hal::uart::UartDriver;

    use super::FrameTransport;
    use crate::error::RadioError;

    /// Frames written to the radio bridge over UART.
    pub struct UartTransport<'d> {
        uart: UartDriver<'d>,
    }

    impl<'d> UartTransport<'d> {
        pub fn new(uart: UartDriver<'d>) -> Self {
            Self { uart }
        }
    }

    impl FrameTransport for UartTransport<'_> {
        fn send_frame(&mut self, frame: &[u8]) -> Result<(), RadioError> {
            let mut rest = frame;
            while !rest.is_empty() {
                let n = self.uart.write(rest).map_err(|_| RadioError::Transport)?;
                rest = &rest[n..];
            }
            self.uart
                .wait_tx_done(BLOCK)
                .map_err(|_| RadioError::Transport)
        }
    }
}
