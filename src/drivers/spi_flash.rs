//! External SPI NOR flash probe.
//!
//! Only what the self-test needs: release the chip from deep power-down,
//! check its JEDEC id, and clear the status register so every block is
//! unprotected.

use embedded_hal::spi::{Operation, SpiDevice};

use crate::app::ports::StoragePort;
use crate::error::StorageError;

const CMD_RELEASE_POWER_DOWN: u8 = 0xAB;
const CMD_JEDEC_ID: u8 = 0x9F;
const CMD_WRITE_ENABLE: u8 = 0x06;
const CMD_WRITE_STATUS: u8 = 0x01;

pub struct SpiFlash<SPI> {
    spi: SPI,
    /// Manufacturer byte and first device byte; `0` accepts any part.
    expected_id: u16,
}

impl<SPI: SpiDevice> SpiFlash<SPI> {
    pub fn new(spi: SPI, expected_id: u16) -> Self {
        Self { spi, expected_id }
    }

    pub fn release(self) -> SPI {
        self.spi
    }

    /// Manufacturer id in the high byte, memory type in the low byte.
    pub fn read_jedec_id(&mut self) -> Result<u16, StorageError> {
        let mut id = [0u8; 2];
        self.spi
            .transaction(&mut [Operation::Write(&[CMD_JEDEC_ID]), Operation::Read(&mut id)])
            .map_err(|_| StorageError::Bus)?;
        Ok(u16::from_be_bytes(id))
    }

    fn command(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        self.spi.write(bytes).map_err(|_| StorageError::Bus)
    }
}

impl<SPI: SpiDevice> StoragePort for SpiFlash<SPI> {
    fn initialize(&mut self) -> Result<(), StorageError> {
        self.command(&[CMD_RELEASE_POWER_DOWN])?;

        if self.expected_id != 0 {
            let id = self.read_jedec_id()?;
            if id != self.expected_id {
                return Err(StorageError::UnexpectedJedecId(id));
            }
        }

        self.command(&[CMD_WRITE_ENABLE])?;
        self.command(&[CMD_WRITE_STATUS, 0x00])
    }
}
