//! ATSHA204A crypto-authentication chip, I2C interface (address 0x64).
//!
//! Used by the self-test to prove the chip is fitted and alive: wake it,
//! then read the first 32 bytes of the configuration zone and pick the
//! 9-byte serial number out of it.
//!
//! Every packet is `[count, payload.., crc_lo, crc_hi]` where `count`
//! includes itself and the CRC.  Failures map onto the status codes the
//! vendor library reports, so log lines match what a bench technician
//! expects to see.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::app::ports::IdentityPort;
use crate::error::IdentityStatus;

const ADDRESS: u8 = 0x64;

/// Word-address byte that prefixes a command packet.
const WORD_ADDRESS_COMMAND: u8 = 0x03;
const OPCODE_READ: u8 = 0x02;
/// Zone select: configuration zone, 32-byte read.
const READ_CONFIG_32: u8 = 0x80;

/// `[count, status 0x11 "after wake", crc]`
const WAKE_TOKEN: [u8; 4] = [0x04, 0x11, 0x33, 0x43];

/// SDA must stay high this long after the wake pulse.
const WAKE_DELAY_US: u32 = 2_500;
/// Worst-case execution time of a Read command.
const READ_EXEC_DELAY_US: u32 = 4_000;

const READ_32_RESPONSE_LEN: usize = 35;
const STATUS_RESPONSE_LEN: u8 = 4;

pub struct Atsha204a<I2C, D> {
    i2c: I2C,
    delay: D,
}

impl<I2C: I2c, D: DelayNs> Atsha204a<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self { i2c, delay }
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn send_command(&mut self, opcode: u8, param1: u8, param2: u16) -> Result<(), IdentityStatus> {
        let [p2_lo, p2_hi] = param2.to_le_bytes();
        let mut packet = [WORD_ADDRESS_COMMAND, 7, opcode, param1, p2_lo, p2_hi, 0, 0];
        let crc = crc16(&packet[1..6]);
        packet[6..8].copy_from_slice(&crc);
        self.i2c
            .write(ADDRESS, &packet)
            .map_err(|_| IdentityStatus::COMM_FAIL)
    }

    /// Read a response of `buf.len()` bytes and validate its framing.
    /// Returns the payload slice on success.
    fn receive<'a>(&mut self, buf: &'a mut [u8]) -> Result<&'a [u8], IdentityStatus> {
        self.i2c
            .read(ADDRESS, buf)
            .map_err(|_| IdentityStatus::RX_NO_RESPONSE)?;

        let count = buf[0];
        if count == STATUS_RESPONSE_LEN {
            check_crc(&buf[..4])?;
            return Err(status_from_response(buf[1]));
        }
        if usize::from(count) != buf.len() {
            return Err(IdentityStatus::INVALID_SIZE);
        }
        check_crc(buf)?;
        let end = buf.len() - 2;
        let buf: &'a [u8] = buf;
        Ok(&buf[1..end])
    }
}

impl<I2C: I2c, D: DelayNs> IdentityPort for Atsha204a<I2C, D> {
    fn wake(&mut self) -> Result<(), IdentityStatus> {
        // Addressing 0x00 holds SDA low long enough to count as a wake
        // pulse; nobody acknowledges it.
        let _ = self.i2c.write(0x00, &[0x00]);
        self.delay.delay_us(WAKE_DELAY_US);

        let mut token = [0u8; 4];
        self.i2c
            .read(ADDRESS, &mut token)
            .map_err(|_| IdentityStatus::RX_NO_RESPONSE)?;
        if token == WAKE_TOKEN {
            Ok(())
        } else {
            Err(IdentityStatus::COMM_FAIL)
        }
    }

    fn serial_number(&mut self) -> Result<[u8; 9], IdentityStatus> {
        self.send_command(OPCODE_READ, READ_CONFIG_32, 0)?;
        self.delay.delay_us(READ_EXEC_DELAY_US);

        let mut buf = [0u8; READ_32_RESPONSE_LEN];
        let config = self.receive(&mut buf)?;

        let mut serial = [0u8; 9];
        serial[..4].copy_from_slice(&config[0..4]);
        serial[4..].copy_from_slice(&config[8..13]);
        Ok(serial)
    }
}

/// Map a one-byte status packet to the library's status code.
fn status_from_response(status: u8) -> IdentityStatus {
    match status {
        0x00 => IdentityStatus::SUCCESS,
        0x03 => IdentityStatus::PARSE_ERROR,
        0x0F => IdentityStatus::CMD_FAIL,
        0xFF => IdentityStatus::STATUS_CRC,
        _ => IdentityStatus::RX_FAIL,
    }
}

fn check_crc(packet: &[u8]) -> Result<(), IdentityStatus> {
    let (body, crc) = packet.split_at(packet.len() - 2);
    if crc16(body) == crc {
        Ok(())
    } else {
        Err(IdentityStatus::BAD_CRC)
    }
}

/// CRC-16, polynomial 0x8005, initial value 0, bits fed LSB first.
/// Returned little-endian, as it appears on the wire.
pub fn crc16(data: &[u8]) -> [u8; 2] {
    let mut crc: u16 = 0;
    for &byte in data {
        for bit in 0..8 {
            let data_bit = (byte >> bit) & 1;
            let crc_bit = (crc >> 15) as u8;
            crc <<= 1;
            if data_bit != crc_bit {
                crc ^= 0x8005;
            }
        }
    }
    crc.to_le_bytes()
}

/// Uppercase hex rendering of a serial number.
pub fn serial_hex(serial: &[u8; 9]) -> heapless::String<18> {
    use core::fmt::Write;
    let mut s = heapless::String::new();
    for b in serial {
        // 9 bytes × 2 digits fits exactly.
        let _ = write!(s, "{b:02X}");
    }
    s
}
