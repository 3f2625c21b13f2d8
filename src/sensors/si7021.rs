//! Si7021 relative-humidity and temperature sensor (I2C, address 0x40).
//!
//! Humidity is measured in hold-master mode and CRC-checked; temperature is
//! read back from the conversion the humidity measurement already performed,
//! so one sample costs a single conversion.

use embedded_hal::i2c::I2c;

use crate::app::ports::SensorPort;
use crate::error::SensorError;

use super::MeasurementSample;

const ADDRESS: u8 = 0x40;

const CMD_MEASURE_RH_HOLD: u8 = 0xE5;
const CMD_READ_TEMP_FROM_RH: u8 = 0xE0;
const CMD_READ_ID_2: [u8; 2] = [0xFC, 0xC9];

/// Electronic id byte `SNB_3` of the parts this driver accepts.
const SUPPORTED_IDS: [u8; 3] = [0x0D, 0x14, 0x15];

pub struct Si7021<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Si7021<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Release the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn device_id(&mut self) -> Result<u8, SensorError> {
        let mut buf = [0u8; 6];
        self.i2c
            .write_read(ADDRESS, &CMD_READ_ID_2, &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(buf[0])
    }

    fn humidity_code(&mut self) -> Result<u16, SensorError> {
        let mut buf = [0u8; 3];
        self.i2c
            .write_read(ADDRESS, &[CMD_MEASURE_RH_HOLD], &mut buf)
            .map_err(|_| SensorError::Bus)?;
        if crc8(&buf[..2]) != buf[2] {
            return Err(SensorError::Crc);
        }
        Ok(u16::from_be_bytes([buf[0], buf[1]]))
    }

    fn temperature_code(&mut self) -> Result<u16, SensorError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(ADDRESS, &[CMD_READ_TEMP_FROM_RH], &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(u16::from_be_bytes(buf))
    }
}

impl<I2C: I2c> SensorPort for Si7021<I2C> {
    fn begin(&mut self) -> Result<(), SensorError> {
        let id = self.device_id()?;
        if SUPPORTED_IDS.contains(&id) {
            Ok(())
        } else {
            Err(SensorError::UnknownDevice(id))
        }
    }

    fn read_sample(&mut self) -> Result<MeasurementSample, SensorError> {
        let rh = humidity_from_code(self.humidity_code()?);
        let t = temperature_from_code(self.temperature_code()?);
        Ok(MeasurementSample::new(t, rh))
    }
}

/// %RH = 125 · code / 65536 − 6, clamped to the physical range.
fn humidity_from_code(code: u16) -> f32 {
    (125.0 * code as f32 / 65536.0 - 6.0).clamp(0.0, 100.0)
}

/// °C = 175.72 · code / 65536 − 46.85
fn temperature_from_code(code: u16) -> f32 {
    175.72 * code as f32 / 65536.0 - 46.85
}

/// CRC-8, polynomial x⁸ + x⁵ + x⁴ + 1 (0x31), initial value 0.
fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x31
            } else {
                crc << 1
            };
        }
    }
    crc
}
