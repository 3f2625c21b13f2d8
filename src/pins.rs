//! GPIO / peripheral pin assignments for the sensor node board.
//!
//! Single source of truth: `main` builds every driver from these numbers
//! rather than hard-coding them at the call site.

// ---------------------------------------------------------------------------
// Boot mode and status
// ---------------------------------------------------------------------------

/// Self-test jumper input.  Internal pull-up; a jumper to GND (logic low at
/// boot) selects the peripheral self-test instead of normal operation.
pub const TEST_PIN_GPIO: i32 = 4;
/// Status LED output (active HIGH).
pub const LED_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// I²C buses
// ---------------------------------------------------------------------------

/// Si7021 temperature/humidity sensor (I2C0).
pub const SENSOR_SDA_GPIO: i32 = 8;
pub const SENSOR_SCL_GPIO: i32 = 9;
/// ATSHA204A identity chip (I2C1).  Kept on its own bus so the wake pulse
/// never disturbs the sensor.
pub const IDENTITY_SDA_GPIO: i32 = 10;
pub const IDENTITY_SCL_GPIO: i32 = 11;
/// I²C clock for both buses.  The identity chip wake pulse relies on the
/// standard-mode bit time.
pub const I2C_BAUD_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// SPI flash
// ---------------------------------------------------------------------------

pub const FLASH_SCLK_GPIO: i32 = 12;
pub const FLASH_MOSI_GPIO: i32 = 13;
pub const FLASH_MISO_GPIO: i32 = 14;
pub const FLASH_CS_GPIO: i32 = 15;
/// Expected JEDEC manufacturer/device id of the fitted flash.
pub const FLASH_JEDEC_ID: u16 = 0x1F65;

// ---------------------------------------------------------------------------
// Supply sense (ADC1)
// ---------------------------------------------------------------------------

/// Battery sense through a 1:2 resistive divider, ADC1 channel 0 (GPIO 1).
pub const VBAT_ADC_CHANNEL: u32 = 0;
/// Full-scale millivolts at the battery terminal (3.3 V reference × 2 divider).
pub const VBAT_FULL_SCALE_MV: i32 = 6600;
/// Maximum raw ADC count at 12-bit resolution.
pub const VBAT_ADC_MAX_RAW: u16 = 4095;

// ---------------------------------------------------------------------------
// Radio bridge (UART)
// ---------------------------------------------------------------------------

pub const RADIO_TX_GPIO: i32 = 17;
pub const RADIO_RX_GPIO: i32 = 18;
pub const RADIO_BAUD: u32 = 115_200;
