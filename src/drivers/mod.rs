//! Peripheral drivers and the status LED.

pub mod atsha204;
pub mod hw_init;
pub mod led_patterns;
pub mod spi_flash;
pub mod status_led;
