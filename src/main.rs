//! Sensenode Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Si7021      SupplyMonitor   FramedRadio     SystemPower       │
//! │  (Sensor)    (Supply)        (Radio/UART)    (Power)           │
//! │  SpiFlash    Atsha204a       LogEventSink    StatusLed         │
//! │  (Storage)   (Identity)      (EventSink)                       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌──────────────────────────┐   ┌──────────────────────────┐   │
//! │  │ NodeService (duty cycle) │   │ SelfTest (probe FSM)     │   │
//! │  └──────────────────────────┘   └──────────────────────────┘   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The test pin picks one of the two inner boxes at boot; neither returns.

use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::spi::{SpiDeviceDriver, SpiDriver, SpiDriverConfig, config::Config as SpiConfig};
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use log::info;

use sensenode::adapters::hardware::{NodeHardware, SelfTestBoard};
use sensenode::adapters::log_sink::LogEventSink;
use sensenode::adapters::power::SystemPower;
use sensenode::adapters::radio::{FramedRadio, UartTransport};
use sensenode::adapters::update::confirm_running_image;
use sensenode::app::self_test::SelfTest;
use sensenode::app::service::{BootMode, NodeService};
use sensenode::config::{NodeConfig, SKETCH_NAME, SKETCH_VERSION};
use sensenode::drivers::atsha204::Atsha204a;
use sensenode::drivers::hw_init::OneshotAdc;
use sensenode::drivers::led_patterns::SignalPatternEngine;
use sensenode::drivers::spi_flash::SpiFlash;
use sensenode::drivers::status_led::StatusLed;
use sensenode::error::Error;
use sensenode::pins;
use sensenode::sensors::si7021::Si7021;
use sensenode::sensors::supply::{Conversion, SupplyMonitor};

/// LED refresh period while showing a steady pattern.
const IDLE_LED_REFRESH_MS: u32 = 1_000;

fn gpio(num: i32) -> AnyIOPin {
    // SAFETY: every number in `pins` is distinct and claimed once, here in main.
    unsafe { AnyIOPin::new(num as _) }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("{} {} (fw {})", SKETCH_NAME, SKETCH_VERSION, env!("CARGO_PKG_VERSION"));
    confirm_running_image();

    let config = NodeConfig::default();
    config.validate().map_err(Error::from)?;
    if let Some(json) = config.to_json() {
        info!("Config: {json}");
    }

    let peripherals = Peripherals::take()?;
    let mut led = StatusLed::new(PinDriver::output(gpio(pins::LED_GPIO))?);
    led.off()?;

    // ── 2. Boot mode ──────────────────────────────────────────
    let mode = {
        let mut test_pin = PinDriver::input(gpio(pins::TEST_PIN_GPIO))?;
        test_pin.set_pull(Pull::Up)?;
        FreeRtos::delay_ms(1);
        BootMode::from_test_pin(&mut test_pin)
    };
    info!("Boot mode: {:?}", mode);

    let sensor_i2c = I2cDriver::new(
        peripherals.i2c0,
        gpio(pins::SENSOR_SDA_GPIO),
        gpio(pins::SENSOR_SCL_GPIO),
        &I2cConfig::new().baudrate(Hertz(pins::I2C_BAUD_HZ)),
    )?;
    let mut sink = LogEventSink::new();

    if mode == BootMode::SelfTest {
        // ── 3a. Self-test: probe, then signal forever ─────────
        let identity_i2c = I2cDriver::new(
            peripherals.i2c1,
            gpio(pins::IDENTITY_SDA_GPIO),
            gpio(pins::IDENTITY_SCL_GPIO),
            &I2cConfig::new().baudrate(Hertz(pins::I2C_BAUD_HZ)),
        )?;
        let spi = SpiDriver::new(
            peripherals.spi2,
            gpio(pins::FLASH_SCLK_GPIO),
            gpio(pins::FLASH_MOSI_GPIO),
            Some(gpio(pins::FLASH_MISO_GPIO)),
            &SpiDriverConfig::new(),
        )?;
        let flash_dev = SpiDeviceDriver::new(spi, Some(gpio(pins::FLASH_CS_GPIO)), &SpiConfig::new())?;

        let mut board = SelfTestBoard::new(
            Si7021::new(sensor_i2c),
            SpiFlash::new(flash_dev, pins::FLASH_JEDEC_ID),
            Atsha204a::new(identity_i2c, Ets),
        );
        led.set(true)?;
        let verdict = SelfTest::new().run(&mut board, &mut sink);

        let pattern = verdict.signal_pattern();
        let step = pattern.step_ms().unwrap_or(IDLE_LED_REFRESH_MS);
        let mut engine = SignalPatternEngine::new(pattern);
        led.set(engine.level())?;
        loop {
            FreeRtos::delay_ms(step);
            led.show(&mut engine, step)?;
        }
    }

    // ── 3b. Normal operation ──────────────────────────────────
    let supply = SupplyMonitor::new(
        OneshotAdc::new(pins::VBAT_ADC_CHANNEL)?,
        Ets,
        Conversion::Divider {
            full_scale_mv: pins::VBAT_FULL_SCALE_MV,
            max_raw: pins::VBAT_ADC_MAX_RAW,
        },
    );
    let uart = UartDriver::new(
        peripherals.uart1,
        gpio(pins::RADIO_TX_GPIO),
        gpio(pins::RADIO_RX_GPIO),
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::new().baudrate(Hertz(pins::RADIO_BAUD)),
    )?;

    let mut hw = NodeHardware::new(
        Si7021::new(sensor_i2c),
        supply,
        FramedRadio::new(UartTransport::new(uart)),
        SystemPower::new(),
    );

    let mut service = NodeService::new(config);
    led.lit_while(|| service.start(&mut hw, &mut sink))?;

    loop {
        service.run_cycle(&mut hw, &mut sink);
    }
}
