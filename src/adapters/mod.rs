//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                         | Connects to              |
//! |------------|------------------------------------|--------------------------|
//! | `hardware` | Sensor/Supply/Radio/PowerPort      | drivers bundled per mode |
//! |            | Storage/IdentityPort (self-test)   |                          |
//! | `log_sink` | EventSink                          | Serial log output        |
//! | `power`    | PowerPort                          | FreeRTOS delay, light sleep |
//! | `radio`    | RadioPort                          | postcard/COBS over UART  |
//! | `update`   | —                                  | OTA image confirmation   |

pub mod hardware;
pub mod log_sink;
pub mod power;
pub mod radio;
pub mod update;
