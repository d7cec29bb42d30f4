//! # bme280-driver
//!
//! Temperature, pressure and humidity from a Bosch BME280 over I2C or SPI.
//!
//! The bus is abstracted by [`Bme280Interface`]; [`I2cInterface`] wraps any
//! `i2cdev` device and [`SpiInterface`] any `embedded-hal` SPI device paired
//! with an `embedded-hal` delay provider.
//!
//! # Examples
//! ```no_run
//! use bme280_driver::*;
//! use i2cdev::linux::LinuxI2CDevice;
//!
//! let config = Config {
//!     mode: Mode::Forced,
//!     oversampling_temperature: Oversampling::X2,
//!     oversampling_pressure: Oversampling::X16,
//!     oversampling_humidity: Oversampling::X1,
//!     standby_time: StandbyTime::Ms0_5,
//!     iir_filter: IIRFilter::X16,
//!     spi3w_enabled: false,
//! };
//! let dev = LinuxI2CDevice::new("/dev/i2c-1", I2C_ADDRESS_PRIMARY).unwrap();
//! let mut bme280 = BME280::new(I2cInterface::new(dev), config).unwrap();
//! let reading = bme280.read().unwrap();
//! println!("{:.2} C", reading.temperature);
//! println!("{:.2} hPa", reading.pressure / 100.0);
//! println!("{:.2} %", reading.humidity);
//! ```

mod bme280;
pub mod calibration;
pub mod compensation;
pub mod config;
mod error;
pub mod interface;
pub mod registers;
pub mod sampling;
mod utils;

pub use crate::bme280::*;
pub use crate::calibration::CalibrationParams;
pub use crate::compensation::{
    compensate, compensate_fixed, compensate_float, CompensatedReading, FixedReading, RawSample,
};
pub use crate::config::*;
pub use crate::error::{Error, InvalidSetting};
pub use crate::interface::*;
