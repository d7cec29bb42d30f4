use log::debug;

use crate::calibration::CalibrationParams;
use crate::compensation::*;
use crate::config::*;
use crate::error::Error;
use crate::interface::Bme280Interface;
use crate::sampling::{self, DEFAULT_MAX_POLLS};

/// Standard sea-level pressure in hPa.
pub const SEA_LEVEL_PRESSURE: f64 = 1013.25;

/// A BME280 behind an interface `I`.
///
/// Owns the bus interface, the calibration read at construction and the last
/// configuration written to the chip.
pub struct BME280<I> {
    interface: I,
    config: Config,
    params: CalibrationParams,
    scale: TemperatureScale,
    max_polls: u32,
}

impl<I: Bme280Interface> BME280<I> {
    /// Verifies the chip ID, loads the calibration and applies `config`.
    pub fn new(interface: I, config: Config) -> Result<BME280<I>, Error<I::Error>> {
        let mut interface = interface;
        sampling::verify_chip_id(&mut interface)?;
        let params = CalibrationParams::load(&mut interface)?;
        let mut bme280 = BME280 {
            interface: interface,
            config: config,
            params: params,
            scale: TemperatureScale::Celsius,
            max_polls: DEFAULT_MAX_POLLS,
        };
        bme280.configure(config)?;
        Ok(bme280)
    }

    pub fn configure(&mut self, config: Config) -> Result<(), Error<I::Error>> {
        sampling::configure(&mut self.interface, &config)?;
        self.config = config;
        Ok(())
    }

    /// Switches power mode, keeping the other settings.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<I::Error>> {
        let config = Config { mode: mode, ..self.config };
        self.configure(config)
    }

    /// Resets the chip. Its registers return to power-on defaults (sleep mode,
    /// all channels skipped); call `configure` before reading again, since a
    /// read in sleep mode only rewrites ctrl_meas and humidity stays skipped.
    pub fn soft_reset(&mut self) -> Result<(), Error<I::Error>> {
        sampling::soft_reset(&mut self.interface, self.max_polls)?;
        self.config.mode = Mode::Sleep;
        Ok(())
    }

    /// Status polls allowed per wait. The status register is always read at
    /// least once, so 0 behaves like 1.
    pub fn set_poll_limit(&mut self, max_polls: u32) {
        self.max_polls = max_polls;
    }

    pub fn set_temperature_scale(&mut self, scale: TemperatureScale) {
        self.scale = scale;
    }

    pub fn temperature_scale(&self) -> TemperatureScale {
        self.scale
    }

    pub fn calibration(&self) -> &CalibrationParams {
        &self.params
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// Reads one raw sample. Outside normal mode every call runs a fresh
    /// one-shot conversion, so sleep mode never returns stale data.
    pub fn trigger_and_read(&mut self) -> Result<RawSample, Error<I::Error>> {
        sampling::trigger_and_read(&mut self.interface, &self.config, self.max_polls)
    }

    pub fn read(&mut self) -> Result<CompensatedReading, Error<I::Error>> {
        let raw = self.trigger_and_read()?;
        Ok(compensate(&raw, &self.params))
    }

    pub fn read_fixed(&mut self) -> Result<FixedReading, Error<I::Error>> {
        let raw = self.trigger_and_read()?;
        Ok(compensate_fixed(&raw, &self.params))
    }

    /// Temperature in the selected scale, pressure in Pa and humidity in %RH.
    pub fn values(&mut self) -> Result<(f64, f64, f64), Error<I::Error>> {
        let reading = self.read()?;
        Ok((
            self.scale.convert(reading.temperature),
            reading.pressure,
            reading.humidity,
        ))
    }

    pub fn formatted_values(&mut self) -> Result<String, Error<I::Error>> {
        let (t, p, h) = self.values()?;
        Ok(format!("{:.2} {}, {:.2} Pa, {:.2} %", t, self.scale, p, h))
    }

    pub fn temperature(&mut self) -> Result<f64, Error<I::Error>> {
        Ok(self.values()?.0)
    }

    pub fn pressure(&mut self) -> Result<f64, Error<I::Error>> {
        Ok(self.read()?.pressure)
    }

    pub fn humidity(&mut self) -> Result<f64, Error<I::Error>> {
        Ok(self.read()?.humidity)
    }

    /// Integer and fractional part of the pressure in Pa.
    pub fn pressure_precision(&mut self) -> Result<(f64, f64), Error<I::Error>> {
        let p = self.read_fixed()?.pressure;
        Ok(((p / 256) as f64, (p % 256) as f64 / 256.0))
    }

    /// Altitude in metres from the international barometric formula.
    pub fn altitude(&mut self, sea_level_hpa: f64) -> Result<f64, Error<I::Error>> {
        let p = self.read()?.pressure;
        let altitude = altitude_from_pressure(p, sea_level_hpa);
        debug!("{:.2} Pa -> {:.2} m", p, altitude);
        Ok(altitude)
    }

    pub fn release(self) -> I {
        self.interface
    }
}

pub fn altitude_from_pressure(pressure_pa: f64, sea_level_hpa: f64) -> f64 {
    44330.0 * (1.0 - (pressure_pa / 100.0 / sea_level_hpa).powf(1.0 / 5.255))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn altitude_at_sea_level_is_zero() {
        assert!(altitude_from_pressure(101325.0, SEA_LEVEL_PRESSURE).abs() < 1e-9);
    }

    #[test]
    fn altitude_rises_as_pressure_drops() {
        // ~110 m for 1000 hPa against the standard atmosphere
        let altitude = altitude_from_pressure(100000.0, SEA_LEVEL_PRESSURE);
        assert!(altitude > 100.0 && altitude < 120.0, "{}", altitude);
    }
}
