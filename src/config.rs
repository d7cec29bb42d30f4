use std::fmt;

use crate::error::InvalidSetting;
use crate::registers::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Sleep,
    Forced,
    Normal,
}

impl Mode {
    pub fn value(self) -> u8 {
        match self {
            Mode::Sleep => 0,
            Mode::Forced => 1,
            Mode::Normal => 3,
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = InvalidSetting;

    // 01 and 10 both select forced mode
    fn try_from(value: u8) -> Result<Mode, InvalidSetting> {
        match value {
            0 => Ok(Mode::Sleep),
            1 | 2 => Ok(Mode::Forced),
            3 => Ok(Mode::Normal),
            _ => Err(InvalidSetting { setting: "power mode", value: value }),
        }
    }
}

/// Per-channel oversampling. `Skip` disables the channel; its data registers
/// then hold 0x80000 (0x8000 for humidity).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Oversampling {
    Skip,
    X1,
    X2,
    X4,
    X8,
    X16,
}

impl Oversampling {
    pub fn value(self) -> u8 {
        match self {
            Oversampling::Skip => 0,
            Oversampling::X1 => 1,
            Oversampling::X2 => 2,
            Oversampling::X4 => 3,
            Oversampling::X8 => 4,
            Oversampling::X16 => 5,
        }
    }

    /// Number of samples averaged per conversion.
    pub fn factor(self) -> u32 {
        match self {
            Oversampling::Skip => 0,
            Oversampling::X1 => 1,
            Oversampling::X2 => 2,
            Oversampling::X4 => 4,
            Oversampling::X8 => 8,
            Oversampling::X16 => 16,
        }
    }
}

impl TryFrom<u8> for Oversampling {
    type Error = InvalidSetting;

    fn try_from(value: u8) -> Result<Oversampling, InvalidSetting> {
        match value {
            0 => Ok(Oversampling::Skip),
            1 => Ok(Oversampling::X1),
            2 => Ok(Oversampling::X2),
            3 => Ok(Oversampling::X4),
            4 => Ok(Oversampling::X8),
            5 => Ok(Oversampling::X16),
            _ => Err(InvalidSetting { setting: "oversampling", value: value }),
        }
    }
}

/// Inactive period between conversions in normal mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StandbyTime {
    Ms0_5,
    Ms62_5,
    Ms125,
    Ms250,
    Ms500,
    Ms1000,
    Ms10,
    Ms20,
}

impl StandbyTime {
    pub fn value(self) -> u8 {
        match self {
            StandbyTime::Ms0_5 => 0,
            StandbyTime::Ms62_5 => 1,
            StandbyTime::Ms125 => 2,
            StandbyTime::Ms250 => 3,
            StandbyTime::Ms500 => 4,
            StandbyTime::Ms1000 => 5,
            StandbyTime::Ms10 => 6,
            StandbyTime::Ms20 => 7,
        }
    }
}

impl TryFrom<u8> for StandbyTime {
    type Error = InvalidSetting;

    fn try_from(value: u8) -> Result<StandbyTime, InvalidSetting> {
        match value {
            0 => Ok(StandbyTime::Ms0_5),
            1 => Ok(StandbyTime::Ms62_5),
            2 => Ok(StandbyTime::Ms125),
            3 => Ok(StandbyTime::Ms250),
            4 => Ok(StandbyTime::Ms500),
            5 => Ok(StandbyTime::Ms1000),
            6 => Ok(StandbyTime::Ms10),
            7 => Ok(StandbyTime::Ms20),
            _ => Err(InvalidSetting { setting: "standby time", value: value }),
        }
    }
}

/// IIR filter coefficient. With the filter on, temperature and pressure
/// resolution is 20 bit regardless of oversampling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IIRFilter {
    Off,
    X2,
    X4,
    X8,
    X16,
}

impl IIRFilter {
    pub fn value(self) -> u8 {
        match self {
            IIRFilter::Off => 0,
            IIRFilter::X2 => 1,
            IIRFilter::X4 => 2,
            IIRFilter::X8 => 3,
            IIRFilter::X16 => 4,
        }
    }
}

impl TryFrom<u8> for IIRFilter {
    type Error = InvalidSetting;

    fn try_from(value: u8) -> Result<IIRFilter, InvalidSetting> {
        match value {
            0 => Ok(IIRFilter::Off),
            1 => Ok(IIRFilter::X2),
            2 => Ok(IIRFilter::X4),
            3 => Ok(IIRFilter::X8),
            4 => Ok(IIRFilter::X16),
            _ => Err(InvalidSetting { setting: "IIR filter", value: value }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureScale {
    pub fn convert(self, celsius: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => celsius,
            TemperatureScale::Fahrenheit => 32.0 + celsius * 1.8,
            TemperatureScale::Kelvin => celsius + 273.15,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "C",
            TemperatureScale::Fahrenheit => "F",
            TemperatureScale::Kelvin => "K",
        }
    }
}

impl TryFrom<char> for TemperatureScale {
    type Error = InvalidSetting;

    fn try_from(value: char) -> Result<TemperatureScale, InvalidSetting> {
        match value.to_ascii_uppercase() {
            'C' => Ok(TemperatureScale::Celsius),
            'F' => Ok(TemperatureScale::Fahrenheit),
            'K' => Ok(TemperatureScale::Kelvin),
            _ => Err(InvalidSetting { setting: "temperature scale", value: value as u8 }),
        }
    }
}

impl fmt::Display for TemperatureScale {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Operating settings written to ctrl_hum, ctrl_meas and config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub oversampling_temperature: Oversampling,
    pub oversampling_pressure: Oversampling,
    pub oversampling_humidity: Oversampling,
    pub standby_time: StandbyTime,
    pub iir_filter: IIRFilter,
    pub spi3w_enabled: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            mode: Mode::Forced,
            oversampling_temperature: Oversampling::X2,
            oversampling_pressure: Oversampling::X16,
            oversampling_humidity: Oversampling::X1,
            standby_time: StandbyTime::Ms0_5,
            iir_filter: IIRFilter::X16,
            spi3w_enabled: false,
        }
    }
}

impl Config {
    pub fn ctrl_hum(&self) -> u8 {
        self.oversampling_humidity.value() & CTRL_HUM_OSRS_H_MASK
    }

    pub fn ctrl_meas(&self) -> u8 {
        self.ctrl_meas_with_mode(self.mode)
    }

    pub fn ctrl_meas_with_mode(&self, mode: Mode) -> u8 {
        (self.oversampling_temperature.value() << CTRL_MEAS_OSRS_T_POS)
            | (self.oversampling_pressure.value() << CTRL_MEAS_OSRS_P_POS)
            | (mode.value() & CTRL_MEAS_MODE_MASK)
    }

    pub fn config(&self) -> u8 {
        let spi3w = if self.spi3w_enabled { CONFIG_SPI3W_EN } else { 0 };
        (self.standby_time.value() << CONFIG_T_SB_POS)
            | (self.iir_filter.value() << CONFIG_FILTER_POS)
            | spi3w
    }

    /// Worst-case duration of one conversion cycle in microseconds
    /// (datasheet appendix B, maximum timings).
    pub fn max_measurement_time_us(&self) -> u32 {
        let mut time = 1250;
        let t = self.oversampling_temperature.factor();
        if t > 0 {
            time += 2300 * t;
        }
        let p = self.oversampling_pressure.factor();
        if p > 0 {
            time += 575 + 2300 * p;
        }
        let h = self.oversampling_humidity.factor();
        if h > 0 {
            time += 575 + 2300 * h;
        }
        time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_register_values() {
        let config = Config::default();
        assert_eq!(config.ctrl_hum(), 0x01);
        // osrs_t=010, osrs_p=101, mode=01
        assert_eq!(config.ctrl_meas(), 0b010_101_01);
        // t_sb=000, filter=100, spi3w_en=0
        assert_eq!(config.config(), 0b000_100_0_0);
    }

    #[test]
    fn normal_mode_with_3wire_spi() {
        let config = Config {
            mode: Mode::Normal,
            oversampling_temperature: Oversampling::X1,
            oversampling_pressure: Oversampling::X1,
            oversampling_humidity: Oversampling::X1,
            standby_time: StandbyTime::Ms1000,
            iir_filter: IIRFilter::Off,
            spi3w_enabled: true,
        };
        assert_eq!(config.ctrl_meas(), 0x27);
        assert_eq!(config.config(), 0xA1);
        assert_eq!(config.ctrl_meas_with_mode(Mode::Sleep), 0x24);
    }

    #[test]
    fn measurement_time() {
        // 1.25 + 2.3*2 + (2.3*16 + 0.575) + (2.3*1 + 0.575) ms
        assert_eq!(Config::default().max_measurement_time_us(), 46100);

        let skipped = Config {
            oversampling_pressure: Oversampling::Skip,
            oversampling_humidity: Oversampling::Skip,
            ..Config::default()
        };
        assert_eq!(skipped.max_measurement_time_us(), 1250 + 4600);
    }

    #[test]
    fn parse_settings() {
        assert_eq!(Oversampling::try_from(5), Ok(Oversampling::X16));
        assert_eq!(Mode::try_from(2), Ok(Mode::Forced));
        assert_eq!(StandbyTime::try_from(6), Ok(StandbyTime::Ms10));
        assert_eq!(IIRFilter::try_from(4), Ok(IIRFilter::X16));
        assert!(Oversampling::try_from(6).is_err());
        assert!(IIRFilter::try_from(5).is_err());
        assert!(StandbyTime::try_from(8).is_err());
        assert!(Mode::try_from(4).is_err());
    }

    #[test]
    fn temperature_scales() {
        assert_eq!(TemperatureScale::try_from('f'), Ok(TemperatureScale::Fahrenheit));
        assert!(TemperatureScale::try_from('x').is_err());
        assert!((TemperatureScale::Fahrenheit.convert(25.0) - 77.0).abs() < 1e-9);
        assert!((TemperatureScale::Kelvin.convert(0.0) - 273.15).abs() < 1e-9);
        assert_eq!(TemperatureScale::Celsius.convert(21.5), 21.5);
    }
}
