//! Conversion of raw ADC counts into physical units.
//!
//! Two engines implement the Bosch reference formulas: `compensate_float`
//! (double precision) and `compensate_fixed` (32/64-bit integer). They agree to
//! within 0.01 °C, 1 Pa and 0.01 %RH. `compensate` dispatches to whichever one
//! the `fixed-point` feature selects.

use crate::calibration::CalibrationParams;

/// Raw ADC counts from one conversion cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawSample {
    /// 20-bit
    pub temperature: u32,
    /// 20-bit
    pub pressure: u32,
    pub humidity: u16,
}

/// Temperature in °C, pressure in Pa, humidity in %RH.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompensatedReading {
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
}

/// Integer results of the Bosch reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedReading {
    /// 0.01 °C, e.g. 2508 = 25.08 °C
    pub temperature: i32,
    /// Q24.8 Pa, e.g. 25767233 / 256 = 100653.25 Pa
    pub pressure: u32,
    /// Q22.10 %RH, e.g. 56317 / 1024 = 54.997 %RH
    pub humidity: u32,
}

impl From<FixedReading> for CompensatedReading {
    fn from(fixed: FixedReading) -> CompensatedReading {
        CompensatedReading {
            temperature: fixed.temperature as f64 / 100.0,
            pressure: fixed.pressure as f64 / 256.0,
            humidity: fixed.humidity as f64 / 1024.0,
        }
    }
}

const HUMIDITY_MAX_Q22_10: i32 = 419430400;

impl CalibrationParams {
    /// Fine temperature (t_fine) for the integer engine.
    pub fn fine_temperature(&self, adc_t: u32) -> i32 {
        let adc = adc_t as i32;
        let t1 = self.dig_t1 as i32;
        let t2 = self.dig_t2 as i32;
        let t3 = self.dig_t3 as i32;

        let var1 = (((adc >> 3) - (t1 << 1)) * t2) >> 11;
        let var2 = (((((adc >> 4) - t1) * ((adc >> 4) - t1)) >> 12) * t3) >> 14;
        var1 + var2
    }

    pub fn compensated_temp_fixed(&self, t_fine: i32) -> i32 {
        (t_fine * 5 + 128) >> 8
    }

    /// Pressure in Q24.8 Pa. Returns 0 when the divisor vanishes.
    pub fn compensated_press_fixed(&self, adc_p: u32, t_fine: i32) -> u32 {
        let p1 = self.dig_p1 as i64;
        let p2 = self.dig_p2 as i64;
        let p3 = self.dig_p3 as i64;
        let p4 = self.dig_p4 as i64;
        let p5 = self.dig_p5 as i64;
        let p6 = self.dig_p6 as i64;
        let p7 = self.dig_p7 as i64;
        let p8 = self.dig_p8 as i64;
        let p9 = self.dig_p9 as i64;

        let mut var1 = t_fine as i64 - 128000;
        let mut var2 = var1 * var1 * p6;
        var2 += (var1 * p5) << 17;
        var2 += p4 << 35;
        var1 = ((var1 * var1 * p3) >> 8) + ((var1 * p2) << 12);
        var1 = (((1i64 << 47) + var1) * p1) >> 33;
        if var1 == 0 {
            return 0;
        }

        let mut p = 1048576 - adc_p as i64;
        p = (((p << 31) - var2) * 3125) / var1;
        var1 = (p9 * (p >> 13) * (p >> 13)) >> 25;
        var2 = (p8 * p) >> 19;
        p = ((p + var1 + var2) >> 8) + (p7 << 4);
        p as u32
    }

    /// Humidity in Q22.10 %RH, clamped to 0..=100 %.
    pub fn compensated_hum_fixed(&self, adc_h: u16, t_fine: i32) -> u32 {
        let h1 = self.dig_h1 as i32;
        let h2 = self.dig_h2 as i32;
        let h3 = self.dig_h3 as i32;
        let h4 = self.dig_h4 as i32;
        let h5 = self.dig_h5 as i32;
        let h6 = self.dig_h6 as i32;

        let mut v = t_fine - 76800;
        v = ((((adc_h as i32) << 14) - (h4 << 20) - (h5 * v) + 16384) >> 15)
            * (((((((v * h6) >> 10) * (((v * h3) >> 11) + 32768)) >> 10) + 2097152) * h2
                + 8192)
                >> 14);
        v -= ((((v >> 15) * (v >> 15)) >> 7) * h1) >> 4;
        let v = v.max(0).min(HUMIDITY_MAX_Q22_10);
        (v >> 12) as u32
    }

    /// Temperature in °C and the fine temperature derived from it.
    pub fn compensated_temp_float(&self, adc_t: u32) -> (f64, i32) {
        let adc = adc_t as f64;
        let t1 = self.dig_t1 as f64;
        let t2 = self.dig_t2 as f64;
        let t3 = self.dig_t3 as f64;

        let var1 = (adc / 16384.0 - t1 / 1024.0) * t2;
        let var2 = (adc / 131072.0 - t1 / 8192.0) * (adc / 131072.0 - t1 / 8192.0) * t3;
        ((var1 + var2) / 5120.0, (var1 + var2) as i32)
    }

    /// Pressure in Pa. Returns 0.0 when the divisor vanishes.
    pub fn compensated_press_float(&self, adc_p: u32, t_fine: i32) -> f64 {
        let mut var1 = t_fine as f64 / 2.0 - 64000.0;
        let mut var2 = var1 * var1 * self.dig_p6 as f64 / 32768.0;
        var2 += var1 * self.dig_p5 as f64 * 2.0;
        var2 = var2 / 4.0 + self.dig_p4 as f64 * 65536.0;
        var1 = (self.dig_p3 as f64 * var1 * var1 / 524288.0 + self.dig_p2 as f64 * var1)
            / 524288.0;
        var1 = (1.0 + var1 / 32768.0) * self.dig_p1 as f64;
        if var1 == 0.0 {
            return 0.0;
        }

        let mut p = 1048576.0 - adc_p as f64;
        p = (p - var2 / 4096.0) * 6250.0 / var1;
        var1 = self.dig_p9 as f64 * p * p / 2147483648.0;
        var2 = p * self.dig_p8 as f64 / 32768.0;
        p + (var1 + var2 + self.dig_p7 as f64) / 16.0
    }

    /// Humidity in %RH, clamped to [0, 100].
    pub fn compensated_hum_float(&self, adc_h: u16, t_fine: i32) -> f64 {
        let h = t_fine as f64 - 76800.0;
        let h = (adc_h as f64 - (self.dig_h4 as f64 * 64.0 + self.dig_h5 as f64 / 16384.0 * h))
            * (self.dig_h2 as f64 / 65536.0
                * (1.0
                    + self.dig_h6 as f64 / 67108864.0
                        * h
                        * (1.0 + self.dig_h3 as f64 / 67108864.0 * h)));
        let h = h * (1.0 - self.dig_h1 as f64 * h / 524288.0);
        h.max(0.0).min(100.0)
    }
}

/// Integer reference. Temperature is compensated first since pressure and
/// humidity both depend on its fine temperature.
pub fn compensate_fixed(raw: &RawSample, cal: &CalibrationParams) -> FixedReading {
    let t_fine = cal.fine_temperature(raw.temperature);
    FixedReading {
        temperature: cal.compensated_temp_fixed(t_fine),
        pressure: cal.compensated_press_fixed(raw.pressure, t_fine),
        humidity: cal.compensated_hum_fixed(raw.humidity, t_fine),
    }
}

pub fn compensate_float(raw: &RawSample, cal: &CalibrationParams) -> CompensatedReading {
    let (temperature, t_fine) = cal.compensated_temp_float(raw.temperature);
    CompensatedReading {
        temperature: temperature,
        pressure: cal.compensated_press_float(raw.pressure, t_fine),
        humidity: cal.compensated_hum_float(raw.humidity, t_fine),
    }
}

#[cfg(not(feature = "fixed-point"))]
pub fn compensate(raw: &RawSample, cal: &CalibrationParams) -> CompensatedReading {
    compensate_float(raw, cal)
}

#[cfg(feature = "fixed-point")]
pub fn compensate(raw: &RawSample, cal: &CalibrationParams) -> CompensatedReading {
    compensate_fixed(raw, cal).into()
}
