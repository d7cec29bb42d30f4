use log::debug;

use crate::error::Error;
use crate::interface::Bme280Interface;
use crate::registers::*;
use crate::utils::*;

/// Factory trim coefficients. Read once from the chip and never modified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CalibrationParams {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,
    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,
    pub dig_h1: u8,
    pub dig_h2: i16,
    pub dig_h3: u8,
    pub dig_h4: i16,
    pub dig_h5: i16,
    pub dig_h6: i8,
}

impl CalibrationParams {
    /// Burst-reads both calibration blocks (0x88..0xA1 and 0xE1..0xE7).
    pub fn load<I: Bme280Interface>(
        interface: &mut I,
    ) -> Result<CalibrationParams, Error<I::Error>> {
        let mut tp = [0u8; CALIB_TP_LEN];
        let mut h = [0u8; CALIB_H_LEN];
        interface
            .read_registers(REG_CALIB_TP, &mut tp)
            .map_err(Error::Transport)?;
        interface
            .read_registers(REG_CALIB_H, &mut h)
            .map_err(Error::Transport)?;
        let params = CalibrationParams::parse(&tp, &h);
        debug!("calibration loaded: {:?}", params);
        Ok(params)
    }

    /// Unpacks the two raw blocks.
    ///
    /// dig_H4 and dig_H5 are 12-bit signed values sharing register 0xE5:
    /// H4 = 0xE4[7:0] . 0xE5[3:0], H5 = 0xE6[7:0] . 0xE5[7:4].
    pub fn parse(tp: &[u8; CALIB_TP_LEN], h: &[u8; CALIB_H_LEN]) -> CalibrationParams {
        let e4 = h[3] as u16;
        let e5 = h[4] as u16;
        let e6 = h[5] as u16;

        CalibrationParams {
            dig_t1: unsigned_short(tp, 0),
            dig_t2: signed_short(tp, 2),
            dig_t3: signed_short(tp, 4),
            dig_p1: unsigned_short(tp, 6),
            dig_p2: signed_short(tp, 8),
            dig_p3: signed_short(tp, 10),
            dig_p4: signed_short(tp, 12),
            dig_p5: signed_short(tp, 14),
            dig_p6: signed_short(tp, 16),
            dig_p7: signed_short(tp, 18),
            dig_p8: signed_short(tp, 20),
            dig_p9: signed_short(tp, 22),
            // tp[24] (0xA0) is not used
            dig_h1: tp[25],
            dig_h2: signed_short(h, 0),
            dig_h3: h[2],
            dig_h4: signed_12bit((e4 << 4) | (e5 & 0x0F)),
            dig_h5: signed_12bit((e6 << 4) | (e5 >> 4)),
            dig_h6: h[6] as i8,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const FIXTURE_TP: [u8; CALIB_TP_LEN] = [
        0x70, 0x6B, 0x43, 0x67, 0x18, 0xFC, 0x7D, 0x8E, 0x43, 0xD6, 0xD0, 0x0B, 0x27, 0x0B,
        0x8C, 0x00, 0xF9, 0xFF, 0x8C, 0x3C, 0xF8, 0xC6, 0x70, 0x17, 0x00, 0x4B,
    ];
    pub const FIXTURE_H: [u8; CALIB_H_LEN] = [0x6A, 0x01, 0x00, 0x13, 0x29, 0x03, 0x1E];

    pub fn fixture() -> CalibrationParams {
        CalibrationParams {
            dig_t1: 27504,
            dig_t2: 26435,
            dig_t3: -1000,
            dig_p1: 36477,
            dig_p2: -10685,
            dig_p3: 3024,
            dig_p4: 2855,
            dig_p5: 140,
            dig_p6: -7,
            dig_p7: 15500,
            dig_p8: -14600,
            dig_p9: 6000,
            dig_h1: 75,
            dig_h2: 362,
            dig_h3: 0,
            dig_h4: 313,
            dig_h5: 50,
            dig_h6: 30,
        }
    }

    #[test]
    fn parse_fixture() {
        assert_eq!(CalibrationParams::parse(&FIXTURE_TP, &FIXTURE_H), fixture());
    }

    #[test]
    fn humidity_nibbles_are_sign_extended() {
        // H4 = 0xFF.F = -1, H5 = 0x80.A = 0x80A = -2038, H6 = 0xF6 = -10
        let h = [0x00, 0x80, 0xFF, 0xFF, 0xAF, 0x80, 0xF6];
        let params = CalibrationParams::parse(&FIXTURE_TP, &h);
        assert_eq!(params.dig_h2, -32768);
        assert_eq!(params.dig_h3, 255);
        assert_eq!(params.dig_h4, -1);
        assert_eq!(params.dig_h5, -2038);
        assert_eq!(params.dig_h6, -10);
    }

    #[test]
    fn positive_nibbles_do_not_bleed() {
        // H4 = 0x12.5 = 0x125, H5 = 0x34.6 = 0x346
        let h = [0x00, 0x00, 0x00, 0x12, 0x65, 0x34, 0x00];
        let params = CalibrationParams::parse(&FIXTURE_TP, &h);
        assert_eq!(params.dig_h4, 0x125);
        assert_eq!(params.dig_h5, 0x346);
    }
}
