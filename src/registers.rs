//! BME280 register map (Bosch BST-BME280-DS002).

/// Chip identification number, must read `CHIP_ID` after power-up.
pub const REG_CHIP_ID: u8 = 0xD0;
/// Writing `SOFT_RESET_COMMAND` here runs the power-on-reset procedure.
pub const REG_RESET: u8 = 0xE0;
/// Humidity oversampling. Only latched by the next write to `REG_CTRL_MEAS`.
pub const REG_CTRL_HUM: u8 = 0xF2;
/// bit 3 - measuring, bit 0 - NVM data being copied
pub const REG_STATUS: u8 = 0xF3;
/// Temperature/pressure oversampling and power mode.
pub const REG_CTRL_MEAS: u8 = 0xF4;
/// Standby time, IIR filter and 3-wire SPI enable.
pub const REG_CONFIG: u8 = 0xF5;
/// press_msb, press_lsb, press_xlsb, temp_msb, temp_lsb, temp_xlsb, hum_msb, hum_lsb
pub const REG_DATA: u8 = 0xF7;

/// dig_T1..dig_P9, one unused byte, dig_H1
pub const REG_CALIB_TP: u8 = 0x88;
/// dig_H2..dig_H6
pub const REG_CALIB_H: u8 = 0xE1;

pub const CALIB_TP_LEN: usize = 26;
pub const CALIB_H_LEN: usize = 7;
pub const DATA_LEN: usize = 8;

pub const CHIP_ID: u8 = 0x60;
pub const SOFT_RESET_COMMAND: u8 = 0xB6;

pub const STATUS_MEASURING: u8 = 0x08;
pub const STATUS_IM_UPDATE: u8 = 0x01;

pub const CTRL_HUM_OSRS_H_MASK: u8 = 0x07;
pub const CTRL_MEAS_OSRS_T_POS: u8 = 5;
pub const CTRL_MEAS_OSRS_P_POS: u8 = 2;
pub const CTRL_MEAS_MODE_MASK: u8 = 0x03;
pub const CONFIG_T_SB_POS: u8 = 5;
pub const CONFIG_FILTER_POS: u8 = 2;
pub const CONFIG_SPI3W_EN: u8 = 0x01;

/// SPI read/write flag carried in bit 7 of the address byte.
pub const SPI_READ: u8 = 0x80;
pub const SPI_ADDRESS_MASK: u8 = 0x7F;
