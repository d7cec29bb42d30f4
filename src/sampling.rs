use log::{debug, trace, warn};

use crate::compensation::RawSample;
use crate::config::{Config, Mode};
use crate::error::Error;
use crate::interface::Bme280Interface;
use crate::registers::*;
use crate::utils::adc_20bit;

/// Status polls allowed before a conversion is declared stuck.
pub const DEFAULT_MAX_POLLS: u32 = 100;

const POLL_INTERVAL_US: u32 = 1000;
const STARTUP_TIME_US: u32 = 2000;

fn write<I: Bme280Interface>(
    interface: &mut I,
    register: u8,
    value: u8,
) -> Result<(), Error<I::Error>> {
    trace!("write {:#04x} <- {:#04x}", register, value);
    interface
        .write_register(register, value)
        .map_err(Error::Transport)
}

fn read_status<I: Bme280Interface>(interface: &mut I) -> Result<u8, Error<I::Error>> {
    let mut status = [0u8; 1];
    interface
        .read_registers(REG_STATUS, &mut status)
        .map_err(Error::Transport)?;
    Ok(status[0])
}

/// Polls the status register until none of `mask` is set. The status is
/// always read at least once, even with a limit of 0.
fn wait_while_set<I: Bme280Interface>(
    interface: &mut I,
    mask: u8,
    max_polls: u32,
) -> Result<(), Error<I::Error>> {
    let max_polls = max_polls.max(1);
    for poll in 0..max_polls {
        if read_status(interface)? & mask == 0 {
            return Ok(());
        }
        if poll + 1 < max_polls {
            interface.delay_us(POLL_INTERVAL_US);
        }
    }
    warn!("status bits {:#04x} still set after {} polls", mask, max_polls);
    Err(Error::Timeout)
}

/// Checks that the device answers with the BME280 chip ID.
pub fn verify_chip_id<I: Bme280Interface>(interface: &mut I) -> Result<(), Error<I::Error>> {
    let mut id = [0u8; 1];
    interface
        .read_registers(REG_CHIP_ID, &mut id)
        .map_err(Error::Transport)?;
    debug!("chip id {:#04x}", id[0]);
    if id[0] != CHIP_ID {
        warn!("chip id {:#04x} is not a BME280", id[0]);
        return Err(Error::IdentityMismatch(id[0]));
    }
    Ok(())
}

/// Power-on reset. Waits for the trim data to be copied back from NVM.
pub fn soft_reset<I: Bme280Interface>(
    interface: &mut I,
    max_polls: u32,
) -> Result<(), Error<I::Error>> {
    write(interface, REG_RESET, SOFT_RESET_COMMAND)?;
    interface.delay_us(STARTUP_TIME_US);
    wait_while_set(interface, STATUS_IM_UPDATE, max_polls)
}

/// Writes ctrl_hum, ctrl_meas and config.
///
/// ctrl_hum only takes effect after the following ctrl_meas write, so the
/// order is fixed. ctrl_meas is first written in sleep mode because config
/// writes may be ignored in normal mode; the requested mode is armed last.
pub fn configure<I: Bme280Interface>(
    interface: &mut I,
    config: &Config,
) -> Result<(), Error<I::Error>> {
    debug!("configuring {:?}", config);
    write(interface, REG_CTRL_HUM, config.ctrl_hum())?;
    write(interface, REG_CTRL_MEAS, config.ctrl_meas_with_mode(Mode::Sleep))?;
    write(interface, REG_CONFIG, config.config())?;
    if config.mode != Mode::Sleep {
        write(interface, REG_CTRL_MEAS, config.ctrl_meas())?;
    }
    Ok(())
}

/// Reads the 8 data registers in one burst so all three channels come from
/// the same conversion.
pub fn read_raw<I: Bme280Interface>(interface: &mut I) -> Result<RawSample, Error<I::Error>> {
    let mut v = [0u8; DATA_LEN];
    interface
        .read_registers(REG_DATA, &mut v)
        .map_err(Error::Transport)?;
    let raw = RawSample {
        pressure: adc_20bit(v[0], v[1], v[2]),
        temperature: adc_20bit(v[3], v[4], v[5]),
        humidity: ((v[6] as u16) << 8) | v[7] as u16,
    };
    debug!("raw sample {:?}", raw);
    Ok(raw)
}

/// Returns one raw sample.
///
/// In forced and sleep mode this starts a one-shot conversion, waits for the
/// worst-case conversion time and polls the measuring bit at most
/// `max_polls` times. The chip drops back to sleep by itself afterwards.
/// In normal mode the data registers already hold the latest conversion and
/// are read as they are.
pub fn trigger_and_read<I: Bme280Interface>(
    interface: &mut I,
    config: &Config,
    max_polls: u32,
) -> Result<RawSample, Error<I::Error>> {
    if config.mode != Mode::Normal {
        write(interface, REG_CTRL_MEAS, config.ctrl_meas_with_mode(Mode::Forced))?;
        interface.delay_us(config.max_measurement_time_us());
        wait_while_set(interface, STATUS_MEASURING, max_polls)?;
    }
    read_raw(interface)
}
