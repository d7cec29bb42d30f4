use std::process;

use docopt::Docopt;
use serde_derive::Deserialize;

#[cfg(target_os = "linux")]
use i2cdev::linux::LinuxI2CDevice;

use bme280_driver::*;

const USAGE: &str = "
Reading BME280 sensor value

Usage:
  bme280 <device> [options]
  bme280 (-h | --help)
  bme280 (-v | --version)

Options:
  -h --help             Show this help text.
  --address <addr>      I2C device address [default: 118] (=0x76)
  --scale <unit>        Temperature scale, C, F or K [default: C]
  --normal              Run in normal mode instead of forced one-shot mode.
  --altitude <hpa>      Also print altitude for this sea-level pressure.
  --fixed               Print the raw fixed-point results.
  -v --version          Show version.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_device: String,
    flag_address: u16,
    flag_scale: String,
    flag_normal: bool,
    flag_altitude: Option<f64>,
    flag_fixed: bool,
    flag_version: bool,
}

#[cfg(not(target_os = "linux"))]
fn main() {
    println!("This program can run only on Linux")
}

#[cfg(target_os = "linux")]
fn main() {
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    if args.flag_version {
        println!("bme280 {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let unit = args.flag_scale.chars().next().unwrap_or('C');
    let scale = TemperatureScale::try_from(unit).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(2);
    });
    let mode = if args.flag_normal { Mode::Normal } else { Mode::Forced };
    let config = Config { mode: mode, ..Config::default() };

    let dev = LinuxI2CDevice::new(&args.arg_device, args.flag_address).unwrap_or_else(|e| {
        eprintln!("{}: {}", args.arg_device, e);
        process::exit(1);
    });
    let mut bme280 = BME280::new(I2cInterface::new(dev), config).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });
    bme280.set_temperature_scale(scale);

    if let Err(e) = run(&mut bme280, &args) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

#[cfg(target_os = "linux")]
fn run(
    bme280: &mut BME280<I2cInterface<LinuxI2CDevice>>,
    args: &Args,
) -> Result<(), Error<i2cdev::linux::LinuxI2CError>> {
    if args.flag_fixed {
        let fixed = bme280.read_fixed()?;
        println!("{} {} {}", fixed.temperature, fixed.pressure, fixed.humidity);
    } else {
        println!("{}", bme280.formatted_values()?);
    }
    if let Some(sea_level) = args.flag_altitude {
        println!("{:.2} m", bme280.altitude(sea_level)?);
    }
    Ok(())
}
