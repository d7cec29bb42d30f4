//! Register access over I2C or SPI.
//!
//! The driver only needs to burst-read consecutive registers and write single
//! registers; everything below that is the host platform's business.

use std::io;
use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{Operation, SpiDevice};
use i2cdev::core::I2CDevice;

use crate::registers::{SPI_ADDRESS_MASK, SPI_READ};

/// I2C address with SDO tied to GND.
pub const I2C_ADDRESS_PRIMARY: u16 = 0x76;
/// I2C address with SDO tied to VDDIO.
pub const I2C_ADDRESS_SECONDARY: u16 = 0x77;

pub trait Bme280Interface {
    type Error;

    /// Reads `buf.len()` consecutive registers starting at `register` in one
    /// bus transaction.
    fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Blocks for at least `us` microseconds. Forced conversions are timed
    /// with this, so it must really wait.
    fn delay_us(&mut self, us: u32);
}

impl<'a, T: Bme280Interface + ?Sized> Bme280Interface for &'a mut T {
    type Error = T::Error;

    fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read_registers(register, buf)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        (**self).write_register(register, value)
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}

/// SMBus register access through an `i2cdev` device, e.g. `LinuxI2CDevice`.
pub struct I2cInterface<D> {
    device: D,
}

impl<D: I2CDevice> I2cInterface<D> {
    pub fn new(device: D) -> I2cInterface<D> {
        I2cInterface { device: device }
    }

    pub fn release(self) -> D {
        self.device
    }
}

impl<D> Bme280Interface for I2cInterface<D>
where
    D: I2CDevice,
    D::Error: From<io::Error>,
{
    type Error = D::Error;

    /// A block read that returns fewer bytes than asked for is an error;
    /// a partial burst would mix conversions.
    fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), D::Error> {
        let values = self.device.smbus_read_i2c_block_data(register, buf.len() as u8)?;
        if values.len() != buf.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "block read at {:#04x} returned {} of {} bytes",
                    register,
                    values.len(),
                    buf.len()
                ),
            )
            .into());
        }
        buf.copy_from_slice(&values);
        Ok(())
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), D::Error> {
        self.device.smbus_write_byte_data(register, value)
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(us as u64));
    }
}

/// 4-wire or 3-wire SPI access through an `embedded-hal` SPI device, timed
/// by an `embedded-hal` delay provider.
///
/// Bit 7 of the address byte selects read (1) or write (0); chip select is
/// held for the whole burst so every byte comes from the same conversion.
pub struct SpiInterface<S, D> {
    spi: S,
    delay: D,
}

impl<S: SpiDevice, D: DelayNs> SpiInterface<S, D> {
    pub fn new(spi: S, delay: D) -> SpiInterface<S, D> {
        SpiInterface { spi: spi, delay: delay }
    }

    pub fn release(self) -> (S, D) {
        (self.spi, self.delay)
    }
}

impl<S: SpiDevice, D: DelayNs> Bme280Interface for SpiInterface<S, D> {
    type Error = S::Error;

    fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), S::Error> {
        self.spi.transaction(&mut [
            Operation::Write(&[register | SPI_READ]),
            Operation::Read(buf),
        ])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), S::Error> {
        self.spi.write(&[register & SPI_ADDRESS_MASK, value])
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
    use i2cdev::mock::MockI2CDevice;

    /// Adds up every nanosecond it is asked to wait.
    #[derive(Default)]
    struct TotalDelay {
        ns: u64,
    }

    impl DelayNs for TotalDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.ns += ns as u64;
        }
    }

    /// SMBus block transfers on top of the `i2cdev` mock register map, which
    /// only models plain reads and writes. `short_by` drops trailing bytes.
    struct SmbusRegisterMap {
        mock: MockI2CDevice,
        short_by: usize,
    }

    impl SmbusRegisterMap {
        fn new() -> SmbusRegisterMap {
            SmbusRegisterMap { mock: MockI2CDevice::new(), short_by: 0 }
        }
    }

    impl I2CDevice for SmbusRegisterMap {
        type Error = io::Error;

        fn read(&mut self, data: &mut [u8]) -> io::Result<()> {
            self.mock.read(data)
        }

        fn write(&mut self, data: &[u8]) -> io::Result<()> {
            self.mock.write(data)
        }

        fn smbus_write_quick(&mut self, bit: bool) -> io::Result<()> {
            self.mock.smbus_write_quick(bit)
        }

        fn smbus_read_block_data(&mut self, register: u8) -> io::Result<Vec<u8>> {
            self.mock.smbus_read_block_data(register)
        }

        fn smbus_write_block_data(&mut self, register: u8, values: &[u8]) -> io::Result<()> {
            self.mock.smbus_write_block_data(register, values)
        }

        fn smbus_process_block(&mut self, register: u8, values: &[u8]) -> io::Result<Vec<u8>> {
            self.mock.smbus_process_block(register, values)
        }

        fn smbus_read_i2c_block_data(&mut self, register: u8, len: u8) -> io::Result<Vec<u8>> {
            self.mock.write(&[register])?;
            let mut values = vec![0u8; len as usize - self.short_by];
            self.mock.read(&mut values)?;
            Ok(values)
        }

        fn smbus_write_i2c_block_data(&mut self, register: u8, values: &[u8]) -> io::Result<()> {
            let mut data = vec![register];
            data.extend_from_slice(values);
            self.mock.write(&data)
        }
    }

    #[test]
    fn i2c_burst_read() {
        let data = [0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00, 0x75, 0x30];
        let mut device = SmbusRegisterMap::new();
        device.mock.regmap.write_regs(0xF7, &data);
        device.mock.regmap.write_regs(0xD0, &[0x60]);
        let mut interface = I2cInterface::new(device);

        let mut buf = [0u8; 8];
        interface.read_registers(0xF7, &mut buf).unwrap();
        assert_eq!(buf, data);
        let mut id = [0u8; 1];
        interface.read_registers(0xD0, &mut id).unwrap();
        assert_eq!(id[0], 0x60);
    }

    #[test]
    fn i2c_byte_write() {
        let mut interface = I2cInterface::new(SmbusRegisterMap::new());
        interface.write_register(0xF2, 0x05).unwrap();
        interface.write_register(0xF4, 0x55).unwrap();

        let mut device = interface.release();
        let mut values = [0u8; 3];
        device.write(&[0xF2]).unwrap();
        device.read(&mut values).unwrap();
        assert_eq!(values, [0x05, 0x00, 0x55]);
    }

    #[test]
    fn i2c_short_block_read_is_an_error() {
        let mut device = SmbusRegisterMap::new();
        device.mock.regmap.write_regs(0xF7, &[0xAA; 8]);
        device.short_by = 2;
        let mut interface = I2cInterface::new(device);

        let mut buf = [0u8; 8];
        let err = interface.read_registers(0xF7, &mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(buf, [0u8; 8]);
    }

    #[test]
    fn spi_read_sets_read_bit() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0xD0]),
            SpiTransaction::read_vec(vec![0x60]),
            SpiTransaction::transaction_end(),
        ];
        let mut interface = SpiInterface::new(SpiMock::new(&expectations), TotalDelay::default());
        let mut id = [0u8; 1];
        // 0xD0 already has bit 7 set
        interface.read_registers(0xD0, &mut id).unwrap();
        assert_eq!(id[0], 0x60);
        interface.release().0.done();
    }

    #[test]
    fn spi_write_clears_read_bit() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0x72, 0x01]),
            SpiTransaction::transaction_end(),
        ];
        let mut interface = SpiInterface::new(SpiMock::new(&expectations), TotalDelay::default());
        interface.write_register(0xF2, 0x01).unwrap();
        interface.release().0.done();
    }

    #[test]
    fn spi_burst_is_one_transaction() {
        let data = vec![0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00, 0x75, 0x30];
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0xF7]),
            SpiTransaction::read_vec(data.clone()),
            SpiTransaction::transaction_end(),
        ];
        let mut interface = SpiInterface::new(SpiMock::new(&expectations), TotalDelay::default());
        let mut buf = [0u8; 8];
        interface.read_registers(0xF7, &mut buf).unwrap();
        assert_eq!(&buf[..], &data[..]);
        interface.release().0.done();
    }

    #[test]
    fn spi_waits_on_its_delay_provider() {
        let mut interface = SpiInterface::new(SpiMock::new(&[]), TotalDelay::default());
        interface.delay_us(46100);
        interface.delay_us(1000);
        let (mut spi, delay) = interface.release();
        assert_eq!(delay.ns, 47_100_000);
        spi.done();
    }
}
