//! Bit-banged bus framing shared by the TM16xx family.
//!
//! All chips shift bytes LSB first, driving data while the clock is low and
//! latching on the rising edge. They differ only in how a transaction is
//! framed: the three-wire parts use a strobe line, the two-wire parts use
//! I2C-like start/stop conditions on the data line.
//!
//! The data pin must be usable as both input and output, i.e. an open-drain
//! pin with a pull-up: driving it high releases the line so the chip can pull
//! it low when it answers.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Byte-level access to the bus.
///
/// Between [`start`](Transport::start) and [`stop`](Transport::stop) exactly one
/// command-or-data phase takes place; transactions do not nest.
pub trait Transport {
    type Error;

    fn start(&mut self) -> Result<(), Self::Error>;
    fn stop(&mut self) -> Result<(), Self::Error>;
    /// Shifts out 8 bits, least significant first.
    fn send(&mut self, data: u8) -> Result<(), Self::Error>;
    /// Shifts in 8 bits, least significant first.
    fn receive(&mut self) -> Result<u8, Self::Error>;
    /// Electrical settling pause around each clock transition.
    fn bit_delay(&mut self);
}

/// Three-wire bus (DIO, CLK, STB) used by the TM1638 and TM1668.
pub struct StrobeBus<DIO, CLK, STB, D> {
    dio: DIO,
    clk: CLK,
    stb: STB,
    delay: D,
    bit_delay_us: u32,
}

impl<DIO, CLK, STB, D, E> StrobeBus<DIO, CLK, STB, D>
where
    DIO: InputPin<Error = E> + OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    STB: OutputPin<Error = E>,
    D: DelayNs,
{
    pub fn new(dio: DIO, clk: CLK, stb: STB, delay: D, bit_delay_us: u32) -> Self {
        Self {
            dio,
            clk,
            stb,
            delay,
            bit_delay_us,
        }
    }

    pub fn release(self) -> (DIO, CLK, STB, D) {
        (self.dio, self.clk, self.stb, self.delay)
    }
}

impl<DIO, CLK, STB, D, E> Transport for StrobeBus<DIO, CLK, STB, D>
where
    DIO: InputPin<Error = E> + OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    STB: OutputPin<Error = E>,
    D: DelayNs,
{
    type Error = E;

    fn start(&mut self) -> Result<(), E> {
        self.stb.set_low()?;
        self.bit_delay();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), E> {
        self.stb.set_high()?;
        self.bit_delay();
        Ok(())
    }

    fn send(&mut self, data: u8) -> Result<(), E> {
        shift_out(&mut self.dio, &mut self.clk, &mut self.delay, self.bit_delay_us, data)?;
        // TM1638 wants at least 1us between bytes
        self.bit_delay();
        Ok(())
    }

    fn receive(&mut self) -> Result<u8, E> {
        shift_in(&mut self.dio, &mut self.clk, &mut self.delay, self.bit_delay_us)
    }

    fn bit_delay(&mut self) {
        self.delay.delay_us(self.bit_delay_us);
    }
}

/// Two-wire bus (DIO, CLK) used by the TM1637 and TM1640.
///
/// A transaction starts with DIO falling while CLK is high and stops with DIO
/// rising while CLK is high. The TM1637 acknowledges every byte in a ninth
/// clock cycle; the TM1640 does not.
pub struct TwoWireBus<DIO, CLK, D> {
    dio: DIO,
    clk: CLK,
    delay: D,
    bit_delay_us: u32,
    ack: bool,
}

impl<DIO, CLK, D, E> TwoWireBus<DIO, CLK, D>
where
    DIO: InputPin<Error = E> + OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    D: DelayNs,
{
    /// Bus with an acknowledge cycle after each byte (TM1637).
    pub fn with_ack(dio: DIO, clk: CLK, delay: D, bit_delay_us: u32) -> Self {
        Self {
            dio,
            clk,
            delay,
            bit_delay_us,
            ack: true,
        }
    }

    /// Bus without acknowledge cycles (TM1640).
    pub fn without_ack(dio: DIO, clk: CLK, delay: D, bit_delay_us: u32) -> Self {
        Self {
            dio,
            clk,
            delay,
            bit_delay_us,
            ack: false,
        }
    }

    pub fn release(self) -> (DIO, CLK, D) {
        (self.dio, self.clk, self.delay)
    }

    /// Clocks the ninth bit and returns whether the chip pulled DIO low.
    fn ack_cycle(&mut self) -> Result<bool, E> {
        self.clk.set_low()?;
        self.dio.set_high()?;
        self.bit_delay();
        self.clk.set_high()?;
        self.bit_delay();
        let acked = self.dio.is_low()?;
        self.clk.set_low()?;
        self.bit_delay();
        Ok(acked)
    }
}

impl<DIO, CLK, D, E> Transport for TwoWireBus<DIO, CLK, D>
where
    DIO: InputPin<Error = E> + OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    D: DelayNs,
{
    type Error = E;

    fn start(&mut self) -> Result<(), E> {
        self.dio.set_low()?;
        self.bit_delay();
        self.clk.set_low()?;
        self.bit_delay();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), E> {
        self.clk.set_low()?;
        self.dio.set_low()?;
        self.bit_delay();
        self.clk.set_high()?;
        self.bit_delay();
        self.dio.set_high()?;
        self.bit_delay();
        Ok(())
    }

    fn send(&mut self, data: u8) -> Result<(), E> {
        shift_out(&mut self.dio, &mut self.clk, &mut self.delay, self.bit_delay_us, data)?;
        if self.ack {
            let acked = self.ack_cycle()?;
            if !acked {
                // wiring or timing fault; nothing the driver can do about it
                #[cfg(feature = "defmt")]
                defmt::warn!("tm16xx: no ack after byte {=u8:#x}", data);
            }
        }
        Ok(())
    }

    fn receive(&mut self) -> Result<u8, E> {
        let data = shift_in(&mut self.dio, &mut self.clk, &mut self.delay, self.bit_delay_us)?;
        if self.ack {
            self.ack_cycle()?;
        }
        Ok(data)
    }

    fn bit_delay(&mut self) {
        self.delay.delay_us(self.bit_delay_us);
    }
}

fn shift_out<DIO, CLK, D, E>(
    dio: &mut DIO,
    clk: &mut CLK,
    delay: &mut D,
    bit_delay_us: u32,
    mut data: u8,
) -> Result<(), E>
where
    DIO: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    D: DelayNs,
{
    for _ in 0..8 {
        clk.set_low()?;
        delay.delay_us(bit_delay_us);
        if data & 0x01 != 0 {
            dio.set_high()?;
        } else {
            dio.set_low()?;
        }
        delay.delay_us(bit_delay_us);
        data >>= 1;
        clk.set_high()?;
        delay.delay_us(bit_delay_us);
    }
    Ok(())
}

fn shift_in<DIO, CLK, D, E>(
    dio: &mut DIO,
    clk: &mut CLK,
    delay: &mut D,
    bit_delay_us: u32,
) -> Result<u8, E>
where
    DIO: InputPin<Error = E> + OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    D: DelayNs,
{
    // release the line, the chip drives it from here
    dio.set_high()?;

    let mut data = 0;
    for _ in 0..8 {
        data >>= 1;
        clk.set_low()?;
        delay.delay_us(bit_delay_us);
        if dio.is_high()? {
            data |= 0x80;
        }
        clk.set_high()?;
        delay.delay_us(bit_delay_us);
    }
    Ok(data)
}
