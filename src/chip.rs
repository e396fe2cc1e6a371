//! Per-chip constants, constructors and key-scan decoding.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::bus::{StrobeBus, TwoWireBus, Transport};
use crate::constants::command;
use crate::TM16xx;

/// What sets one TM16xx variant apart from the others.
pub trait Chip {
    /// Number of grids (digit positions) the chip can drive.
    const MAX_DISPLAYS: u8;
    /// Segment lines per grid; above 8 each grid takes two bytes of RAM.
    const MAX_SEGMENTS: u8;
    /// Pause around each clock edge, in microseconds.
    const BIT_DELAY_US: u32;
    /// Commands sent once by [`TM16xx::init`] before anything else.
    const SETUP_COMMANDS: &'static [u8] = &[];

    /// Bytes of display RAM per grid.
    fn bytes_per_grid() -> u8 {
        if Self::MAX_SEGMENTS > 8 {
            2
        } else {
            1
        }
    }

    /// Size of the display RAM in bytes.
    fn ram_size() -> u8 {
        Self::MAX_DISPLAYS * Self::bytes_per_grid()
    }

    /// RAM address of the first byte of `position`.
    fn grid_address(position: u8) -> u8 {
        position * Self::bytes_per_grid()
    }

    /// Mask of the segment lines held in the second RAM byte of a grid.
    fn upper_segment_mask() -> u8 {
        if Self::MAX_SEGMENTS > 8 {
            (((1u16 << (Self::MAX_SEGMENTS - 8)) - 1) & 0xFF) as u8
        } else {
            0
        }
    }

    /// Reads the key-scan data, bit *i* set meaning key *i* is pressed.
    ///
    /// Chips without key scanning report nothing pressed.
    fn read_buttons<B: Transport>(bus: &mut B) -> Result<u32, B::Error> {
        let _ = bus;
        Ok(0)
    }
}

/// 6 grids x 8 segments, two-wire with acknowledge, 8x2 keys.
pub struct TM1637;

/// 8 grids x 10 segments, three-wire, 8x3 keys.
pub struct TM1638;

/// 16 grids x 8 segments, two-wire, no keys.
pub struct TM1640;

/// 7 grids x 10 segments, three-wire, 10x2 keys.
pub struct TM1668;

impl Chip for TM1637 {
    const MAX_DISPLAYS: u8 = 6;
    const MAX_SEGMENTS: u8 = 8;
    // key reads must stay below 250kHz
    const BIT_DELAY_US: u32 = 5;

    fn read_buttons<B: Transport>(bus: &mut B) -> Result<u32, B::Error> {
        bus.start()?;
        bus.send(command::DATA_READ)?;
        let code = bus.receive()?;
        bus.stop()?;
        Ok(decode_tm1637_keys(code))
    }
}

impl Chip for TM1638 {
    const MAX_DISPLAYS: u8 = 8;
    const MAX_SEGMENTS: u8 = 10;
    const BIT_DELAY_US: u32 = 1;

    fn read_buttons<B: Transport>(bus: &mut B) -> Result<u32, B::Error> {
        let mut scan = [0; 4];
        bus.start()?;
        bus.send(command::DATA_READ)?;
        for byte in scan.iter_mut() {
            *byte = bus.receive()?;
        }
        bus.stop()?;
        Ok(decode_tm1638_keys(&scan))
    }
}

impl Chip for TM1640 {
    const MAX_DISPLAYS: u8 = 16;
    const MAX_SEGMENTS: u8 = 8;
    const BIT_DELAY_US: u32 = 1;
}

impl Chip for TM1668 {
    const MAX_DISPLAYS: u8 = 7;
    const MAX_SEGMENTS: u8 = 10;
    const BIT_DELAY_US: u32 = 1;
    const SETUP_COMMANDS: &'static [u8] = &[command::tm1668::DISPLAY_MODE_7X10];

    fn read_buttons<B: Transport>(bus: &mut B) -> Result<u32, B::Error> {
        let mut scan = [0; 5];
        bus.start()?;
        bus.send(command::DATA_READ)?;
        for byte in scan.iter_mut() {
            *byte = bus.receive()?;
        }
        bus.stop()?;
        Ok(decode_tm1668_keys(&scan))
    }
}

/// TM1637 returns a single key code: `0xFF` when idle, `0xF7..=0xF0` for
/// K1 with SG1..SG8 and `0xEF..=0xE8` for K2 with SG1..SG8.
pub fn decode_tm1637_keys(code: u8) -> u32 {
    let line = match code & 0xF8 {
        0xF0 => 0,
        0xE8 => 1,
        _ => return 0,
    };
    let seg = 7 - (code & 0x07) as u32;
    1 << (line * 8 + seg)
}

/// TM1638 byte *i*: bits 0-2 are K1-K3 on SEG(2i+1), bits 4-6 are K1-K3 on SEG(2i+2).
pub fn decode_tm1638_keys(scan: &[u8; 4]) -> u32 {
    let mut keys = 0;
    for (i, byte) in scan.iter().enumerate() {
        for bit in [0, 1, 2, 4, 5, 6] {
            if byte & (1 << bit) != 0 {
                let seg = 2 * i as u32 + (bit >> 2);
                let line = bit & 0x03;
                keys |= 1 << (line * 8 + seg);
            }
        }
    }
    keys
}

/// TM1668 byte *i*: bits 0-1 are K1-K2 on KS(2i+1), bits 3-4 are K1-K2 on KS(2i+2).
pub fn decode_tm1668_keys(scan: &[u8; 5]) -> u32 {
    let mut keys = 0;
    for (i, byte) in scan.iter().enumerate() {
        for bit in [0, 1, 3, 4] {
            if byte & (1 << bit) != 0 {
                let ks = 2 * i as u32 + u32::from(bit >= 3);
                let line = bit % 3;
                keys |= 1 << (line * 10 + ks);
            }
        }
    }
    keys
}

impl<DIO, CLK, D, E, const DIGITS: u8> TM16xx<TM1637, TwoWireBus<DIO, CLK, D>, DIGITS>
where
    DIO: InputPin<Error = E> + OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    D: DelayNs,
{
    pub fn tm1637(dio: DIO, clk: CLK, delay: D) -> Self {
        Self::new(TwoWireBus::with_ack(dio, clk, delay, TM1637::BIT_DELAY_US))
    }
}

impl<DIO, CLK, STB, D, E, const DIGITS: u8> TM16xx<TM1638, StrobeBus<DIO, CLK, STB, D>, DIGITS>
where
    DIO: InputPin<Error = E> + OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    STB: OutputPin<Error = E>,
    D: DelayNs,
{
    pub fn tm1638(dio: DIO, clk: CLK, stb: STB, delay: D) -> Self {
        Self::new(StrobeBus::new(dio, clk, stb, delay, TM1638::BIT_DELAY_US))
    }
}

impl<DIO, CLK, D, E, const DIGITS: u8> TM16xx<TM1640, TwoWireBus<DIO, CLK, D>, DIGITS>
where
    DIO: InputPin<Error = E> + OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    D: DelayNs,
{
    pub fn tm1640(dio: DIO, clk: CLK, delay: D) -> Self {
        Self::new(TwoWireBus::without_ack(dio, clk, delay, TM1640::BIT_DELAY_US))
    }
}

impl<DIO, CLK, STB, D, E, const DIGITS: u8> TM16xx<TM1668, StrobeBus<DIO, CLK, STB, D>, DIGITS>
where
    DIO: InputPin<Error = E> + OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    STB: OutputPin<Error = E>,
    D: DelayNs,
{
    pub fn tm1668(dio: DIO, clk: CLK, stb: STB, delay: D) -> Self {
        Self::new(StrobeBus::new(dio, clk, stb, delay, TM1668::BIT_DELAY_US))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tm1637_key_codes() {
        assert_eq!(decode_tm1637_keys(0xFF), 0);
        assert_eq!(decode_tm1637_keys(0xF7), 1 << 0); // K1 SG1
        assert_eq!(decode_tm1637_keys(0xF0), 1 << 7); // K1 SG8
        assert_eq!(decode_tm1637_keys(0xEF), 1 << 8); // K2 SG1
        assert_eq!(decode_tm1637_keys(0xE8), 1 << 15); // K2 SG8
        assert_eq!(decode_tm1637_keys(0x00), 0);
    }

    #[test]
    fn tm1638_scan_bytes() {
        assert_eq!(decode_tm1638_keys(&[0, 0, 0, 0]), 0);
        assert_eq!(decode_tm1638_keys(&[0x01, 0, 0, 0]), 1 << 0); // K1 SEG1
        assert_eq!(decode_tm1638_keys(&[0x10, 0, 0, 0]), 1 << 1); // K1 SEG2
        assert_eq!(decode_tm1638_keys(&[0, 0, 0, 0x10]), 1 << 7); // K1 SEG8
        assert_eq!(decode_tm1638_keys(&[0x02, 0, 0, 0]), 1 << 8); // K2 SEG1
        assert_eq!(decode_tm1638_keys(&[0, 0, 0, 0x40]), 1 << 23); // K3 SEG8
        assert_eq!(
            decode_tm1638_keys(&[0x11, 0x11, 0x11, 0x11]),
            0xFF,
            "all K1 keys"
        );
    }

    #[test]
    fn tm1668_scan_bytes() {
        assert_eq!(decode_tm1668_keys(&[0x01, 0, 0, 0, 0]), 1 << 0); // K1 KS1
        assert_eq!(decode_tm1668_keys(&[0x08, 0, 0, 0, 0]), 1 << 1); // K1 KS2
        assert_eq!(decode_tm1668_keys(&[0x02, 0, 0, 0, 0]), 1 << 10); // K2 KS1
        assert_eq!(decode_tm1668_keys(&[0, 0, 0, 0, 0x10]), 1 << 19); // K2 KS10
    }

    #[test]
    fn ram_layout() {
        assert_eq!(TM1638::ram_size(), 16);
        assert_eq!(TM1638::grid_address(3), 6);
        assert_eq!(TM1638::upper_segment_mask(), 0x03);
        assert_eq!(TM1640::ram_size(), 16);
        assert_eq!(TM1640::grid_address(3), 3);
        assert_eq!(TM1640::upper_segment_mask(), 0);
        assert_eq!(TM1668::ram_size(), 14);
    }
}
