#![no_std]

pub mod bus;
pub mod chip;
mod constants;
pub mod fonts;

use core::marker::PhantomData;

pub use bus::{StrobeBus, Transport, TwoWireBus};
pub use chip::{Chip, TM1637, TM1638, TM1640, TM1668};
pub use constants::*;
use num_traits::ToPrimitive;

/// How out-of-range input is handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bounds {
    /// Clamp or drop whatever does not fit and report success.
    #[default]
    Truncate,
    /// Report out-of-range input as an error before sending it.
    Strict,
}

/// Display power state applied by [`TM16xx::init`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    pub active: bool,
    pub intensity: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            active: true,
            intensity: DEFAULT_INTENSITY,
        }
    }
}

pub struct TM16xx<C, BUS, const DIGITS: u8> {
    pub bus: BUS,
    bounds: Bounds,
    shadow: [u16; MAX_GRIDS], // last segments written to each grid
    _chip: PhantomData<C>,
}

impl<C, BUS, const DIGITS: u8> TM16xx<C, BUS, DIGITS>
where
    C: Chip,
    BUS: Transport,
{
    pub fn new(bus: BUS) -> Self {
        Self {
            bus,
            bounds: Bounds::Truncate,
            shadow: [0; MAX_GRIDS],
            _chip: PhantomData,
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn destroy(self) -> BUS {
        self.bus
    }

    /// Brings the chip to a known state: chip setup commands, blank display, then `config`.
    pub fn init(&mut self, config: DisplayConfig) -> Result<(), TM16xxError<BUS::Error>> {
        for &cmd in C::SETUP_COMMANDS {
            self.send_command(cmd)?;
        }
        self.clear_display()?;
        self.setup_display(config.active, config.intensity)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "tm16xx: init {=u8} digits, active={=bool} intensity={=u8}",
            self.num_digits(),
            config.active,
            config.intensity
        );
        Ok(())
    }

    /// Number of digits used for numbers and text.
    pub fn num_digits(&self) -> u8 {
        DIGITS.min(C::MAX_DISPLAYS)
    }

    /// Turns the display on or off and sets its intensity (0-7).
    ///
    /// The chip forgets this on power loss; call again after a reset.
    pub fn setup_display(
        &mut self,
        active: bool,
        intensity: u8,
    ) -> Result<(), TM16xxError<BUS::Error>> {
        if intensity > MAX_INTENSITY {
            self.reject(TM16xxError::InvalidValue)?;
        }
        self.send_command(display_control(active, intensity))
    }

    /// Blanks positions `0..num_digits()` in one auto-increment write.
    pub fn clear_display(&mut self) -> Result<(), TM16xxError<BUS::Error>> {
        let digits = self.num_digits();
        let blank = [fonts::BLANK; MAX_GRIDS * 2];
        let len = (digits * C::bytes_per_grid()) as usize;
        self.send_data_burst(C::grid_address(0), &blank[..len])?;
        for segments in self.shadow.iter_mut().take(digits as usize) {
            *segments = 0;
        }
        Ok(())
    }

    /// Writes the low 8 segments of `position` verbatim.
    pub fn set_segments(
        &mut self,
        segments: u8,
        position: u8,
    ) -> Result<(), TM16xxError<BUS::Error>> {
        self.write_grid(position, segments)
    }

    /// Writes up to 16 segments of `position` verbatim.
    ///
    /// Segments beyond what the chip drives are dropped; on 8-segment chips
    /// only the low byte is sent.
    pub fn set_segments16(
        &mut self,
        segments: u16,
        position: u8,
    ) -> Result<(), TM16xxError<BUS::Error>> {
        if C::MAX_SEGMENTS <= 8 {
            return self.write_grid(position, (segments & 0xFF) as u8);
        }
        if position >= C::MAX_DISPLAYS {
            return self.reject(TM16xxError::InvalidLocation(position));
        }
        let address = C::grid_address(position);
        let upper = (segments >> 8) as u8 & C::upper_segment_mask();
        self.send_data(address, (segments & 0xFF) as u8)?;
        self.send_data(address + 1, upper)?;
        self.shadow[position as usize] = u16::from(upper) << 8 | segments & 0xFF;
        Ok(())
    }

    /// Shows `font[digit]` at `pos`. Values above 15 are masked to 0-15 unless strict.
    pub fn set_display_digit(
        &mut self,
        digit: u8,
        pos: u8,
        dot: bool,
        font: &[u8],
    ) -> Result<(), TM16xxError<BUS::Error>> {
        if digit > 0x0F {
            self.reject(TM16xxError::InvalidValue)?;
        }
        let data = match fonts::digit_glyph(font, digit & 0x0F) {
            Some(data) => data,
            None => {
                self.reject(TM16xxError::InvalidValue)?;
                fonts::BLANK
            }
        };
        self.send_char(pos, data, dot)
    }

    /// Shows `number` right-aligned, blank padded, with a leading minus when negative.
    ///
    /// Digits that do not fit are dropped from the left, the minus sign first.
    /// Bit *i* of `dots` lights the decimal point at position *i*.
    pub fn set_display_to_dec_number<T>(
        &mut self,
        number: T,
        dots: u16,
    ) -> Result<(), TM16xxError<BUS::Error>>
    where
        T: ToPrimitive,
    {
        let number = number.to_i64().ok_or(TM16xxError::InvalidValue)?;
        let digits = self.num_digits();
        let negative = number < 0;
        let mut num = number.unsigned_abs();

        let mut width = 1;
        let mut rest = num / 10;
        while rest > 0 {
            width += 1;
            rest /= 10;
        }
        if negative {
            width += 1;
        }
        if width > u32::from(digits) {
            self.reject(TM16xxError::InvalidValue)?;
        }

        let mut sign_pending = negative;
        let mut first = true;
        for pos in (0..digits).rev() {
            let data = if first || num > 0 {
                first = false;
                let digit = (num % 10) as usize;
                num /= 10;
                fonts::NUMBER_FONT[digit]
            } else if sign_pending {
                sign_pending = false;
                fonts::MINUS
            } else {
                fonts::BLANK
            };
            self.send_char(pos, data, dots & (1 << pos) != 0)?;
        }
        Ok(())
    }

    /// Shows `number` in hexadecimal, zero padded; high-order digits that do not fit are dropped.
    pub fn set_display_to_hex_number<T>(
        &mut self,
        number: T,
        dots: u16,
    ) -> Result<(), TM16xxError<BUS::Error>>
    where
        T: ToPrimitive,
    {
        let mut num = number.to_u64().ok_or(TM16xxError::InvalidValue)?;
        let digits = self.num_digits();
        if u32::from(digits) < 16 && num >> (4 * u32::from(digits)) != 0 {
            self.reject(TM16xxError::InvalidValue)?;
        }
        for pos in (0..digits).rev() {
            let digit = (num % 16) as usize;
            self.send_char(pos, fonts::NUMBER_FONT[digit], dots & (1 << pos) != 0)?;
            num /= 16;
        }
        Ok(())
    }

    /// Blanks `pos`, keeping the decimal point if `dot` is set.
    pub fn clear_display_digit(
        &mut self,
        pos: u8,
        dot: bool,
    ) -> Result<(), TM16xxError<BUS::Error>> {
        self.send_char(pos, fonts::BLANK, dot)
    }

    /// Writes raw segment bytes to positions `0..values.len()`.
    pub fn set_display(&mut self, values: &[u8]) -> Result<(), TM16xxError<BUS::Error>> {
        for (pos, &value) in values.iter().enumerate() {
            if pos >= C::MAX_DISPLAYS as usize {
                let pos = pos.min(u8::MAX as usize) as u8;
                return self.reject(TM16xxError::InvalidLocation(pos));
            }
            self.send_char(pos as u8, value, false)?;
        }
        Ok(())
    }

    /// Shows `string` from position `pos` using an ASCII `font`.
    ///
    /// Stops at a `'\0'` or once the digits run out. Bit *i* of `dots` lights
    /// the decimal point at position *i*.
    pub fn set_display_to_string(
        &mut self,
        string: &str,
        dots: u16,
        pos: u8,
        font: &[u8],
    ) -> Result<(), TM16xxError<BUS::Error>> {
        let digits = self.num_digits();
        let mut position = pos;
        for c in string.chars() {
            if c == '\0' {
                break;
            }
            if position >= digits {
                return self.reject(TM16xxError::InvalidLocation(position));
            }
            self.send_font_char(position, c, dots & (1 << position) != 0, font)?;
            position += 1;
        }
        Ok(())
    }

    /// ORs the decimal point into `data` and writes it to `pos`.
    pub fn send_char(
        &mut self,
        pos: u8,
        data: u8,
        dot: bool,
    ) -> Result<(), TM16xxError<BUS::Error>> {
        self.write_grid(pos, data | if dot { DOT_SEGMENT } else { 0 })
    }

    /// Shows `c` at `pos` using [`fonts::FONT_DEFAULT`].
    pub fn send_ascii_char(
        &mut self,
        pos: u8,
        c: char,
        dot: bool,
    ) -> Result<(), TM16xxError<BUS::Error>> {
        self.send_font_char(pos, c, dot, &fonts::FONT_DEFAULT)
    }

    /// Last segments written to `pos`, as far as this driver knows.
    pub fn segments(&self, pos: u8) -> Option<u16> {
        if pos < C::MAX_DISPLAYS {
            Some(self.shadow[pos as usize])
        } else {
            None
        }
    }

    /// Lights or clears the decimal point at `pos`, keeping its other segments.
    pub fn set_dot(&mut self, pos: u8, on: bool) -> Result<(), TM16xxError<BUS::Error>> {
        let Some(current) = self.segments(pos) else {
            return self.reject(TM16xxError::InvalidLocation(pos));
        };
        let data = (current & 0xFF) as u8 & !DOT_SEGMENT;
        self.send_char(pos, data, on)
    }

    /// Polls the key-scan inputs; bit *i* set means key *i* is pressed.
    pub fn read_buttons(&mut self) -> Result<u32, TM16xxError<BUS::Error>> {
        Ok(C::read_buttons(&mut self.bus)?)
    }

    /// Sends one command byte in its own transaction.
    pub fn send_command(&mut self, cmd: u8) -> Result<(), TM16xxError<BUS::Error>> {
        self.bus.start()?;
        self.bus.send(cmd)?;
        self.bus.stop()?;
        Ok(())
    }

    /// Writes one byte of display RAM using fixed addressing.
    pub fn send_data(&mut self, address: u8, data: u8) -> Result<(), TM16xxError<BUS::Error>> {
        if address >= C::ram_size() {
            return self.reject(TM16xxError::InvalidLocation(address));
        }
        self.send_command(command::DATA_FIXED)?;
        self.bus.start()?;
        self.bus.send(command::ADDRESS | address)?;
        self.bus.send(data)?;
        self.bus.stop()?;
        Ok(())
    }

    /// Writes consecutive bytes of display RAM from `address` using auto-increment.
    ///
    /// Bytes past the end of the RAM are not sent.
    pub fn send_data_burst(
        &mut self,
        address: u8,
        data: &[u8],
    ) -> Result<(), TM16xxError<BUS::Error>> {
        let ram_size = C::ram_size();
        if address >= ram_size {
            return self.reject(TM16xxError::InvalidLocation(address));
        }
        let room = (ram_size - address) as usize;
        if data.len() > room {
            self.reject(TM16xxError::InvalidLocation(ram_size))?;
        }
        self.send_command(command::DATA_AUTO)?;
        self.bus.start()?;
        self.bus.send(command::ADDRESS | address)?;
        for &byte in data.iter().take(room) {
            self.bus.send(byte)?;
        }
        self.bus.stop()?;
        Ok(())
    }

    fn send_font_char(
        &mut self,
        pos: u8,
        c: char,
        dot: bool,
        font: &[u8],
    ) -> Result<(), TM16xxError<BUS::Error>> {
        let data = match fonts::ascii_glyph(font, c) {
            Some(data) => data,
            None => {
                self.reject(TM16xxError::InvalidValue)?;
                fonts::BLANK
            }
        };
        self.send_char(pos, data, dot)
    }

    // Single-byte grid write; upper segments of wide grids are left as they are.
    fn write_grid(&mut self, position: u8, data: u8) -> Result<(), TM16xxError<BUS::Error>> {
        if position >= C::MAX_DISPLAYS {
            return self.reject(TM16xxError::InvalidLocation(position));
        }
        self.send_data(C::grid_address(position), data)?;
        let shadow = &mut self.shadow[position as usize];
        *shadow = (*shadow & 0xFF00) | u16::from(data);
        Ok(())
    }

    fn reject(&self, error: TM16xxError<BUS::Error>) -> Result<(), TM16xxError<BUS::Error>> {
        match self.bounds {
            Bounds::Truncate => Ok(()),
            Bounds::Strict => Err(error),
        }
    }
}

impl<BUS, const DIGITS: u8> TM16xx<TM1638, BUS, DIGITS>
where
    BUS: Transport,
{
    /// Drives the LEDs on SEG9 (red) and SEG10 (green) of grid `pos`.
    pub fn set_led(&mut self, color: u8, pos: u8) -> Result<(), TM16xxError<BUS::Error>> {
        if pos >= TM1638::MAX_DISPLAYS {
            return self.reject(TM16xxError::InvalidLocation(pos));
        }
        let color = color & TM1638::upper_segment_mask();
        self.send_data(TM1638::grid_address(pos) + 1, color)?;
        let shadow = &mut self.shadow[pos as usize];
        *shadow = (*shadow & 0x00FF) | u16::from(color) << 8;
        Ok(())
    }

    /// Sets all eight LED pairs: bit *i* lights red at *i*, bit *i + 8* lights green at *i*.
    pub fn set_leds(&mut self, leds: u16) -> Result<(), TM16xxError<BUS::Error>> {
        for pos in 0..TM1638::MAX_DISPLAYS {
            let mut color = 0;
            if leds & (1 << pos) != 0 {
                color |= command::tm1638::LED_RED;
            }
            if leds & (1 << (pos + 8)) != 0 {
                color |= command::tm1638::LED_GREEN;
            }
            self.set_led(color, pos)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TM16xxError<E> {
    BusError(E),
    InvalidValue,
    InvalidLocation(u8),
}

impl<E> From<E> for TM16xxError<E> {
    fn from(error: E) -> Self {
        TM16xxError::BusError(error)
    }
}
