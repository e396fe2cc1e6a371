#![no_std]
#![no_main]

use arduino_hal::prelude::*;
use panic_halt as _;
use tm16xx::{fonts, DisplayConfig, TM16xx, TM1638};

const NUM_DIGITS: u8 = 8; // TM1638 boards carry 8 seven-segment digits
const DEFAULT_INTENSITY: u8 = 3;

#[arduino_hal::entry]
fn main() -> ! {
    let dp = arduino_hal::Peripherals::take().unwrap();
    let pins = arduino_hal::pins!(dp);
    let mut serial = arduino_hal::default_serial!(dp, pins, 57600);

    let mut display: TM16xx<TM1638, _, NUM_DIGITS> = TM16xx::tm1638(
        pins.d8.into_opendrain_high(),
        pins.d9.into_output_high(),
        pins.d7.into_output_high(),
        arduino_hal::Delay::new(),
    );
    display
        .init(DisplayConfig {
            active: true,
            intensity: DEFAULT_INTENSITY,
        })
        .unwrap();

    ufmt::uwriteln!(&mut serial, "Setting intensity...").unwrap_infallible();
    for intensity in 0..=tm16xx::MAX_INTENSITY {
        display.setup_display(true, intensity).unwrap();
        display
            .set_display_digit(intensity, intensity, false, &fonts::NUMBER_FONT)
            .unwrap();
        arduino_hal::delay_ms(200);
    }
    display.setup_display(true, DEFAULT_INTENSITY).unwrap();

    ufmt::uwriteln!(&mut serial, "Scrolling text...").unwrap_infallible();
    let msg = "        tm1638 says hello        ";
    for offset in 0..=(msg.len() - NUM_DIGITS as usize) {
        display
            .set_display_to_string(&msg[offset..], 0, 0, &fonts::FONT_DEFAULT)
            .unwrap();
        arduino_hal::delay_ms(200);
    }

    ufmt::uwriteln!(&mut serial, "Counting up, buttons light LEDs...").unwrap_infallible();
    let mut i: i32 = -99;
    loop {
        display.set_display_to_dec_number(i, 0).unwrap();
        let buttons = display.read_buttons().unwrap();
        display.set_leds((buttons & 0xFFFF) as u16).unwrap();
        i += 1;

        arduino_hal::delay_ms(300);
    }
}
