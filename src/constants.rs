pub const MAX_INTENSITY: u8 = 7; // 3 bits
pub const DEFAULT_INTENSITY: u8 = 7;
pub const MAX_GRIDS: usize = 16; // largest grid count in the family (TM1640)
pub const DOT_SEGMENT: u8 = 0x80;

pub mod command {
    pub const DATA_AUTO: u8 = 0x40; // write, address auto-increment
    pub const DATA_READ: u8 = 0x42; // read key scan data
    pub const DATA_FIXED: u8 = 0x44; // write, fixed address
    pub const DISPLAY: u8 = 0x80;
    pub const ADDRESS: u8 = 0xC0;

    pub mod display {
        pub const ON: u8 = 0x08; // bit 3: display on
        pub const INTENSITY_MASK: u8 = 0x07; // bits 2:0: pulse width
    }

    pub mod tm1668 {
        pub const DISPLAY_MODE_4X13: u8 = 0x00;
        pub const DISPLAY_MODE_5X12: u8 = 0x01;
        pub const DISPLAY_MODE_6X11: u8 = 0x02;
        pub const DISPLAY_MODE_7X10: u8 = 0x03;
    }

    pub mod tm1638 {
        pub const LED_RED: u8 = 0x01; // SEG9
        pub const LED_GREEN: u8 = 0x02; // SEG10
    }
}

/// Builds the display-control command byte, clamping `intensity` to 0-7.
pub const fn display_control(active: bool, intensity: u8) -> u8 {
    let intensity = if intensity > MAX_INTENSITY {
        MAX_INTENSITY
    } else {
        intensity
    };
    command::DISPLAY | if active { command::display::ON } else { 0 } | intensity
}
