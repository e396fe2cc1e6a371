//! Segment fonts for 7-segment digits.
//!
//! Bit layout is the TM16xx wiring convention: segment `a` is bit 0 through
//! segment `g` at bit 6, with the decimal point on bit 7 ([`DOT_SEGMENT`]).
//!
//! [`DOT_SEGMENT`]: crate::DOT_SEGMENT

pub const BLANK: u8 = 0x00;
pub const MINUS: u8 = 0x40;

/// First character code in [`FONT_DEFAULT`].
pub const FONT_OFFSET: u8 = 32;

/// Hexadecimal digits 0-F, indexed by value.
pub const NUMBER_FONT: [u8; 16] = [
    0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F, 0x77, 0x7C, 0x39, 0x5E, 0x79, 0x71,
];

/// Printable ASCII (32..=126), indexed by `code - FONT_OFFSET`.
pub const FONT_DEFAULT: [u8; 95] = [
    0x00, // ' '
    0x86, // !
    0x22, // "
    0x7E, // #
    0x6D, // $
    0x00, // %
    0x00, // &
    0x02, // '
    0x30, // (
    0x06, // )
    0x63, // *
    0x00, // +
    0x04, // ,
    0x40, // -
    0x80, // .
    0x52, // /
    0x3F, // 0
    0x06, // 1
    0x5B, // 2
    0x4F, // 3
    0x66, // 4
    0x6D, // 5
    0x7D, // 6
    0x27, // 7
    0x7F, // 8
    0x6F, // 9
    0x00, // :
    0x00, // ;
    0x00, // <
    0x48, // =
    0x00, // >
    0x53, // ?
    0x5F, // @
    0x77, // A
    0x7F, // B
    0x39, // C
    0x3F, // D
    0x79, // E
    0x71, // F
    0x3D, // G
    0x76, // H
    0x06, // I
    0x1F, // J
    0x69, // K
    0x38, // L
    0x15, // M
    0x37, // N
    0x3F, // O
    0x73, // P
    0x67, // Q
    0x31, // R
    0x6D, // S
    0x78, // T
    0x3E, // U
    0x2A, // V
    0x1D, // W
    0x76, // X
    0x6E, // Y
    0x5B, // Z
    0x39, // [
    0x64, // backslash
    0x0F, // ]
    0x00, // ^
    0x08, // _
    0x20, // `
    0x5F, // a
    0x7C, // b
    0x58, // c
    0x5E, // d
    0x7B, // e
    0x31, // f
    0x6F, // g
    0x74, // h
    0x04, // i
    0x0E, // j
    0x75, // k
    0x30, // l
    0x55, // m
    0x54, // n
    0x5C, // o
    0x73, // p
    0x67, // q
    0x50, // r
    0x6D, // s
    0x78, // t
    0x1C, // u
    0x2A, // v
    0x1D, // w
    0x76, // x
    0x6E, // y
    0x47, // z
    0x46, // {
    0x06, // |
    0x70, // }
    0x01, // ~
];

/// Looks up `c` in an ASCII font laid out like [`FONT_DEFAULT`].
///
/// Returns `None` for characters before [`FONT_OFFSET`] or past the end of the table.
pub fn ascii_glyph(font: &[u8], c: char) -> Option<u8> {
    let code = u32::from(c).checked_sub(u32::from(FONT_OFFSET))?;
    font.get(code as usize).copied()
}

/// Looks up a digit value in a numeric font laid out like [`NUMBER_FONT`].
pub fn digit_glyph(font: &[u8], digit: u8) -> Option<u8> {
    font.get(digit as usize).copied()
}
