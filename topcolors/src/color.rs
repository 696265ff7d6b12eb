use std::fmt;

use image::Rgb;

const RGB_MASK: u32 = 0x00FF_FFFF;

/// A color as `0xRRGGBB`. Equal colors always have equal keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rgb24(u32);

impl Rgb24 {
    pub fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(u32::from(red) << 16 | u32::from(green) << 8 | u32::from(blue))
    }

    pub fn from_pixel(pixel: Rgb<u8>) -> Self {
        let [red, green, blue] = pixel.0;
        Self::from_rgb(red, green, blue)
    }

    /// Anything above the low 24 bits, like an alpha byte in `0xAARRGGBB`, is dropped.
    pub fn from_packed(packed: u32) -> Self {
        Self(packed & RGB_MASK)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Rgb24 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// A color slot in the output, `NULL` when there is no color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HexToken(pub Option<Rgb24>);

impl HexToken {
    pub const NULL: &'static str = "NULL";
}

impl fmt::Display for HexToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(color) => fmt::Display::fmt(&color, f),
            None => f.write_str(Self::NULL),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse_hex(hex: &str) -> u32 {
        u32::from_str_radix(hex.strip_prefix('#').expect("has a hash"), 16)
            .expect("is hex")
    }

    #[test]
    fn hex_is_zero_padded_uppercase() {
        assert_eq!("#000000", Rgb24::from_rgb(0, 0, 0).to_string());
        assert_eq!("#00000A", Rgb24::from_packed(0xa).to_string());
        assert_eq!("#FF0000", Rgb24::from_rgb(255, 0, 0).to_string());
        assert_eq!("#0A0B0C", Rgb24::from_pixel(Rgb([10, 11, 12])).to_string());
        assert_eq!("#FFFFFF", Rgb24::from_rgb(255, 255, 255).to_string());
    }

    #[test]
    fn hex_parses_back() {
        for c in (0..=RGB_MASK).step_by(9973).chain([RGB_MASK]) {
            let hex = Rgb24::from_packed(c).to_string();
            assert_eq!(7, hex.len());
            assert_eq!(c, parse_hex(&hex));
        }
    }

    #[test]
    fn alpha_is_masked_away() {
        assert_eq!(Rgb24::from_rgb(0x12, 0x34, 0x56), Rgb24::from_packed(0xFF12_3456));
        assert_eq!("#123456", Rgb24::from_packed(0x8012_3456).to_string());
    }

    #[test]
    fn null_token() {
        assert_eq!("NULL", HexToken(None).to_string());
        assert_eq!("#112233", HexToken(Some(Rgb24::from_packed(0x112233))).to_string());
    }
}
