//! RGB color values and lenient hex parsing.

use log::warn;

/// An RGB color triple.
///
/// # Examples
///
/// ```
/// use slideforge::Rgb;
///
/// assert_eq!(Rgb::parse("#1A2B3C"), Rgb::new(0x1A, 0x2B, 0x3C));
/// assert_eq!(Rgb::parse("not a color"), Rgb::BLACK);
/// assert_eq!(Rgb::new(255, 0, 128).hex(), "FF0080");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Black, the fallback for anything that fails to parse.
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `RRGGBB` hex string, with an optional leading `#`.
    ///
    /// A mutation must never abort because a caller sent a malformed color,
    /// so any violation (wrong length, non-hex characters, empty input)
    /// yields black instead of an error.
    pub fn parse(input: &str) -> Rgb {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            if !hex.is_empty() {
                warn!("invalid hex color '{input}', defaulting to black");
            }
            return Rgb::BLACK;
        }

        // Length and digit checks above make these infallible.
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).unwrap_or(0)
        };
        Rgb::new(channel(0..2), channel(2..4), channel(4..6))
    }

    /// Format as the six-digit uppercase hex form used in DrawingML
    /// (`<a:srgbClr val="RRGGBB"/>`).
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_plain_and_hash() {
        assert_eq!(Rgb::parse("FF0000"), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::parse("#00ff00"), Rgb::new(0, 255, 0));
        assert_eq!(Rgb::parse("  #0000Ff "), Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_parse_rejects_to_black() {
        for bad in ["", "#", "FFF", "FF00000", "GG0000", "#12345", "red"] {
            assert_eq!(Rgb::parse(bad), Rgb::BLACK, "input: {bad:?}");
        }
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(Rgb::new(0x0A, 0xB0, 0xFF).hex(), "0AB0FF");
        assert_eq!(Rgb::BLACK.hex(), "000000");
    }

    proptest! {
        #[test]
        fn prop_valid_hex_round_trips(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255, hash in proptest::bool::ANY) {
            let formatted = format!("{}{:02X}{:02X}{:02X}", if hash { "#" } else { "" }, r, g, b);
            prop_assert_eq!(Rgb::parse(&formatted), Rgb::new(r, g, b));
        }

        #[test]
        fn prop_invalid_input_is_black(s in "[^0-9A-Fa-f]{0,12}") {
            // No six-hex-digit payload can hide in a string with no hex digits
            prop_assert_eq!(Rgb::parse(&s), Rgb::BLACK);
        }
    }
}
