#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

impl Color {
    pub const TRANSPARENT: Color = Color(0, 0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255, 255);

    /// Parses `#RRGGBB` or `#RRGGBBAA`; malformed input yields opaque black.
    pub fn from_hex(hex: &str) -> Self {
        let s = hex.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>, fallback: u8| {
            s.get(range)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .unwrap_or(fallback)
        };
        match s.len() {
            6 => Color(channel(0..2, 0), channel(2..4, 0), channel(4..6, 0), 255),
            8 => Color(
                channel(0..2, 0),
                channel(2..4, 0),
                channel(4..6, 0),
                channel(6..8, 255),
            ),
            _ => Color(0, 0, 0, 255),
        }
    }

    pub fn to_hex(self) -> String {
        if self.3 == 255 {
            format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.0, self.1, self.2, self.3)
        }
    }
}
