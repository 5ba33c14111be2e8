/// Unit-range RGB colours, written as `#rrggbb` in config files
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0.0, 0.0, 0.0]);
    pub const WHITE: Rgb = Rgb([1.0, 1.0, 1.0]);

    /// Parse `#rrggbb`, mapping each channel byte onto `0.0..=1.0`.
    pub fn from_hex(value: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::Color {
            value: value.to_string(),
        };

        let digits = value.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }

        let mut out = [0.0; 3];
        for (i, channel) in out.iter_mut().enumerate() {
            let byte = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
            *channel = byte as f32 / 255.0;
        }
        Ok(Rgb(out))
    }

    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Pad to a 16-byte uniform slot.
    pub fn to_vec4(&self) -> [f32; 4] {
        [self.0[0], self.0[1], self.0[2], 0.0]
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex("#0000ff").unwrap(), Rgb([0.0, 0.0, 1.0]));
        assert_eq!(Rgb::from_hex("#FFFFFF").unwrap(), Rgb::WHITE);

        let grey = Rgb::from_hex("#191919").unwrap();
        assert!((grey.0[0] - 25.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_malformed() {
        for value in ["0000ff", "#00ff", "#00gg00", "#0000ff00", "#ééé", ""] {
            assert!(Rgb::from_hex(value).is_err(), "accepted {value:?}");
        }
    }

    #[test]
    fn test_hex_round_trip() {
        assert_eq!(Rgb::from_hex("#808080").unwrap().to_hex(), "#808080");
        assert_eq!("#12ab9f".parse::<Rgb>().unwrap().to_string(), "#12ab9f");
    }
}
