//! Feature color helpers.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use rand::Rng;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Generate a random `#RRGGBB` color for a newly created feature.
#[must_use]
pub fn generate_color() -> String {
    let mut rng = rand::rng();
    let mut color = String::with_capacity(7);
    color.push('#');
    for _ in 0..6 {
        color.push(char::from(HEX_DIGITS[rng.random_range(0..HEX_DIGITS.len())]));
    }
    color
}

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?.as_bytes();
    match *hex {
        [r, g, b] => Some((nibble(r)? * 17, nibble(g)? * 17, nibble(b)? * 17)),
        [r1, r2, g1, g2, b1, b2] => Some((byte(r1, r2)?, byte(g1, g2)?, byte(b1, b2)?)),
        _ => None,
    }
}

fn byte(high: u8, low: u8) -> Option<u8> {
    Some((nibble(high)? << 4) | nibble(low)?)
}

fn nibble(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

/// Normalize a color to canonical lowercase `#rrggbb`, if it parses.
#[must_use]
pub fn normalize_hex_color(value: &str) -> Option<String> {
    let (r, g, b) = parse_hex_rgb(value)?;
    Some(format!("#{r:02x}{g:02x}{b:02x}"))
}

/// Color used to draw a feature: its own `color` property or `fallback`.
#[must_use]
pub fn feature_color_or<'a>(color: Option<&'a str>, fallback: &'a str) -> &'a str {
    color.filter(|c| !c.trim().is_empty()).unwrap_or(fallback)
}
