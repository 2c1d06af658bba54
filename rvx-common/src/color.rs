//! Net-sentiment color mapping
//!
//! Every heatmap cell is filled through [`net_to_color`] so that the same
//! net sentiment renders identically across the whole application.

use serde::Serialize;
use std::fmt;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Neutral fill (net = 0)
pub const WHITE: Rgb = Rgb::new(255, 255, 255);
/// Fully positive fill (net = 1)
pub const GREEN: Rgb = Rgb::new(22, 163, 74);
/// Fully negative fill (net = -1)
pub const RED: Rgb = Rgb::new(220, 38, 38);

/// Map net sentiment in `[-1, 1]` to a fill color
///
/// Positive values blend white → green by `net`, negative values blend
/// red → white by `net + 1`. Out-of-range input is clamped and non-finite
/// input is treated as 0.
pub fn net_to_color(net: f64) -> Rgb {
    let net = if net.is_finite() { net.clamp(-1.0, 1.0) } else { 0.0 };

    if net > 0.0 {
        lerp(WHITE, GREEN, net)
    } else if net < 0.0 {
        lerp(RED, WHITE, net + 1.0)
    } else {
        WHITE
    }
}

/// Fill for an optional net value (missing = neutral)
pub fn net_to_color_opt(net: Option<f64>) -> Rgb {
    net_to_color(net.unwrap_or(0.0))
}

fn lerp(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let channel = |a: u8, b: u8| -> u8 {
        let value = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
        value.round().clamp(0.0, 255.0) as u8
    };
    Rgb::new(channel(from.r, to.r), channel(from.g, to.g), channel(from.b, to.b))
}
