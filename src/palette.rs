//! Firework palettes and colour encoding
//!
//! Palettes are static tables of base HSL triples. Sparks pick one base colour
//! and jitter it slightly so a burst never looks flat.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::HanabiError;

/// Hue jitter (degrees, ±)
const HUE_JITTER: f64 = 10.0;
/// Saturation/lightness jitter (percentage points, ±)
const TONE_JITTER: f64 = 10.0;

/// Hue (degrees, [0, 360)), saturation and lightness (percent, [0, 100])
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Wrap hue and clamp saturation/lightness into valid ranges
    pub fn normalized(self) -> Self {
        Self {
            h: self.h.rem_euclid(360.0),
            s: self.s.clamp(0.0, 100.0),
            l: self.l.clamp(0.0, 100.0),
        }
    }

    /// Apply bounded random jitter to every channel
    pub fn jittered<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        Self {
            h: self.h + rng.random_range(-HUE_JITTER..=HUE_JITTER),
            s: self.s + rng.random_range(-TONE_JITTER..=TONE_JITTER),
            l: self.l + rng.random_range(-TONE_JITTER..=TONE_JITTER),
        }
        .normalized()
    }

    /// Scale lightness by an intensity multiplier
    pub fn dimmed(self, intensity: f64) -> Self {
        Self {
            l: (self.l * intensity).clamp(0.0, 100.0),
            ..self
        }
    }

    /// Attach an alpha channel
    pub fn with_alpha(self, a: f64) -> Color {
        Color::Hsla {
            h: self.h,
            s: self.s,
            l: self.l,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Convert to 8-bit RGB
    pub fn to_rgb8(self) -> [u8; 3] {
        let s = self.s / 100.0;
        let l = self.l / 100.0;
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = self.h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r, g, b) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        [to_u8(r), to_u8(g), to_u8(b)]
    }
}

/// A fill colour with alpha, as handed to a drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Hsla { h: f64, s: f64, l: f64, a: f64 },
    Rgba { r: u8, g: u8, b: u8, a: f64 },
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Color::Rgba { r, g, b, a }
    }

    pub fn alpha(&self) -> f64 {
        match *self {
            Color::Hsla { a, .. } | Color::Rgba { a, .. } => a,
        }
    }

    /// Convert to straight (non-premultiplied) RGBA8
    pub fn to_rgba8(&self) -> [u8; 4] {
        match *self {
            Color::Hsla { h, s, l, a } => {
                let [r, g, b] = Hsl::new(h, s, l).to_rgb8();
                [r, g, b, alpha_to_u8(a)]
            }
            Color::Rgba { r, g, b, a } => [r, g, b, alpha_to_u8(a)],
        }
    }
}

fn alpha_to_u8(a: f64) -> u8 {
    (a.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// CSS colour text, e.g. `hsla(45.0, 100.0%, 60.0%, 0.500)`
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Color::Hsla { h, s, l, a } => write!(f, "hsla({h:.1}, {s:.1}%, {l:.1}%, {a:.3})"),
            Color::Rgba { r, g, b, a } => write!(f, "rgba({r}, {g}, {b}, {a:.3})"),
        }
    }
}

/// Named firework palettes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Fire,
    Blue,
    Purple,
}

const FIRE: [Hsl; 5] = [
    Hsl::new(45.0, 100.0, 60.0), // gold
    Hsl::new(30.0, 100.0, 55.0), // orange
    Hsl::new(15.0, 100.0, 50.0), // red-orange
    Hsl::new(55.0, 100.0, 70.0), // pale yellow
    Hsl::new(5.0, 90.0, 55.0),   // ember red
];

const BLUE: [Hsl; 5] = [
    Hsl::new(200.0, 100.0, 70.0),
    Hsl::new(210.0, 90.0, 60.0),
    Hsl::new(190.0, 100.0, 80.0),
    Hsl::new(220.0, 80.0, 75.0),
    Hsl::new(180.0, 70.0, 85.0),
];

const PURPLE: [Hsl; 5] = [
    Hsl::new(270.0, 90.0, 70.0),
    Hsl::new(280.0, 100.0, 65.0),
    Hsl::new(300.0, 80.0, 70.0),
    Hsl::new(260.0, 70.0, 80.0),
    Hsl::new(320.0, 90.0, 75.0),
];

impl Palette {
    pub const ALL: [Palette; 3] = [Palette::Fire, Palette::Blue, Palette::Purple];

    pub fn as_str(&self) -> &'static str {
        match self {
            Palette::Fire => "fire",
            Palette::Blue => "blue",
            Palette::Purple => "purple",
        }
    }

    /// Base colours for this palette
    pub fn colors(&self) -> &'static [Hsl; 5] {
        match self {
            Palette::Fire => &FIRE,
            Palette::Blue => &BLUE,
            Palette::Purple => &PURPLE,
        }
    }

    /// Pick one palette uniformly
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Pick a base colour uniformly and jitter it
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Hsl {
        let colors = self.colors();
        colors[rng.random_range(0..colors.len())].jittered(rng)
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Palette {
    type Err = HanabiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fire" => Ok(Palette::Fire),
            "blue" => Ok(Palette::Blue),
            "purple" => Ok(Palette::Purple),
            _ => Err(HanabiError::UnknownPalette(s.to_string())),
        }
    }
}
