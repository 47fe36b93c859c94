use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Linear interpolation between two colours, `t` clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |from: u8, to: u8| -> u8 {
            let from = f64::from(from);
            let to = f64::from(to);
            (from + (to - from) * t).round().clamp(0.0, 255.0) as u8
        };

        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Scales the colour channels (not alpha) by `factor`, clamped to `[0, 1]`.
    #[must_use]
    pub fn darken(self, factor: f64) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let scale = |channel: u8| (f64::from(channel) * factor).round() as u8;

        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }

    /// Fully saturated colour for `hue` in degrees, value 1.
    #[must_use]
    pub fn from_hue(hue: f64) -> Self {
        let hue = hue.rem_euclid(360.0) / 60.0;
        let sector = hue.floor();
        let f = hue - sector;
        let rise = (f * 255.0).round() as u8;
        let fall = ((1.0 - f) * 255.0).round() as u8;

        match sector as u32 {
            0 => Self::rgb(255, rise, 0),
            1 => Self::rgb(fall, 255, 0),
            2 => Self::rgb(0, 255, rise),
            3 => Self::rgb(0, fall, 255),
            4 => Self::rgb(rise, 0, 255),
            _ => Self::rgb(255, 0, fall),
        }
    }

    #[must_use]
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
