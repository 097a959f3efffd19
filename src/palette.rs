//! Chart color palettes: sequential ramps for the heatmap and word cloud,
//! the qualitative Set3 palette for pie slices, and the HSL-interpolated
//! ramp used by the choropleth.

use plotters::style::RGBColor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb8 { r, g, b }
    }

    pub fn to_plotters(self) -> RGBColor {
        RGBColor(self.r, self.g, self.b)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Qualitative 12-color palette for categorical slices (pie chart).
pub const SET3: [Rgb8; 12] = [
    Rgb8::new(0x8D, 0xD3, 0xC7),
    Rgb8::new(0xFF, 0xFF, 0xB3),
    Rgb8::new(0xBE, 0xBA, 0xDA),
    Rgb8::new(0xFB, 0x80, 0x72),
    Rgb8::new(0x80, 0xB1, 0xD3),
    Rgb8::new(0xFD, 0xB4, 0x62),
    Rgb8::new(0xB3, 0xDE, 0x69),
    Rgb8::new(0xFC, 0xCD, 0xE5),
    Rgb8::new(0xD9, 0xD9, 0xD9),
    Rgb8::new(0xBC, 0x80, 0xBD),
    Rgb8::new(0xCC, 0xEB, 0xC5),
    Rgb8::new(0xFF, 0xED, 0x6F),
];

/// Color for the `idx`-th category, cycling through the palette.
#[inline]
pub fn set3_color(idx: usize) -> Rgb8 {
    SET3[idx % SET3.len()]
}

/// Neutral fill for countries with zero or unknown counts.
pub const NEUTRAL_FILL: Rgb8 = Rgb8::new(0xF0, 0xF0, 0xF0);

/// Choropleth ramp endpoints (light salmon to dark red).
pub const MAP_LOW: Rgb8 = Rgb8::new(0xFE, 0xE5, 0xD9);
pub const MAP_HIGH: Rgb8 = Rgb8::new(0xA5, 0x0F, 0x15);

const BLUES_STOPS: [Rgb8; 5] = [
    Rgb8::new(0xF7, 0xFB, 0xFF),
    Rgb8::new(0xC6, 0xDB, 0xEF),
    Rgb8::new(0x6B, 0xAE, 0xD6),
    Rgb8::new(0x21, 0x71, 0xB5),
    Rgb8::new(0x08, 0x30, 0x6B),
];

const REDS_STOPS: [Rgb8; 5] = [
    Rgb8::new(0xFF, 0xF5, 0xF0),
    Rgb8::new(0xFC, 0xBB, 0xA1),
    Rgb8::new(0xFB, 0x6A, 0x4A),
    Rgb8::new(0xCB, 0x18, 0x1D),
    Rgb8::new(0x67, 0x00, 0x0D),
];

/// Sequential blue ramp for the correlation heatmap, `t` in `[0, 1]`.
pub fn blues(t: f64) -> Rgb8 {
    ramp(&BLUES_STOPS, t)
}

/// Sequential red ramp for the word cloud, `t` in `[0, 1]`.
pub fn reds(t: f64) -> Rgb8 {
    ramp(&REDS_STOPS, t)
}

fn ramp(stops: &[Rgb8], t: f64) -> Rgb8 {
    let t = t.clamp(0.0, 1.0);
    let segments = stops.len() - 1;
    let pos = t * segments as f64;
    let i = (pos.floor() as usize).min(segments - 1);
    let frac = pos - i as f64;
    lerp_rgb(stops[i], stops[i + 1], frac)
}

fn lerp_rgb(a: Rgb8, b: Rgb8, t: f64) -> Rgb8 {
    let mix = |x: u8, y: u8| -> u8 {
        (x as f64 + (y as f64 - x as f64) * t).round().clamp(0.0, 255.0) as u8
    };
    Rgb8::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

/// Interpolate between two colors through HSL space, taking the shortest
/// hue arc. Used by the choropleth ramp.
pub fn lerp_hsl(a: Rgb8, b: Rgb8, t: f64) -> Rgb8 {
    let t = t.clamp(0.0, 1.0);
    let ha = rgb8_to_hsl(a);
    let hb = rgb8_to_hsl(b);

    let mut dh = hb.h_deg - ha.h_deg;
    if dh > 180.0 {
        dh -= 360.0;
    } else if dh < -180.0 {
        dh += 360.0;
    }

    hsl_to_rgb8(Hsl {
        h_deg: (ha.h_deg + dh * t).rem_euclid(360.0),
        s: ha.s + (hb.s - ha.s) * t,
        l: ha.l + (hb.l - ha.l) * t,
    })
}

#[derive(Clone, Copy, Debug)]
struct Hsl {
    h_deg: f64, // 0..360
    s: f64,     // 0..1
    l: f64,     // 0..1
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

fn rgb8_to_hsl(c: Rgb8) -> Hsl {
    let r = c.r as f64 / 255.0;
    let g = c.g as f64 / 255.0;
    let b = c.b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < f64::EPSILON {
        return Hsl { h_deg: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    Hsl {
        h_deg: h * 60.0,
        s,
        l,
    }
}

fn hsl_to_rgb8(hsl: Hsl) -> Rgb8 {
    let h = (hsl.h_deg.rem_euclid(360.0)) / 360.0;
    let s = clamp01(hsl.s);
    let l = clamp01(hsl.l);

    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return Rgb8::new(v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 1.0 / 2.0 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    }

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    Rgb8::new(
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramps_hit_their_endpoints() {
        assert_eq!(blues(0.0), BLUES_STOPS[0]);
        assert_eq!(blues(1.0), BLUES_STOPS[4]);
        assert_eq!(reds(0.0), REDS_STOPS[0]);
        assert_eq!(reds(1.0), REDS_STOPS[4]);
        // Out-of-range inputs clamp instead of panicking.
        assert_eq!(blues(-0.5), BLUES_STOPS[0]);
        assert_eq!(blues(1.5), BLUES_STOPS[4]);
    }

    #[test]
    fn hsl_lerp_endpoints_are_exact() {
        assert_eq!(lerp_hsl(MAP_LOW, MAP_HIGH, 0.0), MAP_LOW);
        assert_eq!(lerp_hsl(MAP_LOW, MAP_HIGH, 1.0), MAP_HIGH);
    }

    #[test]
    fn hsl_roundtrip_is_close() {
        for c in [MAP_LOW, MAP_HIGH, Rgb8::new(10, 200, 90)] {
            let back = hsl_to_rgb8(rgb8_to_hsl(c));
            assert!((back.r as i32 - c.r as i32).abs() <= 1);
            assert!((back.g as i32 - c.g as i32).abs() <= 1);
            assert!((back.b as i32 - c.b as i32).abs() <= 1);
        }
    }

    #[test]
    fn set3_cycles() {
        assert_eq!(set3_color(0), SET3[0]);
        assert_eq!(set3_color(12), SET3[0]);
        assert_eq!(set3_color(13), SET3[1]);
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(NEUTRAL_FILL.to_hex(), "#F0F0F0");
        assert_eq!(MAP_HIGH.to_hex(), "#A50F15");
    }
}
