//! Animated snake colouring. The hue sweeps half the colour wheel from head to
//! tail and drifts over time; the head is drawn brighter than the tail.

use std::fmt;

/// Degrees the whole gradient drifts per drawn frame.
const HUE_DRIFT_PER_FRAME: u32 = 2;
/// Hue span from head to tail.
const HUE_SPAN: f64 = 180.0;
const SATURATION: u8 = 100;
const HEAD_LIGHTNESS: f64 = 60.0;
/// Lightness lost between head and tail.
const LIGHTNESS_FALLOFF: f64 = 15.0;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: u8,
    pub lightness: f64,
}

impl fmt::Display for Hsl {
    /// CSS colour string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({:.1}, {}%, {:.1}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Colour of segment `index` (0 = head) in a snake of `total` segments.
#[must_use]
pub fn segment_hsl(index: usize, total: usize, offset: u32) -> Hsl {
    let total_f = total.max(1) as f64;
    let hue = (f64::from(offset) + index as f64 * (HUE_SPAN / total_f)) % 360.0;
    Hsl {
        hue,
        saturation: SATURATION,
        lightness: HEAD_LIGHTNESS - (index as f64 / total_f) * LIGHTNESS_FALLOFF,
    }
}

/// Hue offset that advances once per drawn frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ColorCycle {
    offset: u32,
}

impl ColorCycle {
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn advance(&mut self) -> u32 {
        self.offset = (self.offset + HUE_DRIFT_PER_FRAME) % 360;
        self.offset
    }

    /// CSS colours for every segment of a snake of length `total`, head first.
    #[must_use]
    pub fn colors(&self, total: usize) -> Vec<String> {
        (0..total)
            .map(|i| segment_hsl(i, total, self.offset).to_string())
            .collect()
    }
}
