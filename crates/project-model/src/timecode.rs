//! Time model: seconds/pixel mapping, timecodes, and ruler layout.
//!
//! Inputs are assumed finite and non-negative after caller validation.

use crate::clip::Clip;

/// Horizontal offset of time `seconds` at `zoom` pixels per second.
pub fn seconds_to_pixels(seconds: f64, zoom: f64) -> f64 {
    seconds * zoom
}

/// Time at horizontal offset `pixels`. Callers clamp the result to >= 0.
pub fn pixels_to_seconds(pixels: f64, zoom: f64) -> f64 {
    pixels / zoom
}

/// Format seconds as `m:ss:cc` (minutes, seconds, centiseconds).
///
/// Each unit is floored independently; 59.999 s reads `0:59:99`, never
/// `1:00:00`.
pub fn format_timecode(seconds: f64) -> String {
    let s = sanitize(seconds);
    let minutes = (s / 60.0).floor() as u64;
    let secs = (s % 60.0).floor() as u64;
    let centis = ((s % 1.0) * 100.0).floor() as u64;
    format!("{minutes}:{secs:02}:{centis:02}")
}

/// Format whole seconds as a ruler label, `m:ss`.
pub fn format_ruler_label(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// A ruler tick at a whole second.
#[derive(Debug, Clone, PartialEq)]
pub struct RulerTick {
    pub seconds: u32,
    /// Horizontal offset in pixels.
    pub offset_px: f64,
    /// Major ticks are drawn taller and carry a label.
    pub label: Option<String>,
}

impl RulerTick {
    pub fn is_major(&self) -> bool {
        self.label.is_some()
    }
}

/// One tick per whole second over `[0, total_duration]`, labelled every
/// `major_step` seconds.
pub fn ruler_ticks(total_duration: f64, zoom: f64, major_step: u32) -> Vec<RulerTick> {
    let last = sanitize(total_duration).floor() as u32;
    let step = major_step.max(1);
    (0..=last)
        .map(|seconds| RulerTick {
            seconds,
            offset_px: seconds_to_pixels(seconds as f64, zoom),
            label: (seconds % step == 0).then(|| format_ruler_label(seconds)),
        })
        .collect()
}

/// Horizontal extent of a clip block in the timeline grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSpan {
    pub left: f64,
    pub width: f64,
}

impl PixelSpan {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

pub fn clip_span(clip: &Clip, zoom: f64) -> PixelSpan {
    PixelSpan {
        left: seconds_to_pixels(clip.start_time, zoom),
        width: seconds_to_pixels(clip.duration, zoom),
    }
}

fn sanitize(seconds: f64) -> f64 {
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    }
}
