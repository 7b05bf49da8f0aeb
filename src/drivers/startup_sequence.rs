//! UV lamp startup LED sequence.
//!
//! Played once each time the UV bank starts: the per-lamp LEDs light up
//! one after another, `step_ms` apart, until every detected lamp is lit.
//! The total duration is proportional to the lamp count.
//!
//! The sequence is non-blocking.  The coordinator calls [`frame`] every
//! tick and drives the lamp LEDs from the returned bitmask.
//!
//! ```text
//!  lamps=4, step=150ms
//!  t=0    ●○○○
//!  t=150  ●●○○
//!  t=300  ●●●○
//!  t=450  ●●●●   finished
//! ```
//!
//! [`frame`]: StartupSequence::frame

use crate::pins::MAX_UV_LAMPS;

/// Bit `i` set = lamp LED `i` lit.
pub type LampMask = u16;

/// Mask with the first `count` lamps lit.
pub const fn all_lamps(count: u8) -> LampMask {
    let count = if count as usize > MAX_UV_LAMPS {
        MAX_UV_LAMPS as u32
    } else {
        count as u32
    };
    if count == 0 { 0 } else { (1u16 << count) - 1 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Playing {
    lamp_count: u8,
    started_ms: u32,
}

/// Time-stepped lamp animation.  Stack-allocated, no heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupSequence {
    step_ms: u32,
    playing: Option<Playing>,
}

impl StartupSequence {
    pub fn new(step_ms: u32) -> Self {
        Self {
            step_ms: step_ms.max(1),
            playing: None,
        }
    }

    /// Restart the sequence for `lamp_count` lamps at `now_ms`.
    pub fn start(&mut self, lamp_count: u8, now_ms: u32) {
        self.playing = Some(Playing {
            lamp_count: lamp_count.min(MAX_UV_LAMPS as u8),
            started_ms: now_ms,
        });
    }

    /// Abort and forget any sequence in progress.
    pub fn clear(&mut self) {
        self.playing = None;
    }

    pub fn is_active(&self) -> bool {
        self.playing.is_some()
    }

    /// Total running time for `lamp_count` lamps.
    pub fn duration_ms(&self, lamp_count: u8) -> u32 {
        (lamp_count.min(MAX_UV_LAMPS as u8) as u32)
            .saturating_sub(1)
            .saturating_mul(self.step_ms)
    }

    /// Lamp mask for `now_ms`, or `None` when nothing is playing.
    pub fn frame(&self, now_ms: u32) -> Option<LampMask> {
        let playing = self.playing?;
        let elapsed = now_ms.wrapping_sub(playing.started_ms);
        let lit = (elapsed / self.step_ms).saturating_add(1);
        let lit = lit.min(playing.lamp_count as u32) as u8;
        Some(all_lamps(lit))
    }

    /// Advance the sequence.  Returns the finished lamp count once, on the
    /// tick the final lamp has been shown for a full step.
    pub fn poll_finished(&mut self, now_ms: u32) -> Option<u8> {
        let playing = self.playing?;
        let elapsed = now_ms.wrapping_sub(playing.started_ms);
        if elapsed >= self.duration_ms(playing.lamp_count).saturating_add(self.step_ms) {
            self.playing = None;
            return Some(playing.lamp_count);
        }
        None
    }
}
