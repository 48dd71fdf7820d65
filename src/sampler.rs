//! Segment layout of a driven run and the frame-selection policy.
//!
//! A run is split into five consecutive zones: an initial equilibration, then two
//! field-on / field-off cycles. Only the tail of the second off phase is analysed.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// One of the five consecutive zones of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Initial,
    On1,
    Off1,
    On2,
    Off2,
}

impl Zone {
    pub const ALL: [Zone; 5] = [Zone::Initial, Zone::On1, Zone::Off1, Zone::On2, Zone::Off2];

    pub fn name(&self) -> &'static str {
        match self {
            Zone::Initial => "initial",
            Zone::On1 => "on1",
            Zone::Off1 => "off1",
            Zone::On2 => "on2",
            Zone::Off2 => "off2",
        }
    }

    fn index(&self) -> usize {
        match self {
            Zone::Initial => 0,
            Zone::On1 => 1,
            Zone::Off1 => 2,
            Zone::On2 => 3,
            Zone::Off2 => 4,
        }
    }
}

/// Zones whose frames are sampled. The first off phase has not reached steady state.
pub const SAMPLED_ZONES: [Zone; 1] = [Zone::Off2];

/// Frame counts of the five zones, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentLayout {
    pub initial: usize,
    pub on1: usize,
    pub off1: usize,
    pub on2: usize,
    pub off2: usize,
}

impl Default for SegmentLayout {
    fn default() -> Self {
        Self::from([500, 100, 2000, 100, 2000])
    }
}

impl From<[usize; 5]> for SegmentLayout {
    fn from(lengths: [usize; 5]) -> Self {
        let [initial, on1, off1, on2, off2] = lengths;
        Self {
            initial,
            on1,
            off1,
            on2,
            off2,
        }
    }
}

impl SegmentLayout {
    pub fn lengths(&self) -> [usize; 5] {
        [self.initial, self.on1, self.off1, self.on2, self.off2]
    }

    pub fn zone_length(&self, zone: Zone) -> usize {
        self.lengths()[zone.index()]
    }

    /// Index of the first frame of `zone` (cumulative length of the preceding zones)
    ///
    /// Saturates at `usize::MAX` for oversized layouts.
    pub fn zone_start(&self, zone: Zone) -> usize {
        self.lengths()[..zone.index()]
            .iter()
            .fold(0usize, |acc, len| acc.saturating_add(*len))
    }

    pub fn zone_range(&self, zone: Zone) -> Range<usize> {
        let start = self.zone_start(zone);
        start..start.saturating_add(self.zone_length(zone))
    }

    /// Total number of frames the layout describes, saturating at `usize::MAX`
    pub fn total(&self) -> usize {
        self.lengths()
            .iter()
            .fold(0usize, |acc, len| acc.saturating_add(*len))
    }

    /// Zone containing `frame`, or None for frames past the layout
    pub fn zone_of(&self, frame: usize) -> Option<Zone> {
        Zone::ALL
            .into_iter()
            .find(|zone| self.zone_range(*zone).contains(&frame))
    }
}

/// Final third of a zone starting at `start` with `length` frames.
///
/// The first `floor(2 * length / 3)` frames are transient and dropped.
pub fn sampled_window(start: usize, length: usize) -> Range<usize> {
    // floor(2L/3) without forming 2L
    let skip = 2 * (length / 3) + 2 * (length % 3) / 3;
    start.saturating_add(skip)..start.saturating_add(length)
}

/// Frame indices eligible for analysis under `layout`, regardless of file length
pub fn sampled_range(layout: &SegmentLayout) -> Range<usize> {
    // Only one zone is sampled, so the eligible set stays a single contiguous window.
    let zone = SAMPLED_ZONES[0];
    sampled_window(layout.zone_start(zone), layout.zone_length(zone))
}

/// Eligible frame indices restricted to the `n_frames` frames actually present
pub fn sampled_frames(layout: &SegmentLayout, n_frames: usize) -> Range<usize> {
    let range = sampled_range(layout);
    range.start.min(n_frames)..range.end.min(n_frames)
}
