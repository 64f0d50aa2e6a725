//! Per-body-area injury record and its stabilization timer.
use serde::Serialize;

use crate::body::{RegionCategory, RegionStatus};
use crate::constants::STABILIZE_SNAP_SECS;
use crate::numbers::{fill_ratio, positive_seconds};

/// One injured body area of one colonist.
///
/// Regions are value records owned by their incident; the progression engine
/// is the only code path that mutates them after assembly.
///
/// Inert regions (target time 0) stay `Injured` with `progress == target_time`,
/// so they are exempt from the `Stabilized` iff at-target rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    category: RegionCategory,
    status: RegionStatus,
    target_time: f32,
    progress: f32,
}

/// Result of feeding a time slice into a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionAdvance {
    /// Progress grew by `applied` seconds without completing.
    Progressed { applied: f32 },
    /// Progress reached the target during this slice.
    Stabilized { applied: f32 },
    /// Region is not accepting progress (inert or already stabilized).
    Rejected,
}

impl RegionAdvance {
    /// Seconds actually credited to the region.
    #[must_use]
    pub const fn applied(self) -> f32 {
        match self {
            Self::Progressed { applied } | Self::Stabilized { applied } => applied,
            Self::Rejected => 0.0,
        }
    }
}

impl Region {
    /// Fresh injured region. Target times that are negative or non-finite are
    /// stored as zero, which leaves the region inert.
    #[must_use]
    pub fn injured(category: RegionCategory, target_time: f32) -> Self {
        Self {
            category,
            status: RegionStatus::Injured,
            target_time: positive_seconds(target_time).unwrap_or(0.0),
            progress: 0.0,
        }
    }

    #[must_use]
    pub const fn category(&self) -> RegionCategory {
        self.category
    }

    #[must_use]
    pub const fn status(&self) -> RegionStatus {
        self.status
    }

    /// Seconds required to stabilize.
    #[must_use]
    pub const fn target_time(&self) -> f32 {
        self.target_time
    }

    /// Seconds accumulated so far.
    #[must_use]
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    /// Seconds still needed.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        (self.target_time - self.progress).max(0.0)
    }

    /// True when the configured target time cannot be progressed.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        positive_seconds(self.target_time).is_none()
    }

    /// Whether the player may start stabilizing this region.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.status == RegionStatus::Injured && !self.is_inert()
    }

    #[must_use]
    pub const fn is_stabilized(&self) -> bool {
        matches!(self.status, RegionStatus::Stabilized)
    }

    /// Progress over target, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn fill_ratio(&self) -> f32 {
        if self.is_stabilized() {
            return 1.0;
        }
        fill_ratio(self.progress, self.target_time)
    }

    /// Credit `dt` seconds, clamping at the target and transitioning to
    /// `Stabilized` exactly when the target is reached.
    pub(crate) fn advance(&mut self, dt: f32) -> RegionAdvance {
        if !self.is_interactive() {
            return RegionAdvance::Rejected;
        }
        let Some(dt) = positive_seconds(dt) else {
            return RegionAdvance::Progressed { applied: 0.0 };
        };
        let before = self.progress;
        let next = (before + dt).min(self.target_time);
        if self.target_time - next <= STABILIZE_SNAP_SECS {
            self.progress = self.target_time;
            self.status = RegionStatus::Stabilized;
            return RegionAdvance::Stabilized {
                applied: self.target_time - before,
            };
        }
        self.progress = next;
        RegionAdvance::Progressed {
            applied: next - before,
        }
    }

    /// Presentation view of this region.
    #[must_use]
    pub fn view(&self) -> RegionView {
        RegionView {
            category: self.category,
            status: self.status,
            progress: self.progress,
            target_time: self.target_time,
            fill_ratio: self.fill_ratio(),
            interactive: self.is_interactive(),
        }
    }
}

/// Read-only region data consumed by presentation widgets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionView {
    pub category: RegionCategory,
    pub status: RegionStatus,
    pub progress: f32,
    pub target_time: f32,
    pub fill_ratio: f32,
    pub interactive: bool,
}
