//! Body-area categories, injury status, and the fixed-slot body diagram.
use serde::{Deserialize, Serialize};

/// Body area a region covers.
///
/// Slot positions are assigned by [`RegionCategory::slot`], never by the
/// enum discriminant, so reordering variants cannot shift diagram slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionCategory {
    /// Emergency without a localized source.
    Generalized,
    Head,
    Neck,
    Chest,
    LeftArm,
    RightArm,
    Midsection,
    Pelvis,
    LeftLeg,
    RightLeg,
}

impl RegionCategory {
    /// Number of diagram slots.
    pub const COUNT: usize = 10;

    /// Every category, listed in slot order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Generalized,
        Self::Head,
        Self::Neck,
        Self::Chest,
        Self::LeftArm,
        Self::RightArm,
        Self::Midsection,
        Self::Pelvis,
        Self::LeftLeg,
        Self::RightLeg,
    ];

    /// Diagram slot for this category.
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::Generalized => 0,
            Self::Head => 1,
            Self::Neck => 2,
            Self::Chest => 3,
            Self::LeftArm => 4,
            Self::RightArm => 5,
            Self::Midsection => 6,
            Self::Pelvis => 7,
            Self::LeftLeg => 8,
            Self::RightLeg => 9,
        }
    }

    /// Category stored at `slot`, if the slot exists.
    #[must_use]
    pub fn from_slot(slot: usize) -> Option<Self> {
        Self::ALL.get(slot).copied()
    }

    /// Stable identifier used by presentation and logs.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Generalized => "body.generalized",
            Self::Head => "body.head",
            Self::Neck => "body.neck",
            Self::Chest => "body.chest",
            Self::LeftArm => "body.left_arm",
            Self::RightArm => "body.right_arm",
            Self::Midsection => "body.midsection",
            Self::Pelvis => "body.pelvis",
            Self::LeftLeg => "body.left_leg",
            Self::RightLeg => "body.right_leg",
        }
    }
}

/// Injury status of a single region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionStatus {
    #[default]
    Unharmed,
    Injured,
    Stabilized,
}

impl RegionStatus {
    /// Display precedence when several incidents touch the same body area.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Unharmed => 0,
            Self::Stabilized => 1,
            Self::Injured => 2,
        }
    }

    /// The more severe of two statuses.
    #[must_use]
    pub const fn worst(self, other: Self) -> Self {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

/// Fixed-slot status table covering every body area of one colonist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BodyDiagram {
    slots: [RegionStatus; RegionCategory::COUNT],
}

impl BodyDiagram {
    /// Status shown for `category`.
    #[must_use]
    pub const fn status(&self, category: RegionCategory) -> RegionStatus {
        self.slots[category.slot()]
    }

    /// Merge `status` into the slot for `category`, keeping the most severe.
    pub fn mark(&mut self, category: RegionCategory, status: RegionStatus) {
        let slot = &mut self.slots[category.slot()];
        *slot = slot.worst(status);
    }

    /// Iterate `(category, status)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (RegionCategory, RegionStatus)> + '_ {
        RegionCategory::ALL
            .iter()
            .map(|category| (*category, self.status(*category)))
    }

    /// Number of body areas currently showing `Injured`.
    #[must_use]
    pub fn injured_areas(&self) -> usize {
        self.slots
            .iter()
            .filter(|status| **status == RegionStatus::Injured)
            .count()
    }
}
