//! Colonists, their custody lifecycle, and the roster arena that owns them.
use serde::Serialize;
use std::fmt;

use crate::profile::InjuryProfile;

/// Stable handle into the [`Roster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ColonistId(u32);

impl ColonistId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ColonistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "colonist#{}", self.0)
    }
}

/// Where a colonist currently is relative to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Custody {
    /// Still drifting in the world awaiting pickup.
    InWorld,
    /// Occupying a slot in the player's hold.
    Carried,
    /// Ejected or transmitted; no longer under player control.
    Finalized,
}

/// A rescuable colonist and its exclusively owned injury profile.
#[derive(Debug, Clone, Serialize)]
pub struct Colonist {
    id: ColonistId,
    name: String,
    template_id: String,
    profile: InjuryProfile,
    custody: Custody,
}

impl Colonist {
    #[must_use]
    pub const fn id(&self) -> ColonistId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Catalog entry this colonist was spawned from.
    #[must_use]
    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    #[must_use]
    pub const fn profile(&self) -> &InjuryProfile {
        &self.profile
    }

    pub(crate) const fn profile_mut(&mut self) -> &mut InjuryProfile {
        &mut self.profile
    }

    #[must_use]
    pub const fn custody(&self) -> Custody {
        self.custody
    }

    pub(crate) const fn set_custody(&mut self, custody: Custody) {
        self.custody = custody;
    }

    /// Colonist still under player control.
    #[must_use]
    pub const fn in_care(&self) -> bool {
        !matches!(self.custody, Custody::Finalized)
    }
}

/// Tally of colonists by custody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MissionStatus {
    pub in_world: usize,
    pub carried: usize,
    pub finalized: usize,
}

impl MissionStatus {
    /// Nobody is left in the world or waiting in the hold.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.in_world == 0 && self.carried == 0
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.in_world + self.carried + self.finalized
    }
}

/// Arena of every colonist spawned in the session. Ids are never reused.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Roster {
    colonists: Vec<Colonist>,
}

impl Roster {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            colonists: Vec::new(),
        }
    }

    /// Id the next spawned colonist will receive.
    #[must_use]
    pub fn next_id(&self) -> ColonistId {
        ColonistId(u32::try_from(self.colonists.len()).unwrap_or(u32::MAX))
    }

    /// Add a colonist to the world and return its id.
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        template_id: impl Into<String>,
        profile: InjuryProfile,
    ) -> ColonistId {
        let id = self.next_id();
        self.colonists.push(Colonist {
            id,
            name: name.into(),
            template_id: template_id.into(),
            profile,
            custody: Custody::InWorld,
        });
        id
    }

    #[must_use]
    pub fn get(&self, id: ColonistId) -> Option<&Colonist> {
        self.colonists.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: ColonistId) -> Option<&mut Colonist> {
        self.colonists.get_mut(id.index())
    }

    #[must_use]
    pub fn profile(&self, id: ColonistId) -> Option<&InjuryProfile> {
        self.get(id).map(Colonist::profile)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Colonist> {
        self.colonists.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colonists.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colonists.is_empty()
    }

    #[must_use]
    pub fn mission_status(&self) -> MissionStatus {
        let mut status = MissionStatus::default();
        for colonist in &self.colonists {
            match colonist.custody {
                Custody::InWorld => status.in_world += 1,
                Custody::Carried => status.carried += 1,
                Custody::Finalized => status.finalized += 1,
            }
        }
        status
    }
}
