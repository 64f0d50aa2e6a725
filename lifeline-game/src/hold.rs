//! Player hold: limited colonist slots and the finalize (eject/transmit) gate.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::colonist::{ColonistId, Custody, Roster};
use crate::constants::{DEFAULT_HOLD_CAPACITY, LOG_HOLD_FINALIZED, LOG_HOLD_REJECTED};

/// How a colonist leaves player control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalizeAction {
    Eject,
    Transmit,
}

/// Snapshot committed to the colonist's record when it is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinalizeRecord {
    pub colonist: ColonistId,
    pub action: FinalizeAction,
    pub total_progress: f32,
    pub total_target_time: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HoldError {
    #[error("hold is full ({capacity} slots)")]
    Full { capacity: usize },
    #[error("{colonist} is not in the roster")]
    UnknownColonist { colonist: ColonistId },
    #[error("{colonist} is not waiting in the world")]
    NotInWorld { colonist: ColonistId },
    #[error("{colonist} is not in the hold")]
    NotCarried { colonist: ColonistId },
    #[error("{colonist} still has {remaining} unstabilized regions")]
    NotReady { colonist: ColonistId, remaining: usize },
}

/// Slots holding collected colonists, in pickup order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hold {
    capacity: usize,
    slots: Vec<ColonistId>,
}

impl Default for Hold {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HOLD_CAPACITY)
    }
}

impl Hold {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn carried(&self) -> &[ColonistId] {
        &self.slots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    #[must_use]
    pub fn free_slots(&self) -> usize {
        self.capacity.saturating_sub(self.slots.len())
    }

    #[must_use]
    pub fn contains(&self, colonist: ColonistId) -> bool {
        self.slots.contains(&colonist)
    }

    /// Pick up an in-world colonist.
    ///
    /// # Errors
    ///
    /// Fails when the colonist is unknown, not in the world, or the hold is
    /// full. The roster is unchanged on error.
    pub fn collect(&mut self, roster: &mut Roster, colonist: ColonistId) -> Result<(), HoldError> {
        let result = self.try_collect(roster, colonist);
        if let Err(err) = &result {
            log::warn!("{LOG_HOLD_REJECTED} collect {colonist}: {err}");
        }
        result
    }

    fn try_collect(&mut self, roster: &mut Roster, colonist: ColonistId) -> Result<(), HoldError> {
        let entry = roster
            .get_mut(colonist)
            .ok_or(HoldError::UnknownColonist { colonist })?;
        if entry.custody() != Custody::InWorld {
            return Err(HoldError::NotInWorld { colonist });
        }
        if self.is_full() {
            return Err(HoldError::Full {
                capacity: self.capacity,
            });
        }
        entry.set_custody(Custody::Carried);
        self.slots.push(colonist);
        Ok(())
    }

    /// Release a carried colonist whose injuries are all stabilized.
    ///
    /// # Errors
    ///
    /// Fails when the colonist is unknown, not carried, or not ready to
    /// finalize. The roster is unchanged on error.
    pub fn finalize(
        &mut self,
        roster: &mut Roster,
        colonist: ColonistId,
        action: FinalizeAction,
    ) -> Result<FinalizeRecord, HoldError> {
        let result = self.try_finalize(roster, colonist, action);
        match &result {
            Ok(record) => log::info!(
                "{LOG_HOLD_FINALIZED} {colonist} action={action:?} progress={:.2}/{:.2}",
                record.total_progress,
                record.total_target_time
            ),
            Err(err) => log::warn!("{LOG_HOLD_REJECTED} finalize {colonist}: {err}"),
        }
        result
    }

    fn try_finalize(
        &mut self,
        roster: &mut Roster,
        colonist: ColonistId,
        action: FinalizeAction,
    ) -> Result<FinalizeRecord, HoldError> {
        let entry = roster
            .get_mut(colonist)
            .ok_or(HoldError::UnknownColonist { colonist })?;
        let Some(slot) = self.slots.iter().position(|&id| id == colonist) else {
            return Err(HoldError::NotCarried { colonist });
        };
        let profile = entry.profile();
        if !profile.ready_to_finalize() {
            return Err(HoldError::NotReady {
                colonist,
                remaining: profile
                    .total_injured_count()
                    .saturating_sub(profile.stabilized_count()),
            });
        }
        let record = FinalizeRecord {
            colonist,
            action,
            total_progress: profile.total_progress(),
            total_target_time: profile.total_target_time(),
        };
        entry.set_custody(Custody::Finalized);
        self.slots.remove(slot);
        Ok(record)
    }
}
