use std::fmt;

use lifeline_game::{ColonistId, Custody, FinalizeAction, NavMode, TriageSession};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Discrete input event a policy can send to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Display(ColonistId),
    Scroll(i32),
    Select,
    Collapse,
    Stop,
    Highlight(usize),
    Collect(ColonistId),
    Finalize(ColonistId, FinalizeAction),
    /// Let a frame pass without input.
    Wait,
}

/// Policy interface for automated triage runs.
pub trait InputPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Next input to send, or `None` once the policy has nothing left to do.
    fn next_input(&mut self, session: &TriageSession) -> Option<Input>;
}

/// Built-in policies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    /// Collects, stabilizes and transmits every colonist through navigation inputs.
    Autopilot,
    /// Sends random, often malformed input.
    Chaos,
}

impl PolicyKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PolicyKind::Autopilot => "Autopilot",
            PolicyKind::Chaos => "Chaos",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn InputPolicy + Send> {
        match self {
            PolicyKind::Autopilot => Box::new(AutopilotPolicy),
            PolicyKind::Chaos => Box::new(ChaosPolicy::new(seed)),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct AutopilotPolicy;

impl InputPolicy for AutopilotPolicy {
    fn name(&self) -> &'static str {
        "Autopilot"
    }

    fn next_input(&mut self, session: &TriageSession) -> Option<Input> {
        let roster = session.roster();
        if !session.hold().is_full()
            && let Some(waiting) = roster.iter().find(|c| c.custody() == Custody::InWorld)
        {
            return Some(Input::Collect(waiting.id()));
        }

        let target = session.hold().carried().first().copied()?;
        if session.displayed() != Some(target) {
            return Some(Input::Display(target));
        }
        if session.ready_to_finalize() {
            return Some(Input::Finalize(target, FinalizeAction::Transmit));
        }
        if session.engine().active().is_some() {
            return Some(Input::Wait);
        }

        let profile = roster.profile(target)?;
        let (incident, region) = profile.incidents().iter().enumerate().find_map(|(i, inc)| {
            inc.regions()
                .iter()
                .position(|r| r.is_interactive())
                .map(|r| (i, r))
        })?;

        let nav = session.navigator();
        Some(match nav.mode() {
            NavMode::BrowsingRegions if nav.expanded_incident() != Some(incident) => {
                Input::Collapse
            }
            NavMode::BrowsingRegions => match nav.selected_region().cmp(&region) {
                std::cmp::Ordering::Less => Input::Scroll(1),
                std::cmp::Ordering::Greater => Input::Scroll(-1),
                std::cmp::Ordering::Equal => Input::Select,
            },
            NavMode::BrowsingIncidents if nav.selected_incident() != incident => {
                Input::Highlight(incident)
            }
            NavMode::BrowsingIncidents => Input::Select,
        })
    }
}

struct ChaosPolicy {
    rng: ChaCha20Rng,
}

impl ChaosPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed ^ 0xC4A0_5000),
        }
    }

    fn any_colonist(&mut self, session: &TriageSession) -> ColonistId {
        // One past the roster to exercise unknown ids.
        let bound = u32::try_from(session.roster().len()).unwrap_or(u32::MAX).saturating_add(1);
        ColonistId::new(self.rng.gen_range(0..bound))
    }
}

impl InputPolicy for ChaosPolicy {
    fn name(&self) -> &'static str {
        "Chaos"
    }

    fn next_input(&mut self, session: &TriageSession) -> Option<Input> {
        let input = match self.rng.gen_range(0..20) {
            0 => Input::Display(self.any_colonist(session)),
            1..=4 => Input::Scroll(self.rng.gen_range(-3..=3)),
            5..=8 => Input::Select,
            9 => Input::Collapse,
            10 => Input::Stop,
            11 => Input::Highlight(self.rng.gen_range(0..8)),
            12 => Input::Collect(self.any_colonist(session)),
            13 => {
                let action = if self.rng.gen_bool(0.5) {
                    FinalizeAction::Eject
                } else {
                    FinalizeAction::Transmit
                };
                Input::Finalize(self.any_colonist(session), action)
            }
            _ => Input::Wait,
        };
        Some(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifeline_game::{IncidentCatalog, TriageSession};

    fn session() -> TriageSession {
        let mut session = TriageSession::new(IncidentCatalog::default_catalog().clone(), 5);
        session.spawn_all();
        session
    }

    #[test]
    fn autopilot_collects_before_anything_else() {
        let session = session();
        let mut policy = PolicyKind::Autopilot.create_policy(1);
        assert_eq!(
            policy.next_input(&session),
            Some(Input::Collect(ColonistId::new(0)))
        );
    }

    #[test]
    fn autopilot_is_done_with_empty_roster() {
        let session = TriageSession::new(IncidentCatalog::default(), 5);
        let mut policy = PolicyKind::Autopilot.create_policy(1);
        assert_eq!(policy.next_input(&session), None);
    }

    #[test]
    fn chaos_is_reproducible() {
        let session = session();
        let mut a = PolicyKind::Chaos.create_policy(9);
        let mut b = PolicyKind::Chaos.create_policy(9);
        for _ in 0..100 {
            assert_eq!(a.next_input(&session), b.next_input(&session));
        }
        assert_eq!(PolicyKind::Chaos.to_string(), "Chaos");
    }
}
