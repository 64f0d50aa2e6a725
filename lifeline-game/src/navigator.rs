//! Two-mode cursor over the displayed colonist's incidents and regions.
//!
//! The navigator never owns a profile. It keeps cursor state for at most one
//! colonist and borrows the [`Roster`] and [`ProgressionEngine`] per call, so
//! every malformed request can be logged and dropped without side effects.
use serde::Serialize;

use crate::colonist::{ColonistId, Roster};
use crate::constants::{
    LOG_NAV_BOUNDS, LOG_NAV_COLLAPSE, LOG_NAV_DISPLAY, LOG_NAV_EXPAND, LOG_NAV_MODE,
    LOG_NAV_NO_PROFILE, LOG_NAV_RELEASE,
};
use crate::numbers::fill_ratio;
use crate::profile::InjuryProfile;
use crate::progression::{ProgressionEngine, RegionAddress, StartOutcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum NavMode {
    #[default]
    BrowsingIncidents,
    /// Only reachable after an incident has been expanded.
    BrowsingRegions,
}

/// Item currently highlighted in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Highlight {
    Incident(usize),
    Region { incident: usize, region: usize },
}

/// Result of [`SelectionNavigator::perform_selection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectionOutcome {
    Expanded { incident: usize },
    Progression(StartOutcome),
    Ignored,
}

/// One line of the flattened incident list, region rows nested under the
/// expanded incident.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavRow {
    pub address: Highlight,
    pub label: String,
    pub fill_ratio: f32,
    pub interactive: bool,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionNavigator {
    colonist: Option<ColonistId>,
    mode: NavMode,
    selected_incident: usize,
    expanded_incident: Option<usize>,
    selected_region: usize,
    has_expanded: bool,
    highlight: Option<Highlight>,
}

impl SelectionNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn colonist(&self) -> Option<ColonistId> {
        self.colonist
    }

    #[must_use]
    pub const fn mode(&self) -> NavMode {
        self.mode
    }

    #[must_use]
    pub const fn selected_incident(&self) -> usize {
        self.selected_incident
    }

    #[must_use]
    pub const fn selected_region(&self) -> usize {
        self.selected_region
    }

    #[must_use]
    pub const fn expanded_incident(&self) -> Option<usize> {
        self.expanded_incident
    }

    /// Whether any incident has been expanded since the colonist was displayed.
    #[must_use]
    pub const fn has_expanded(&self) -> bool {
        self.has_expanded
    }

    #[must_use]
    pub const fn highlight(&self) -> Option<Highlight> {
        self.highlight
    }

    /// Show `colonist`, reopening on its last selected incident.
    ///
    /// Progression on any other colonist is paused first. Returns false when
    /// the colonist is unknown or no longer in care.
    pub fn display(
        &mut self,
        colonist: ColonistId,
        roster: &Roster,
        engine: &mut ProgressionEngine,
    ) -> bool {
        let Some(profile) = roster
            .get(colonist)
            .filter(|entry| entry.in_care())
            .map(|entry| entry.profile())
        else {
            log::warn!("{LOG_NAV_NO_PROFILE} cannot display {colonist}");
            return false;
        };
        if engine.active().is_some_and(|target| target.colonist != colonist) {
            engine.stop();
        }
        let count = profile.incident_count();
        let restored = profile.last_selected_incident().min(count.saturating_sub(1));
        *self = Self {
            colonist: Some(colonist),
            selected_incident: restored,
            highlight: (count > 0).then_some(Highlight::Incident(restored)),
            ..Self::default()
        };
        log::debug!("{LOG_NAV_DISPLAY} colonist={colonist} incident={restored}/{count}");
        true
    }

    /// Forget the displayed colonist.
    pub fn release(&mut self) {
        if let Some(colonist) = self.colonist {
            log::debug!("{LOG_NAV_RELEASE} colonist={colonist}");
        }
        *self = Self::default();
    }

    /// Move the incident cursor to `index` and leave region mode.
    pub fn highlight_incident(&mut self, roster: &mut Roster, index: usize) -> bool {
        let Some(profile) = self.profile_mut(roster) else {
            return false;
        };
        let count = profile.incident_count();
        if index >= count {
            log::warn!("{LOG_NAV_BOUNDS} incident={index} count={count}");
            return false;
        }
        profile.remember_selection(index);
        self.select_incident(index);
        true
    }

    /// Open the selected incident's region list.
    pub fn expand(&mut self, roster: &Roster) -> bool {
        if self.mode != NavMode::BrowsingIncidents {
            log::warn!("{LOG_NAV_MODE} expand requires incident mode");
            return false;
        }
        let Some(profile) = self.profile(roster) else {
            return false;
        };
        let index = self.selected_incident;
        let Some(incident) = profile.incident(index) else {
            log::warn!(
                "{LOG_NAV_BOUNDS} incident={index} count={}",
                profile.incident_count()
            );
            return false;
        };
        if incident.region_count() == 0 {
            log::warn!("{LOG_NAV_BOUNDS} incident={index} has no regions to expand");
            return false;
        }
        if let Some(previous) = self.expanded_incident.filter(|&previous| previous != index) {
            log::debug!("{LOG_NAV_COLLAPSE} incident={previous}");
        }
        log::debug!("{LOG_NAV_EXPAND} incident={index}");
        self.expanded_incident = Some(index);
        self.has_expanded = true;
        self.enter_regions(index, 0);
        true
    }

    /// Leave region mode, collapsing the sub-list and returning the cursor to
    /// its incident. Progression is left running.
    pub fn collapse(&mut self) -> bool {
        let Some(expanded) = self.expanded_incident else {
            log::debug!("{LOG_NAV_COLLAPSE} nothing expanded");
            return false;
        };
        if self.mode != NavMode::BrowsingRegions {
            log::debug!("{LOG_NAV_COLLAPSE} ignored outside region mode");
            return false;
        }
        log::debug!("{LOG_NAV_COLLAPSE} incident={expanded}");
        self.expanded_incident = None;
        self.select_incident(expanded);
        true
    }

    /// Step the active cursor by the sign of `direction`.
    pub fn scroll(&mut self, roster: &mut Roster, direction: i32) -> bool {
        let step = direction.signum();
        if step == 0 {
            return false;
        }
        let Some(profile) = self.profile_mut(roster) else {
            return false;
        };
        let count = profile.incident_count();
        if count == 0 {
            log::warn!("{LOG_NAV_BOUNDS} scroll with no incidents");
            return false;
        }

        match self.mode {
            NavMode::BrowsingIncidents => {
                let current = self.selected_incident;
                let entering = self
                    .expanded_incident
                    .filter(|&expanded| self.has_expanded && expanded == current)
                    .and_then(|expanded| profile.incident(expanded))
                    .map(|incident| incident.region_count())
                    .filter(|&regions| regions > 0);
                if let Some(regions) = entering {
                    let region = if step > 0 { 0 } else { regions - 1 };
                    self.enter_regions(current, region);
                } else {
                    let next = wrap(current, step, count);
                    profile.remember_selection(next);
                    self.select_incident(next);
                }
            }
            NavMode::BrowsingRegions => {
                let Some(expanded) = self.expanded_incident else {
                    log::warn!("{LOG_NAV_MODE} region mode without an expanded incident");
                    self.select_incident(self.selected_incident.min(count - 1));
                    return false;
                };
                let regions = profile.incident(expanded).map_or(0, |i| i.region_count());
                let next = self.selected_region.checked_add_signed(step as isize);
                match next.filter(|&region| region < regions) {
                    Some(region) => self.enter_regions(expanded, region),
                    None => {
                        log::debug!("{LOG_NAV_COLLAPSE} incident={expanded} scrolled past");
                        self.expanded_incident = None;
                        let next = wrap(expanded, step, count);
                        profile.remember_selection(next);
                        self.select_incident(next);
                    }
                }
            }
        }
        true
    }

    /// Expand in incident mode, start stabilizing in region mode.
    pub fn perform_selection(
        &mut self,
        roster: &Roster,
        engine: &mut ProgressionEngine,
    ) -> SelectionOutcome {
        match self.mode {
            NavMode::BrowsingIncidents => {
                if self.expand(roster) {
                    SelectionOutcome::Expanded {
                        incident: self.selected_incident,
                    }
                } else {
                    SelectionOutcome::Ignored
                }
            }
            NavMode::BrowsingRegions => {
                let (Some(colonist), Some(incident)) = (self.colonist, self.expanded_incident)
                else {
                    log::warn!("{LOG_NAV_MODE} region mode without a target");
                    return SelectionOutcome::Ignored;
                };
                let address = RegionAddress::new(colonist, incident, self.selected_region);
                engine
                    .start(roster, address)
                    .map_or(SelectionOutcome::Ignored, SelectionOutcome::Progression)
            }
        }
    }

    /// Whether the displayed colonist may be ejected or transmitted.
    #[must_use]
    pub fn ready_to_finalize(&self, roster: &Roster) -> bool {
        self.colonist
            .and_then(|id| roster.profile(id))
            .is_some_and(InjuryProfile::ready_to_finalize)
    }

    /// Flattened list for presentation.
    #[must_use]
    pub fn rows(&self, roster: &Roster) -> Vec<NavRow> {
        let Some(profile) = self.colonist.and_then(|id| roster.profile(id)) else {
            return Vec::new();
        };
        let mut rows = Vec::new();
        for (index, incident) in profile.incidents().iter().enumerate() {
            let address = Highlight::Incident(index);
            rows.push(NavRow {
                address,
                label: incident.display_name().to_string(),
                fill_ratio: fill_ratio(incident.progress(), incident.target_time()),
                interactive: incident.is_interactive(),
                highlighted: self.highlight == Some(address),
            });
            if self.expanded_incident != Some(index) {
                continue;
            }
            for (region_index, region) in incident.regions().iter().enumerate() {
                let address = Highlight::Region {
                    incident: index,
                    region: region_index,
                };
                rows.push(NavRow {
                    address,
                    label: region.category().key().to_string(),
                    fill_ratio: region.fill_ratio(),
                    interactive: region.is_interactive(),
                    highlighted: self.highlight == Some(address),
                });
            }
        }
        rows
    }

    fn select_incident(&mut self, index: usize) {
        self.mode = NavMode::BrowsingIncidents;
        self.selected_incident = index;
        self.selected_region = 0;
        self.highlight = Some(Highlight::Incident(index));
    }

    fn enter_regions(&mut self, incident: usize, region: usize) {
        self.mode = NavMode::BrowsingRegions;
        self.selected_incident = incident;
        self.selected_region = region;
        self.highlight = Some(Highlight::Region { incident, region });
    }

    fn profile<'r>(&self, roster: &'r Roster) -> Option<&'r InjuryProfile> {
        let Some(colonist) = self.colonist else {
            log::warn!("{LOG_NAV_NO_PROFILE} no colonist displayed");
            return None;
        };
        let profile = roster.profile(colonist);
        if profile.is_none() {
            log::warn!("{LOG_NAV_NO_PROFILE} {colonist} missing from roster");
        }
        profile
    }

    fn profile_mut<'r>(&self, roster: &'r mut Roster) -> Option<&'r mut InjuryProfile> {
        let Some(colonist) = self.colonist else {
            log::warn!("{LOG_NAV_NO_PROFILE} no colonist displayed");
            return None;
        };
        let profile = roster.get_mut(colonist).map(|entry| entry.profile_mut());
        if profile.is_none() {
            log::warn!("{LOG_NAV_NO_PROFILE} {colonist} missing from roster");
        }
        profile
    }
}

fn wrap(index: usize, step: i32, count: usize) -> usize {
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    let index = i64::try_from(index).unwrap_or(0);
    usize::try_from((index + i64::from(step)).rem_euclid(count)).unwrap_or(0)
}
