//! Incident and colonist templates loaded from JSON.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::LOG_CATALOG_UNKNOWN_INCIDENT;
use crate::incident::IncidentTemplate;

const DEFAULT_INCIDENT_DATA: &str = include_str!("../assets/data/incidents.json");

/// Spawn recipe: a named colonist and the incidents it arrives with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColonistTemplate {
    pub id: String,
    pub name: String,
    /// Incident template ids, in display order.
    #[serde(default)]
    pub incidents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("incident id `{id}` is defined more than once")]
    DuplicateIncident { id: String },
    #[error("colonist id `{id}` is defined more than once")]
    DuplicateColonist { id: String },
    #[error("colonist `{colonist}` references unknown incident `{incident}`")]
    UnknownIncident { colonist: String, incident: String },
    #[error("colonist `{colonist}` has no incidents")]
    EmptyColonist { colonist: String },
    #[error("incident `{incident}` has an empty display name")]
    EmptyDisplayName { incident: String },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IncidentCatalog {
    #[serde(default)]
    pub incidents: Vec<IncidentTemplate>,
    #[serde(default)]
    pub colonists: Vec<ColonistTemplate>,
}

impl IncidentCatalog {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_INCIDENT_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<IncidentCatalog> = OnceLock::new();
        CATALOG.get_or_init(Self::load_from_static)
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into an incident catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn find_incident(&self, id: &str) -> Option<&IncidentTemplate> {
        self.incidents.iter().find(|incident| incident.id == id)
    }

    #[must_use]
    pub fn find_colonist(&self, id: &str) -> Option<&ColonistTemplate> {
        self.colonists.iter().find(|colonist| colonist.id == id)
    }

    /// Every structural problem in the catalog, in discovery order.
    #[must_use]
    pub fn problems(&self) -> Vec<CatalogError> {
        let mut problems = Vec::new();
        let mut incident_ids = HashSet::new();
        for incident in &self.incidents {
            if !incident_ids.insert(incident.id.as_str()) {
                problems.push(CatalogError::DuplicateIncident {
                    id: incident.id.clone(),
                });
            }
            if incident.display_name.trim().is_empty() {
                problems.push(CatalogError::EmptyDisplayName {
                    incident: incident.id.clone(),
                });
            }
        }

        let mut colonist_ids = HashSet::new();
        for colonist in &self.colonists {
            if !colonist_ids.insert(colonist.id.as_str()) {
                problems.push(CatalogError::DuplicateColonist {
                    id: colonist.id.clone(),
                });
            }
            if colonist.incidents.is_empty() {
                problems.push(CatalogError::EmptyColonist {
                    colonist: colonist.id.clone(),
                });
            }
            for incident in &colonist.incidents {
                if !incident_ids.contains(incident.as_str()) {
                    problems.push(CatalogError::UnknownIncident {
                        colonist: colonist.id.clone(),
                        incident: incident.clone(),
                    });
                }
            }
        }
        problems
    }

    /// # Errors
    ///
    /// Returns the first problem reported by [`Self::problems`].
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.problems().into_iter().next().map_or(Ok(()), Err)
    }

    /// Incident templates for `colonist`, skipping ids the catalog lacks.
    #[must_use]
    pub fn resolve<'a>(&'a self, colonist: &ColonistTemplate) -> Vec<&'a IncidentTemplate> {
        colonist
            .incidents
            .iter()
            .filter_map(|id| {
                let found = self.find_incident(id);
                if found.is_none() {
                    log::warn!(
                        "{LOG_CATALOG_UNKNOWN_INCIDENT} colonist={} incident={id}",
                        colonist.id
                    );
                }
                found
            })
            .collect()
    }
}
