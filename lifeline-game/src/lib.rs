//! Lifeline Triage Engine
//!
//! Platform-agnostic injury tracking and stabilization logic for colonist
//! rescue. This crate assembles per-colonist injury profiles from templates,
//! advances stabilization on a fixed tick, and drives the two-level selection
//! list without any UI or platform-specific dependencies.

pub mod assembly;
pub mod body;
pub mod catalog;
pub mod clock;
pub mod colonist;
pub mod constants;
pub mod hold;
pub mod incident;
pub mod navigator;
pub mod numbers;
pub mod profile;
pub mod progression;
pub mod region;
pub mod rng;
pub mod session;

use anyhow::Context;

use crate::constants::LOG_CATALOG_PROBLEM;

// Re-export commonly used types
pub use assembly::{assemble_incident, assemble_profile, clamped_random_count};
pub use body::{BodyDiagram, RegionCategory, RegionStatus};
pub use catalog::{CatalogError, ColonistTemplate, IncidentCatalog};
pub use clock::FixedStep;
pub use colonist::{Colonist, ColonistId, Custody, MissionStatus, Roster};
pub use hold::{FinalizeAction, FinalizeRecord, Hold, HoldError};
pub use incident::{Incident, IncidentTemplate, IncidentView, RegionSet, RegionSpec};
pub use navigator::{Highlight, NavMode, NavRow, SelectionNavigator, SelectionOutcome};
pub use profile::{InjuryProfile, ProfileSnapshot};
pub use progression::{ProgressError, ProgressionEngine, RegionAddress, StartOutcome, TickOutcome};
pub use region::{Region, RegionAdvance, RegionView};
pub use rng::{CountingRng, SpawnRng};
pub use session::{FrameReport, StabilizedSet, TriageSession};

/// Trait for abstracting where incident templates come from.
/// Platform-specific implementations should provide this
pub trait TemplateLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the incident and colonist catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or parsed.
    fn load_catalog(&self) -> Result<IncidentCatalog, Self::Error>;
}

/// Loader backed by the catalog bundled with this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLoader;

impl TemplateLoader for StaticLoader {
    type Error = std::convert::Infallible;

    fn load_catalog(&self) -> Result<IncidentCatalog, Self::Error> {
        Ok(IncidentCatalog::default_catalog().clone())
    }
}

/// Loader parsing caller-supplied JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonLoader {
    json: String,
}

impl JsonLoader {
    #[must_use]
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl TemplateLoader for JsonLoader {
    type Error = serde_json::Error;

    fn load_catalog(&self) -> Result<IncidentCatalog, Self::Error> {
        IncidentCatalog::from_json(&self.json)
    }
}

/// Entry point that opens triage sessions from a template source.
pub struct TriageEngine<L>
where
    L: TemplateLoader,
{
    loader: L,
}

impl<L> TriageEngine<L>
where
    L: TemplateLoader,
{
    pub const fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Open a session. Catalog problems are logged; spawning degrades to
    /// whatever the catalog can still provide.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn open_session(&self, seed: u64) -> anyhow::Result<TriageSession>
    where
        L::Error: Into<anyhow::Error>,
    {
        let catalog = self
            .loader
            .load_catalog()
            .map_err(Into::<anyhow::Error>::into)
            .context("loading incident catalog")?;
        for problem in catalog.problems() {
            log::warn!("{LOG_CATALOG_PROBLEM} {problem}");
        }
        Ok(TriageSession::new(catalog, seed))
    }

    /// Open a session only if the catalog has no structural problems.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or fails validation.
    pub fn open_validated_session(&self, seed: u64) -> anyhow::Result<TriageSession>
    where
        L::Error: Into<anyhow::Error>,
    {
        let catalog = self
            .loader
            .load_catalog()
            .map_err(Into::<anyhow::Error>::into)
            .context("loading incident catalog")?;
        catalog.validate().context("validating incident catalog")?;
        Ok(TriageSession::new(catalog, seed))
    }
}
