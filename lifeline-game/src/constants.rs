//! Centralized tuning constants for Lifeline triage logic.
//!
//! These values define the deterministic rules of the core simulation.
//! Keeping them together means gameplay can only be adjusted via reviewed
//! code changes rather than through the JSON catalog.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_CATALOG_INERT_REGION: &str = "catalog.inert-region";
pub(crate) const LOG_CATALOG_EMPTY_POOL: &str = "catalog.empty-pool";
pub(crate) const LOG_CATALOG_EMPTY_PROFILE: &str = "catalog.empty-profile";
pub(crate) const LOG_CATALOG_DUPLICATE_PRESET: &str = "catalog.duplicate-preset";
pub(crate) const LOG_CATALOG_UNKNOWN_INCIDENT: &str = "catalog.unknown-incident";
pub(crate) const LOG_CATALOG_PROBLEM: &str = "catalog.problem";
pub(crate) const LOG_SPAWN_UNKNOWN_TEMPLATE: &str = "spawn.unknown-template";
pub(crate) const LOG_SPAWN_ASSEMBLED: &str = "spawn.assembled";
pub(crate) const LOG_NAV_BOUNDS: &str = "nav.bounds";
pub(crate) const LOG_NAV_NO_PROFILE: &str = "nav.no-profile";
pub(crate) const LOG_NAV_MODE: &str = "nav.mode";
pub(crate) const LOG_NAV_EXPAND: &str = "nav.expand";
pub(crate) const LOG_NAV_COLLAPSE: &str = "nav.collapse";
pub(crate) const LOG_NAV_DISPLAY: &str = "nav.display";
pub(crate) const LOG_NAV_RELEASE: &str = "nav.release";
pub(crate) const LOG_PROGRESS_START: &str = "progress.start";
pub(crate) const LOG_PROGRESS_SWITCH: &str = "progress.switch";
pub(crate) const LOG_PROGRESS_STOP: &str = "progress.stop";
pub(crate) const LOG_PROGRESS_STABILIZED: &str = "progress.stabilized";
pub(crate) const LOG_PROGRESS_REJECTED: &str = "progress.rejected";
pub(crate) const LOG_PROGRESS_STALE: &str = "progress.stale-target";
pub(crate) const LOG_CLOCK_INVALID: &str = "clock.invalid-frame";
pub(crate) const LOG_CLOCK_BACKLOG: &str = "clock.backlog-dropped";
pub(crate) const LOG_HOLD_REJECTED: &str = "hold.rejected";
pub(crate) const LOG_HOLD_FINALIZED: &str = "hold.finalized";

// Hold tuning --------------------------------------------------------------
/// Colonist slots available in the player's hold.
pub const DEFAULT_HOLD_CAPACITY: usize = 3;

// Clock tuning -------------------------------------------------------------
/// Fixed simulation rate in ticks per second.
pub const DEFAULT_TICK_HZ: u32 = 60;
/// Upper bound on catch-up ticks produced by a single host frame.
pub const MAX_TICKS_PER_FRAME: u32 = 8;

// Assembly tuning ----------------------------------------------------------
/// Default stabilization time applied when a catalog entry omits one.
pub const DEFAULT_REGION_TARGET_SECS: f32 = 5.0;
/// Remaining time under which a region snaps to its target, absorbing
/// float drift from summing many fixed ticks.
pub const STABILIZE_SNAP_SECS: f32 = 1.0e-3;
