#![forbid(unsafe_code)]

//! Core domain model and business logic for the Smoke-Free Lungs system.
//!
//! This crate provides:
//! - Domain types (raw inputs, validated profile, recovery snapshot)
//! - Cigarette brand reference data
//! - Input validation and sanitization
//! - The exponential recovery curve engine and milestone badges
//! - Persistence (versioned state file, legacy migration, CSV export)
//! - Local lung anatomy Q&A

pub mod types;
pub mod error;
pub mod brands;
pub mod config;
pub mod logging;
pub mod dates;
pub mod units;
pub mod metrics;
pub mod model;
pub mod curve;
pub mod milestones;
pub mod storage;
pub mod timeline;
pub mod knowledge;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use brands::{all_brands, brand_by_id, is_known_brand, CigaretteBrand, DEFAULT_BRAND_ID};
pub use config::Config;
pub use curve::{
    compute_recovery_state, estimate_full_recovery_day, FULL_RECOVERY_THRESHOLD, MAX_PREVIEW_DAYS,
};
pub use knowledge::{answer_lung_question, LungPartId};
pub use milestones::{earned_badge_ids, merge_earned_badge_ids, MILESTONE_BADGES};
pub use model::{estimate_cigs_per_day, sanitize_inputs, validate_inputs};
pub use storage::{load_or_default, load_stored_state, StoredState, SCHEMA_VERSION};
pub use timeline::write_timeline_csv;
