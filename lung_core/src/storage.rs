//! Persisted state with file locking and legacy-schema migration.
//!
//! One JSON state file holds the last committed raw inputs plus the set
//! of earned badge ids, versioned by `schemaVersion`. Reads accept the
//! legacy unversioned shape `{yearsSmoking, cigsPerDay, quitDateISO}`
//! and migrate it on load; corrupt files are discarded with a warning
//! rather than surfaced as errors.

use crate::brands::DEFAULT_BRAND_ID;
use crate::dates;
use crate::types::{numberish, Inputs};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Current persisted schema version
pub const SCHEMA_VERSION: u32 = 2;

/// The versioned persisted record
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredState {
    pub schema_version: u32,
    pub inputs: Inputs,
    pub earned_badge_ids: Vec<String>,
}

/// Legacy 3-field shape from the first schema generation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyInputs {
    #[serde(with = "numberish", default)]
    years_smoking: Option<f64>,
    #[serde(with = "numberish", default)]
    cigs_per_day: Option<f64>,
    #[serde(rename = "quitDateISO")]
    quit_date_iso: String,
}

impl StoredState {
    pub fn new(inputs: Inputs, earned_badge_ids: Vec<String>) -> Self {
        StoredState {
            schema_version: SCHEMA_VERSION,
            inputs,
            earned_badge_ids,
        }
    }

    /// Save atomically: write to a locked temp file in the same
    /// directory, fsync, then rename over the original.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            Error::Storage("state path missing parent directory".into())
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved state to {:?}", path);
        Ok(())
    }
}

/// Normalize a persisted badge list: drop non-strings and empties,
/// de-duplicate while keeping first-seen order.
fn normalize_badge_ids(value: Option<&serde_json::Value>) -> Vec<String> {
    let Some(serde_json::Value::Array(items)) = value else {
        return Vec::new();
    };

    let mut ids = Vec::new();
    for item in items {
        if let serde_json::Value::String(id) = item {
            if !id.is_empty() && !ids.contains(id) {
                ids.push(id.clone());
            }
        }
    }
    ids
}

/// Build current-schema inputs from the legacy 3-field record:
/// smoking start inferred from years smoked, body metrics defaulted,
/// brand defaulted to the reference entry.
fn migrate_legacy(legacy: LegacyInputs, now: NaiveDateTime) -> StoredState {
    let mut inputs = Inputs::default_at(now);

    let years = legacy.years_smoking.unwrap_or(0.0).max(0.0);
    let days_back = (years * dates::DAYS_PER_YEAR).round() as i64;

    inputs.quit_date_iso = legacy.quit_date_iso.clone();
    inputs.smoking_start_date_iso = dates::add_days_to_iso(&legacy.quit_date_iso, -days_back)
        .unwrap_or(legacy.quit_date_iso);
    inputs.approx_smoking_years = legacy.years_smoking;
    inputs.consumption_quantity = legacy.cigs_per_day;
    inputs.cigarette_brand_id = DEFAULT_BRAND_ID.to_string();

    tracing::info!("Migrated legacy v1 inputs to schema v{}", SCHEMA_VERSION);

    // Legacy records predate badges: nothing earned yet to preserve.
    StoredState::new(inputs, Vec::new())
}

/// Load persisted state, migrating legacy records on the fly.
///
/// Returns `Ok(None)` when no file exists or when the contents are
/// unusable, in which case the caller falls back to defaults. IO and parse failures
/// on read are absorbed with a warning, never propagated.
pub fn load_stored_state(path: &Path, now: NaiveDateTime) -> Result<Option<StoredState>> {
    if !path.exists() {
        tracing::info!("No state file found at {:?}", path);
        return Ok(None);
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Unable to open state file {:?}: {}. Ignoring.", path, e);
            return Ok(None);
        }
    };

    if let Err(e) = file.lock_shared() {
        tracing::warn!("Unable to lock state file {:?}: {}. Ignoring.", path, e);
        return Ok(None);
    }

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    let read_result = reader.read_to_string(&mut contents);
    let _ = file.unlock();
    if let Err(e) = read_result {
        tracing::warn!("Failed to read state file {:?}: {}. Ignoring.", path, e);
        return Ok(None);
    }

    let value: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("State file {:?} is not valid JSON: {}. Discarding.", path, e);
            return Ok(None);
        }
    };

    // Current schema first. Inputs and badges are picked apart so a
    // mangled badge list degrades to normalization, not a full discard.
    if value.get("schemaVersion").and_then(|v| v.as_u64()) == Some(SCHEMA_VERSION as u64) {
        let inputs_value = value.get("inputs").cloned().unwrap_or(serde_json::Value::Null);
        match serde_json::from_value::<Inputs>(inputs_value) {
            Ok(inputs) => {
                let badges = normalize_badge_ids(value.get("earnedBadgeIds"));
                return Ok(Some(StoredState::new(inputs, badges)));
            }
            Err(e) => {
                tracing::warn!(
                    "Unusable v{} state in {:?}: {}. Discarding.",
                    SCHEMA_VERSION,
                    path,
                    e
                );
                return Ok(None);
            }
        }
    }

    // Unversioned legacy shape.
    match serde_json::from_value::<LegacyInputs>(value) {
        Ok(legacy) => Ok(Some(migrate_legacy(legacy, now))),
        Err(e) => {
            tracing::warn!("Unrecognized state shape in {:?}: {}. Discarding.", path, e);
            Ok(None)
        }
    }
}

/// Load state or fall back to a fresh default profile. The returned
/// inputs may still hold mid-edit values; callers sanitize before use.
pub fn load_or_default(path: &Path, now: NaiveDateTime) -> Result<StoredState> {
    match load_stored_state(path, now)? {
        Some(state) => Ok(state),
        None => Ok(StoredState::new(Inputs::default_at(now), Vec::new())),
    }
}
