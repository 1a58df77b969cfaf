//! Core domain types for the smoke-free recovery model.
//!
//! This module defines the fundamental types used throughout the system:
//! - Raw user-editable `Inputs` (every numeric field explicitly optional)
//! - Fully derived `ValidatedInputs`
//! - Per-day `RecoveryState` snapshots
//! - Validation outcome types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Enumerated input fields
// ============================================================================

/// How the user describes the length of their smoking history
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SmokingLengthMode {
    ExactDates,
    ApproxYears,
}

/// Unit for the consumption quantity field
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionUnit {
    Cigarettes,
    Packs,
}

/// Unit for the consumption interval field
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionIntervalUnit {
    Days,
    Weeks,
}

/// Biological sex used by the BMR and heart-rate estimates
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BiologicalSex {
    Female,
    Male,
    Other,
}

/// Weight entry unit
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    Kg,
    Lb,
}

/// Height entry unit
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HeightUnit {
    Cm,
    In,
}

/// Metabolism speed bucket derived from the metabolism factor
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetabolismCategory {
    Slower,
    Average,
    Faster,
}

impl fmt::Display for MetabolismCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MetabolismCategory::Slower => "slower",
            MetabolismCategory::Average => "average",
            MetabolismCategory::Faster => "faster",
        };
        f.write_str(label)
    }
}

// ============================================================================
// Number-or-empty form fields
// ============================================================================

/// Serde adapter for the "number or blank" form-field convention.
///
/// The persisted JSON contract allows a numeric field to be a finite
/// number, the empty string (field blank while the user was typing), or
/// `null`. All three normalize to `Option<f64>` on read; `None` writes
/// back as `""` so older readers of the state file keep working.
/// Non-finite numbers are treated as empty, never surfaced as NaN.
pub(crate) mod numberish {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
        Unit,
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Raw>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Raw::Num(n)) if n.is_finite() => Some(n),
            _ => None,
        })
    }

    pub fn serialize<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(n) if n.is_finite() => serializer.serialize_f64(*n),
            _ => serializer.serialize_str(""),
        }
    }
}

// ============================================================================
// Raw inputs
// ============================================================================

/// Raw, user-editable smoking and body-metric inputs.
///
/// Field names serialize in the camelCase form of the persisted state
/// contract. Every numeric field is either a finite number or the
/// explicit empty marker; dates stay raw ISO strings until validation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Inputs {
    pub smoking_length_mode: SmokingLengthMode,
    #[serde(rename = "smokingStartDateISO")]
    pub smoking_start_date_iso: String,
    #[serde(with = "numberish", default)]
    pub approx_smoking_years: Option<f64>,
    #[serde(rename = "quitDateISO")]
    pub quit_date_iso: String,
    pub consumption_unit: ConsumptionUnit,
    #[serde(with = "numberish", default)]
    pub consumption_quantity: Option<f64>,
    pub consumption_interval_unit: ConsumptionIntervalUnit,
    #[serde(with = "numberish", default)]
    pub consumption_interval_count: Option<f64>,
    pub cigarette_brand_id: String,
    #[serde(rename = "dobISO")]
    pub dob_iso: String,
    pub biological_sex: BiologicalSex,
    #[serde(with = "numberish", default)]
    pub weight_value: Option<f64>,
    pub weight_unit: WeightUnit,
    #[serde(with = "numberish", default)]
    pub height_value: Option<f64>,
    pub height_unit: HeightUnit,
}

// ============================================================================
// Validated inputs
// ============================================================================

/// Fully derived, canonical-unit profile used by the curve engine.
///
/// Either every field is populated and inside its documented clamp
/// range, or validation failed and no value exists at all. Weight is
/// kg, height cm, consumption cigarettes/day, dates real calendar days.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ValidatedInputs {
    pub smoking_length_mode: SmokingLengthMode,
    pub smoking_start_date: NaiveDate,
    pub quit_date: NaiveDate,
    pub dob: NaiveDate,
    pub smoking_years: f64,
    pub cigs_per_day: f64,
    pub packs_per_week: f64,
    pub cigarette_brand_id: String,
    pub brand_name: String,
    pub nicotine_mg_per_cig: f64,
    pub tar_mg_per_cig: f64,
    pub biological_sex: BiologicalSex,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: f64,
    pub bmi: f64,
    pub bmr_kcal_per_day: f64,
    pub metabolism_factor: f64,
    pub metabolism_category: MetabolismCategory,
    pub baseline_resting_heart_rate: f64,
    pub pack_years: f64,
    pub effective_pack_years: f64,
    pub daily_nicotine_mg: f64,
    pub daily_tar_mg: f64,
}

// ============================================================================
// Validation outcome
// ============================================================================

/// Identifies which raw input field a validation error belongs to
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum InputField {
    SmokingStartDate,
    ApproxSmokingYears,
    QuitDate,
    ConsumptionQuantity,
    ConsumptionIntervalCount,
    CigaretteBrandId,
    DateOfBirth,
    WeightValue,
    HeightValue,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InputField::SmokingStartDate => "smoking start date",
            InputField::ApproxSmokingYears => "years smoked",
            InputField::QuitDate => "quit date",
            InputField::ConsumptionQuantity => "consumption quantity",
            InputField::ConsumptionIntervalCount => "interval count",
            InputField::CigaretteBrandId => "cigarette brand",
            InputField::DateOfBirth => "date of birth",
            InputField::WeightValue => "weight",
            InputField::HeightValue => "height",
        };
        f.write_str(label)
    }
}

/// Per-field, human-readable validation errors
pub type InputErrors = BTreeMap<InputField, String>;

/// Outcome of [`crate::model::validate_inputs`]: either a fully derived
/// value with no errors, or no value and at least one error.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationResult {
    pub value: Option<ValidatedInputs>,
    pub errors: InputErrors,
}

// ============================================================================
// Recovery state
// ============================================================================

/// Per-day recovery snapshot handed to the presentation layer.
///
/// All subscores live in [0, 1]. A pure function of
/// (`ValidatedInputs`, preview day, now): identical inputs always
/// produce a bit-identical snapshot.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RecoveryState {
    // Subscores
    pub soot_load: f64,
    pub inflammation: f64,
    pub mucus: f64,
    pub cilia_function: f64,
    pub tar_burden: f64,
    pub nicotine_dependence: f64,
    pub dopamine_tolerance: f64,
    pub overall_dirtiness: f64,
    pub recovery_percent: f64,

    // Timeline position
    pub preview_days: i64,
    pub days_since_quit: i64,
    pub full_recovery_day: i64,
    pub is_projected: bool,

    // Cardio proxies
    pub resting_heart_rate: f64,
    pub respiration_rate: f64,

    // Profile echo for display layers
    pub smoking_years: f64,
    pub cigs_per_day: f64,
    pub packs_per_week: f64,
    pub pack_years: f64,
    pub effective_pack_years: f64,
    pub age_years: f64,
    pub bmi: f64,
    pub bmr_kcal_per_day: f64,
    pub metabolism_factor: f64,
    pub metabolism_category: MetabolismCategory,
    pub nicotine_mg_per_cig: f64,
    pub tar_mg_per_cig: f64,
    pub daily_nicotine_mg: f64,
    pub daily_tar_mg: f64,
}
