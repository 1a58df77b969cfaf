//! Input validation, sanitization, and derived-profile computation.
//!
//! Two entry points share one derivation path:
//! - [`validate_inputs`] reports every violated field together and only
//!   derives a [`ValidatedInputs`] when the whole record is clean.
//! - [`sanitize_inputs`] never fails: it clamps out-of-range values to
//!   the nearest boundary and substitutes documented fallbacks, which is
//!   what drives live previews while the user is mid-edit.

use crate::brands::{self, DEFAULT_BRAND_ID};
use crate::dates;
use crate::metrics;
use crate::types::{
    BiologicalSex, ConsumptionIntervalUnit, ConsumptionUnit, HeightUnit, InputErrors, InputField,
    Inputs, SmokingLengthMode, ValidatedInputs, ValidationResult, WeightUnit,
};
use crate::units;
use chrono::{NaiveDate, NaiveDateTime};

pub const MAX_SMOKING_YEARS: f64 = 80.0;
pub const MAX_CONSUMPTION_QUANTITY: f64 = 2000.0;
pub const MIN_CONSUMPTION_INTERVAL_COUNT: f64 = 1.0;
pub const MAX_CONSUMPTION_INTERVAL_COUNT: f64 = 365.0;
pub const MAX_CIGS_PER_DAY: f64 = 80.0;
pub const MIN_AGE_YEARS: f64 = 18.0;
pub const MAX_AGE_YEARS: f64 = 100.0;
pub const MIN_WEIGHT_KG: f64 = 30.0;
pub const MAX_WEIGHT_KG: f64 = 300.0;
pub const MIN_HEIGHT_CM: f64 = 100.0;
pub const MAX_HEIGHT_CM: f64 = 240.0;

/// Fallback age when a date of birth cannot be used at all
const FALLBACK_AGE_YEARS: f64 = 30.0;

impl Inputs {
    /// Default profile used on first run and as the migration baseline:
    /// 8 years of 10 cigarettes/day, quit today, reference brand,
    /// age 35, 70 kg / 170 cm.
    pub fn default_at(now: NaiveDateTime) -> Self {
        let today = dates::format_iso_date(now.date());
        let start = dates::format_iso_date(dates::date_years_before(8.0, now));

        Inputs {
            smoking_length_mode: SmokingLengthMode::ExactDates,
            smoking_start_date_iso: start,
            approx_smoking_years: Some(8.0),
            quit_date_iso: today,
            consumption_unit: ConsumptionUnit::Cigarettes,
            consumption_quantity: Some(10.0),
            consumption_interval_unit: ConsumptionIntervalUnit::Days,
            consumption_interval_count: Some(1.0),
            cigarette_brand_id: DEFAULT_BRAND_ID.to_string(),
            dob_iso: dates::format_iso_date(dates::infer_dob_from_age_years(35.0, now)),
            biological_sex: BiologicalSex::Other,
            weight_value: Some(70.0),
            weight_unit: WeightUnit::Kg,
            height_value: Some(170.0),
            height_unit: HeightUnit::Cm,
        }
    }
}

impl ValidatedInputs {
    /// Re-express the canonical profile as raw inputs. Sanitizing the
    /// result reproduces this record, which is how idempotence of the
    /// sanitize path is defined and tested.
    ///
    /// The smoking-length mode is preserved: an approx-years profile
    /// stays in approx-years mode so re-deriving from the formatted
    /// start date cannot perturb the year count.
    pub fn to_inputs(&self) -> Inputs {
        Inputs {
            smoking_length_mode: self.smoking_length_mode,
            smoking_start_date_iso: dates::format_iso_date(self.smoking_start_date),
            approx_smoking_years: Some(self.smoking_years),
            quit_date_iso: dates::format_iso_date(self.quit_date),
            consumption_unit: ConsumptionUnit::Cigarettes,
            consumption_quantity: Some(self.cigs_per_day),
            consumption_interval_unit: ConsumptionIntervalUnit::Days,
            consumption_interval_count: Some(1.0),
            cigarette_brand_id: self.cigarette_brand_id.clone(),
            dob_iso: dates::format_iso_date(self.dob),
            biological_sex: self.biological_sex,
            weight_value: Some(self.weight_kg),
            weight_unit: WeightUnit::Kg,
            height_value: Some(self.height_cm),
            height_unit: HeightUnit::Cm,
        }
    }
}

/// Cigarettes/day implied by a consumption pattern. A non-positive
/// interval yields zero rather than a division by zero.
pub fn estimate_cigs_per_day(
    unit: ConsumptionUnit,
    quantity: f64,
    interval_unit: ConsumptionIntervalUnit,
    interval_count: f64,
) -> f64 {
    let cigarettes = units::convert_consumption_quantity_for_unit(
        quantity,
        unit,
        ConsumptionUnit::Cigarettes,
    );
    let interval_days = match interval_unit {
        ConsumptionIntervalUnit::Days => interval_count,
        ConsumptionIntervalUnit::Weeks => interval_count * units::DAYS_PER_WEEK,
    };
    if interval_days <= 0.0 {
        return 0.0;
    }
    cigarettes / interval_days
}

/// Canonical fields that both validation and sanitization funnel into
/// the shared derivation.
struct CanonicalProfile {
    smoking_length_mode: SmokingLengthMode,
    smoking_start_date: NaiveDate,
    quit_date: NaiveDate,
    dob: NaiveDate,
    smoking_years: f64,
    cigs_per_day: f64,
    cigarette_brand_id: String,
    biological_sex: BiologicalSex,
    weight_kg: f64,
    height_cm: f64,
}

/// Compute every derived metric from a canonical profile. The record is
/// built whole: callers never see a partially populated value.
fn derive_validated(profile: CanonicalProfile, now: NaiveDateTime) -> ValidatedInputs {
    let brand = brands::brand_by_id(&profile.cigarette_brand_id);

    let age_years = dates::age_years_at(profile.dob, now);
    let bmi = metrics::bmi(profile.weight_kg, profile.height_cm);
    let bmr = metrics::bmr_kcal_per_day(
        profile.weight_kg,
        profile.height_cm,
        age_years,
        profile.biological_sex,
    );
    let metabolism_factor = metrics::metabolism_factor(bmr, profile.weight_kg);
    let metabolism_category = metrics::metabolism_category(metabolism_factor);
    let baseline_resting_heart_rate = metrics::baseline_resting_heart_rate(
        age_years,
        bmi,
        profile.biological_sex,
        metabolism_factor,
    );

    let pack_years = metrics::pack_years(profile.cigs_per_day, profile.smoking_years);
    let effective_pack_years =
        metrics::effective_pack_years(pack_years, brand.nicotine_mg, brand.tar_mg);

    ValidatedInputs {
        smoking_length_mode: profile.smoking_length_mode,
        smoking_start_date: profile.smoking_start_date,
        quit_date: profile.quit_date,
        dob: profile.dob,
        smoking_years: profile.smoking_years,
        cigs_per_day: profile.cigs_per_day,
        packs_per_week: profile.cigs_per_day / units::CIGS_PER_PACK * units::DAYS_PER_WEEK,
        cigarette_brand_id: brand.id.to_string(),
        brand_name: brand.name.to_string(),
        nicotine_mg_per_cig: brand.nicotine_mg,
        tar_mg_per_cig: brand.tar_mg,
        biological_sex: profile.biological_sex,
        weight_kg: profile.weight_kg,
        height_cm: profile.height_cm,
        age_years,
        bmi,
        bmr_kcal_per_day: bmr,
        metabolism_factor,
        metabolism_category,
        baseline_resting_heart_rate,
        pack_years,
        effective_pack_years,
        daily_nicotine_mg: profile.cigs_per_day * brand.nicotine_mg,
        daily_tar_mg: profile.cigs_per_day * brand.tar_mg,
    }
}

fn require_range(
    errors: &mut InputErrors,
    field: InputField,
    value: Option<f64>,
    min: f64,
    max: f64,
) -> Option<f64> {
    match value {
        None => {
            errors.insert(field, format!("Enter {}.", field));
            None
        }
        Some(v) if v < min || v > max => {
            errors.insert(
                field,
                format!(
                    "{} must be between {} and {}.",
                    capitalize(&field.to_string()),
                    min,
                    max
                ),
            );
            None
        }
        Some(v) => Some(v),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Validate raw inputs against the reference instant `now`.
///
/// Rules are independent: every violated field is reported, nothing
/// short-circuits. Derivation only runs when the error map stays empty.
pub fn validate_inputs(inputs: &Inputs, now: NaiveDateTime) -> ValidationResult {
    let mut errors = InputErrors::new();
    let today = now.date();

    // Quit date: real calendar date, not in the future.
    let quit_date = match dates::parse_iso_date(&inputs.quit_date_iso) {
        None => {
            errors.insert(InputField::QuitDate, "Enter a valid quit date.".into());
            None
        }
        Some(date) if date > today => {
            errors.insert(
                InputField::QuitDate,
                "Quit date cannot be in the future.".into(),
            );
            None
        }
        Some(date) => Some(date),
    };

    // Smoking length: either exact dates or an approximate year count.
    let mut smoking_start_date = None;
    let mut approx_years = None;
    match inputs.smoking_length_mode {
        SmokingLengthMode::ExactDates => {
            match dates::parse_iso_date(&inputs.smoking_start_date_iso) {
                None => {
                    errors.insert(
                        InputField::SmokingStartDate,
                        "Enter a valid smoking start date.".into(),
                    );
                }
                Some(start) => {
                    if let Some(quit) = quit_date {
                        if start > quit {
                            errors.insert(
                                InputField::SmokingStartDate,
                                "Smoking start date must be on or before quit date.".into(),
                            );
                        } else {
                            smoking_start_date = Some(start);
                        }
                    }
                }
            }
        }
        SmokingLengthMode::ApproxYears => {
            approx_years = require_range(
                &mut errors,
                InputField::ApproxSmokingYears,
                inputs.approx_smoking_years,
                0.0,
                MAX_SMOKING_YEARS,
            );
        }
    }

    // Consumption pattern plus the derived-rate cap.
    let quantity = require_range(
        &mut errors,
        InputField::ConsumptionQuantity,
        inputs.consumption_quantity,
        0.0,
        MAX_CONSUMPTION_QUANTITY,
    );
    let interval_count = require_range(
        &mut errors,
        InputField::ConsumptionIntervalCount,
        inputs.consumption_interval_count,
        MIN_CONSUMPTION_INTERVAL_COUNT,
        MAX_CONSUMPTION_INTERVAL_COUNT,
    );
    let mut cigs_per_day = None;
    if let (Some(quantity), Some(count)) = (quantity, interval_count) {
        let rate = estimate_cigs_per_day(
            inputs.consumption_unit,
            quantity,
            inputs.consumption_interval_unit,
            count,
        );
        if rate > MAX_CIGS_PER_DAY {
            errors.insert(
                InputField::ConsumptionQuantity,
                format!(
                    "That works out to {:.1} cigarettes/day; max supported is {} per day.",
                    rate, MAX_CIGS_PER_DAY
                ),
            );
        } else {
            cigs_per_day = Some(rate);
        }
    }

    // Date of birth and implied age.
    let dob = match dates::parse_iso_date(&inputs.dob_iso) {
        None => {
            errors.insert(
                InputField::DateOfBirth,
                "Enter a valid date of birth.".into(),
            );
            None
        }
        Some(date) if date > today => {
            errors.insert(
                InputField::DateOfBirth,
                "Date of birth cannot be in the future.".into(),
            );
            None
        }
        Some(date) => {
            let age = dates::age_years_at(date, now);
            if !(MIN_AGE_YEARS..=MAX_AGE_YEARS).contains(&age) {
                errors.insert(
                    InputField::DateOfBirth,
                    format!(
                        "Age must be between {} and {} years.",
                        MIN_AGE_YEARS, MAX_AGE_YEARS
                    ),
                );
                None
            } else {
                Some(date)
            }
        }
    };

    // Body metrics in canonical units.
    let weight_kg = match inputs.weight_value {
        None => {
            errors.insert(InputField::WeightValue, "Enter weight.".into());
            None
        }
        Some(value) => {
            let kg = units::convert_weight(value, inputs.weight_unit, WeightUnit::Kg);
            if !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&kg) {
                errors.insert(
                    InputField::WeightValue,
                    format!(
                        "Weight is outside supported range ({}-{} kg).",
                        MIN_WEIGHT_KG, MAX_WEIGHT_KG
                    ),
                );
                None
            } else {
                Some(kg)
            }
        }
    };
    let height_cm = match inputs.height_value {
        None => {
            errors.insert(InputField::HeightValue, "Enter height.".into());
            None
        }
        Some(value) => {
            let cm = units::convert_height(value, inputs.height_unit, HeightUnit::Cm);
            if !(MIN_HEIGHT_CM..=MAX_HEIGHT_CM).contains(&cm) {
                errors.insert(
                    InputField::HeightValue,
                    format!(
                        "Height is outside supported range ({}-{} cm).",
                        MIN_HEIGHT_CM, MAX_HEIGHT_CM
                    ),
                );
                None
            } else {
                Some(cm)
            }
        }
    };

    // Unknown brands are a lookup miss at the sanitize layer but an
    // error here.
    if !brands::is_known_brand(&inputs.cigarette_brand_id) {
        errors.insert(
            InputField::CigaretteBrandId,
            "Unknown cigarette brand.".into(),
        );
    }

    if !errors.is_empty() {
        return ValidationResult {
            value: None,
            errors,
        };
    }

    // All upstream fields valid; every unwrap below is backed by the
    // empty error map.
    let quit_date = quit_date.expect("quit date validated");
    let (smoking_start_date, smoking_years) = match inputs.smoking_length_mode {
        SmokingLengthMode::ExactDates => {
            let start = smoking_start_date.expect("start date validated");
            (start, dates::years_between(start, quit_date))
        }
        SmokingLengthMode::ApproxYears => {
            let years = approx_years.expect("approx years validated");
            let days_back = (years * dates::DAYS_PER_YEAR).round() as i64;
            (quit_date - chrono::Duration::days(days_back), years)
        }
    };

    let profile = CanonicalProfile {
        smoking_length_mode: inputs.smoking_length_mode,
        smoking_start_date,
        quit_date,
        dob: dob.expect("dob validated"),
        smoking_years,
        cigs_per_day: cigs_per_day.expect("rate validated"),
        cigarette_brand_id: inputs.cigarette_brand_id.clone(),
        biological_sex: inputs.biological_sex,
        weight_kg: weight_kg.expect("weight validated"),
        height_cm: height_cm.expect("height validated"),
    };

    ValidationResult {
        value: Some(derive_validated(profile, now)),
        errors,
    }
}

/// Best-effort counterpart to [`validate_inputs`]: always produces a
/// usable profile by clamping and substituting documented fallbacks.
/// Idempotent: sanitizing an already-sanitized record is a no-op.
pub fn sanitize_inputs(inputs: &Inputs, now: NaiveDateTime) -> ValidatedInputs {
    let today = now.date();

    // Invalid or future quit dates fall back to today; an invalid or
    // out-of-order start date collapses onto the quit date.
    let quit_date = dates::parse_iso_date(&inputs.quit_date_iso)
        .filter(|date| *date <= today)
        .unwrap_or(today);

    let (smoking_start_date, smoking_years) = match inputs.smoking_length_mode {
        SmokingLengthMode::ExactDates => {
            let start = dates::parse_iso_date(&inputs.smoking_start_date_iso)
                .filter(|date| *date <= quit_date)
                .unwrap_or(quit_date);
            (start, dates::years_between(start, quit_date))
        }
        SmokingLengthMode::ApproxYears => {
            let years = inputs
                .approx_smoking_years
                .unwrap_or(0.0)
                .clamp(0.0, MAX_SMOKING_YEARS);
            let days_back = (years * dates::DAYS_PER_YEAR).round() as i64;
            (quit_date - chrono::Duration::days(days_back), years)
        }
    };

    let quantity = inputs
        .consumption_quantity
        .unwrap_or(0.0)
        .clamp(0.0, MAX_CONSUMPTION_QUANTITY);
    let interval_count = inputs
        .consumption_interval_count
        .unwrap_or(MIN_CONSUMPTION_INTERVAL_COUNT)
        .clamp(MIN_CONSUMPTION_INTERVAL_COUNT, MAX_CONSUMPTION_INTERVAL_COUNT);
    let cigs_per_day = estimate_cigs_per_day(
        inputs.consumption_unit,
        quantity,
        inputs.consumption_interval_unit,
        interval_count,
    )
    .clamp(0.0, MAX_CIGS_PER_DAY);

    // Unusable birth dates fall back to an age-30 equivalent; usable
    // ones have the implied age clamped into the supported window.
    let mut dob = dates::parse_iso_date(&inputs.dob_iso)
        .filter(|date| *date <= today)
        .unwrap_or_else(|| dates::infer_dob_from_age_years(FALLBACK_AGE_YEARS, now));
    let age = dates::age_years_at(dob, now);
    if !(MIN_AGE_YEARS..=MAX_AGE_YEARS).contains(&age) {
        dob = dates::infer_dob_from_age_years(age.clamp(MIN_AGE_YEARS, MAX_AGE_YEARS), now);
    }

    let weight_kg = inputs
        .weight_value
        .map(|value| units::convert_weight(value, inputs.weight_unit, WeightUnit::Kg))
        .unwrap_or(0.0)
        .clamp(MIN_WEIGHT_KG, MAX_WEIGHT_KG);
    let height_cm = inputs
        .height_value
        .map(|value| units::convert_height(value, inputs.height_unit, HeightUnit::Cm))
        .unwrap_or(0.0)
        .clamp(MIN_HEIGHT_CM, MAX_HEIGHT_CM);

    let cigarette_brand_id = if brands::is_known_brand(&inputs.cigarette_brand_id) {
        inputs.cigarette_brand_id.clone()
    } else {
        DEFAULT_BRAND_ID.to_string()
    };

    derive_validated(
        CanonicalProfile {
            smoking_length_mode: inputs.smoking_length_mode,
            smoking_start_date,
            quit_date,
            dob,
            smoking_years,
            cigs_per_day,
            cigarette_brand_id,
            biological_sex: inputs.biological_sex,
            weight_kg,
            height_cm,
        },
        now,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn base_inputs() -> Inputs {
        Inputs {
            smoking_length_mode: SmokingLengthMode::ExactDates,
            smoking_start_date_iso: "2018-01-10".into(),
            approx_smoking_years: Some(8.0),
            quit_date_iso: "2026-01-10".into(),
            consumption_unit: ConsumptionUnit::Cigarettes,
            consumption_quantity: Some(10.0),
            consumption_interval_unit: ConsumptionIntervalUnit::Days,
            consumption_interval_count: Some(1.0),
            cigarette_brand_id: "average-us-king".into(),
            dob_iso: "1991-01-10".into(),
            biological_sex: BiologicalSex::Other,
            weight_value: Some(70.0),
            weight_unit: WeightUnit::Kg,
            height_value: Some(170.0),
            height_unit: HeightUnit::Cm,
        }
    }

    #[test]
    fn test_estimate_cigs_per_day() {
        let rate = estimate_cigs_per_day(
            ConsumptionUnit::Cigarettes,
            10.0,
            ConsumptionIntervalUnit::Days,
            1.0,
        );
        assert_eq!(rate, 10.0);

        let rate = estimate_cigs_per_day(
            ConsumptionUnit::Packs,
            2.0,
            ConsumptionIntervalUnit::Weeks,
            1.0,
        );
        assert!((rate - 5.714).abs() < 0.01);

        // Degenerate interval yields zero, never a division by zero.
        let rate = estimate_cigs_per_day(
            ConsumptionUnit::Packs,
            2.0,
            ConsumptionIntervalUnit::Days,
            0.0,
        );
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn test_validate_clean_profile() {
        let now = at(2026, 2, 26);
        let result = validate_inputs(&base_inputs(), now);

        assert!(result.errors.is_empty());
        let value = result.value.expect("valid profile derives a value");
        assert_eq!(value.cigs_per_day, 10.0);
        assert!((value.smoking_years - 8.0).abs() < 0.1);
        assert!((value.pack_years - value.cigs_per_day / 20.0 * value.smoking_years).abs() < 1e-9);
        assert_eq!(value.brand_name, "Average US king-size (reference)");
        assert!((value.packs_per_week - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_validate_reports_all_errors_together() {
        let now = at(2026, 2, 26);
        let mut inputs = base_inputs();
        inputs.consumption_quantity = Some(5000.0);
        inputs.consumption_interval_count = Some(0.0);
        inputs.weight_value = Some(20.0);
        inputs.height_value = Some(280.0);
        inputs.dob_iso = "2020-01-01".into();
        inputs.smoking_start_date_iso = "2026-03-10".into();

        let result = validate_inputs(&inputs, now);
        assert!(result.value.is_none());

        assert!(result.errors[&InputField::ConsumptionQuantity].contains("between 0 and 2000"));
        assert!(result.errors[&InputField::ConsumptionIntervalCount]
            .contains("between 1 and 365"));
        assert!(result.errors[&InputField::WeightValue].contains("outside supported range"));
        assert!(result.errors[&InputField::HeightValue].contains("outside supported range"));
        assert!(result.errors[&InputField::DateOfBirth].contains("between 18 and 100"));
        assert!(result.errors[&InputField::SmokingStartDate]
            .contains("on or before quit date"));
    }

    #[test]
    fn test_validate_flags_excessive_daily_rate() {
        let now = at(2026, 2, 26);
        let mut inputs = base_inputs();
        // 10 packs/day = 200 cigarettes/day: quantity in range, rate over cap.
        inputs.consumption_unit = ConsumptionUnit::Packs;
        inputs.consumption_quantity = Some(10.0);

        let result = validate_inputs(&inputs, now);
        assert!(result.value.is_none());
        let message = &result.errors[&InputField::ConsumptionQuantity];
        assert!(message.contains("200.0"));
        assert!(message.contains("max supported is 80"));
    }

    #[test]
    fn test_validate_rejects_future_quit_and_unknown_brand() {
        let now = at(2026, 2, 26);
        let mut inputs = base_inputs();
        inputs.quit_date_iso = "2099-01-01".into();
        inputs.cigarette_brand_id = "unknown-id".into();

        let result = validate_inputs(&inputs, now);
        assert!(result.value.is_none());
        assert!(result.errors[&InputField::QuitDate].contains("future"));
        assert!(result.errors[&InputField::CigaretteBrandId].contains("Unknown"));
    }

    #[test]
    fn test_validate_empty_numeric_fields() {
        let now = at(2026, 2, 26);
        let mut inputs = base_inputs();
        inputs.consumption_quantity = None;
        inputs.weight_value = None;

        let result = validate_inputs(&inputs, now);
        assert!(result.value.is_none());
        assert!(result.errors[&InputField::ConsumptionQuantity].starts_with("Enter"));
        assert!(result.errors[&InputField::WeightValue].starts_with("Enter"));
    }

    #[test]
    fn test_validate_approx_years_mode() {
        let now = at(2026, 2, 26);
        let mut inputs = base_inputs();
        inputs.smoking_length_mode = SmokingLengthMode::ApproxYears;
        inputs.smoking_start_date_iso = "garbage".into();
        inputs.approx_smoking_years = Some(12.0);

        let result = validate_inputs(&inputs, now);
        let value = result.value.expect("approx mode ignores start date");
        assert_eq!(value.smoking_years, 12.0);

        inputs.approx_smoking_years = Some(120.0);
        let result = validate_inputs(&inputs, now);
        assert!(result.errors[&InputField::ApproxSmokingYears].contains("between 0 and 80"));
    }

    #[test]
    fn test_sanitize_clamps_everything() {
        let now = at(2026, 2, 26);
        let inputs = Inputs {
            smoking_length_mode: SmokingLengthMode::ExactDates,
            smoking_start_date_iso: "2026-04-01".into(),
            approx_smoking_years: None,
            quit_date_iso: "2099-01-01".into(),
            consumption_unit: ConsumptionUnit::Packs,
            consumption_quantity: Some(250.0),
            consumption_interval_unit: ConsumptionIntervalUnit::Days,
            consumption_interval_count: Some(0.0),
            cigarette_brand_id: "unknown-id".into(),
            dob_iso: "2099-01-01".into(),
            biological_sex: BiologicalSex::Other,
            weight_value: Some(500.0),
            weight_unit: WeightUnit::Kg,
            height_value: Some(300.0),
            height_unit: HeightUnit::Cm,
        };

        let sanitized = sanitize_inputs(&inputs, now);
        assert_eq!(dates::format_iso_date(sanitized.quit_date), "2026-02-26");
        assert_eq!(
            dates::format_iso_date(sanitized.smoking_start_date),
            "2026-02-26"
        );
        assert!(sanitized.cigs_per_day <= MAX_CIGS_PER_DAY);
        assert_eq!(sanitized.weight_kg, MAX_WEIGHT_KG);
        assert_eq!(sanitized.height_cm, MAX_HEIGHT_CM);
        assert_eq!(sanitized.cigarette_brand_id, DEFAULT_BRAND_ID);
        assert_eq!(
            sanitized.dob,
            dates::infer_dob_from_age_years(30.0, now)
        );
    }

    #[test]
    fn test_sanitize_is_idempotent_exact_dates() {
        let now = at(2026, 2, 26);
        let mut inputs = base_inputs();
        inputs.weight_value = Some(500.0);
        inputs.quit_date_iso = "bogus".into();

        let first = sanitize_inputs(&inputs, now);
        let second = sanitize_inputs(&first.to_inputs(), now);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sanitize_is_idempotent_approx_years() {
        let now = at(2026, 2, 26);
        let mut inputs = base_inputs();
        inputs.smoking_length_mode = SmokingLengthMode::ApproxYears;
        inputs.approx_smoking_years = Some(7.0);

        let first = sanitize_inputs(&inputs, now);
        assert_eq!(first.smoking_length_mode, SmokingLengthMode::ApproxYears);
        assert_eq!(first.smoking_years, 7.0);

        // Re-sanitizing must keep the year count exact: re-deriving it
        // from the inferred start date would drift to 2557/365.25 years
        // and shift every pack-year-driven curve output with it.
        let second = sanitize_inputs(&first.to_inputs(), now);
        assert_eq!(second.smoking_years, 7.0);
        assert_eq!(second.pack_years, first.pack_years);
        assert_eq!(second.effective_pack_years, first.effective_pack_years);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sanitize_empty_fields_never_panics() {
        let now = at(2026, 2, 26);
        let mut inputs = base_inputs();
        inputs.consumption_quantity = None;
        inputs.consumption_interval_count = None;
        inputs.weight_value = None;
        inputs.height_value = None;
        inputs.approx_smoking_years = None;

        let sanitized = sanitize_inputs(&inputs, now);
        assert_eq!(sanitized.cigs_per_day, 0.0);
        assert_eq!(sanitized.weight_kg, MIN_WEIGHT_KG);
        assert_eq!(sanitized.height_cm, MIN_HEIGHT_CM);
    }

    #[test]
    fn test_default_inputs_validate_cleanly() {
        let now = at(2026, 2, 26);
        let result = validate_inputs(&Inputs::default_at(now), now);
        assert!(result.errors.is_empty(), "errors: {:?}", result.errors);
        assert!(result.value.is_some());
    }
}
