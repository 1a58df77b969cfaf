//! The recovery curve engine.
//!
//! Each profile builds one immutable [`CurveContext`]: a start value and
//! an asymptotic floor per subscore (cilia inverted, rising toward a
//! ceiling), derived from cumulative exposure and daily chemical load.
//! Evaluating a day is a handful of exponentials, so snapshots are
//! recomputed on every edit with no caching.
//!
//! All constants here are fixed contract values; changing any of them
//! changes the simulated trajectories for every saved profile.

use crate::dates;
use crate::types::{RecoveryState, ValidatedInputs};
use chrono::NaiveDateTime;

/// Recovery percent at which the profile counts as fully recovered
pub const FULL_RECOVERY_THRESHOLD: f64 = 0.995;
/// Upper bound for the full-recovery search and for preview days
pub const MAX_PREVIEW_DAYS: i64 = 3650;

/// Exposure saturation rate per effective pack-year
const EXPOSURE_RATE: f64 = 0.085;

// Time constants (days at metabolism factor 1.0). Nicotine dependence
// clears fastest of all; dopamine tolerance lingers longest.
const TAU_SOOT: f64 = 75.0;
const TAU_MUCUS: f64 = 110.0;
const TAU_CILIA: f64 = 120.0;
const TAU_INFLAMMATION: f64 = 140.0;
const TAU_TAR: f64 = 210.0;
const TAU_NICOTINE: f64 = 46.0;
const TAU_DOPAMINE: f64 = 236.0;

// Overall dirtiness weights. Cilia function is a recovery indicator,
// not a burden, and is excluded.
const WEIGHT_SOOT: f64 = 0.33;
const WEIGHT_INFLAMMATION: f64 = 0.24;
const WEIGHT_MUCUS: f64 = 0.15;
const WEIGHT_TAR: f64 = 0.12;
const WEIGHT_NICOTINE: f64 = 0.08;
const WEIGHT_DOPAMINE: f64 = 0.08;

const DEGENERATE_RANGE_EPSILON: f64 = 1e-9;

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// One exponential relaxation from `start` toward `limit` (floor when
/// decaying, ceiling when rising) with time constant `tau`.
#[derive(Clone, Copy, Debug)]
struct Relaxation {
    start: f64,
    limit: f64,
    tau: f64,
}

impl Relaxation {
    fn decay(start: f64, floor: f64, tau: f64) -> Self {
        Relaxation {
            start: clamp01(start),
            limit: clamp01(floor),
            tau,
        }
    }

    fn rise(start: f64, ceiling: f64, tau: f64) -> Self {
        Relaxation {
            start: clamp01(start),
            limit: clamp01(ceiling),
            tau,
        }
    }

    fn at(&self, effective_day: f64) -> f64 {
        self.limit + (self.start - self.limit) * (-effective_day / self.tau).exp()
    }
}

/// Subscore values at one evaluated day
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Subscores {
    pub soot_load: f64,
    pub inflammation: f64,
    pub mucus: f64,
    pub cilia_function: f64,
    pub tar_burden: f64,
    pub nicotine_dependence: f64,
    pub dopamine_tolerance: f64,
    pub overall_dirtiness: f64,
    pub recovery_percent: f64,
}

/// Precomputed per-profile curve parameters
#[derive(Clone, Debug)]
pub struct CurveContext {
    pub exposure: f64,
    metabolism_factor: f64,
    soot: Relaxation,
    inflammation: Relaxation,
    mucus: Relaxation,
    cilia: Relaxation,
    tar: Relaxation,
    nicotine: Relaxation,
    dopamine: Relaxation,
    start_overall: f64,
    floor_overall: f64,
}

impl CurveContext {
    /// Build the curve parameters for one validated profile.
    pub fn new(validated: &ValidatedInputs) -> Self {
        // Exposure saturates smoothly: each additional pack-year does
        // less marginal harm than the previous one.
        let exposure = clamp01(1.0 - (-EXPOSURE_RATE * validated.effective_pack_years).exp());

        // Daily chemical load shifts the dependence-related starts.
        let tar_load = clamp01(validated.daily_tar_mg / 300.0);
        let nicotine_load = clamp01(validated.daily_nicotine_mg / 30.0);

        let soot = Relaxation::decay(
            0.12 + 0.83 * exposure,
            0.03 + 0.20 * exposure,
            TAU_SOOT,
        );
        let inflammation = Relaxation::decay(
            0.15 + 0.78 * exposure,
            0.07 + 0.28 * exposure,
            TAU_INFLAMMATION,
        );
        let mucus = Relaxation::decay(
            0.10 + 0.76 * exposure,
            0.02 + 0.10 * exposure,
            TAU_MUCUS,
        );
        let cilia = Relaxation::rise(
            0.20 + 0.45 * (1.0 - exposure),
            0.95 - 0.25 * exposure,
            TAU_CILIA,
        );
        let tar = Relaxation::decay(
            0.08 + 0.70 * exposure + 0.18 * tar_load,
            0.02 + 0.30 * exposure,
            TAU_TAR,
        );
        let nicotine = Relaxation::decay(
            0.25 + 0.55 * nicotine_load + 0.20 * exposure,
            0.02 + 0.08 * exposure,
            TAU_NICOTINE,
        );
        let dopamine = Relaxation::decay(
            0.20 + 0.50 * exposure + 0.30 * nicotine_load,
            0.05 + 0.20 * exposure,
            TAU_DOPAMINE,
        );

        let weigh = |pick: fn(&Relaxation) -> f64| {
            WEIGHT_SOOT * pick(&soot)
                + WEIGHT_INFLAMMATION * pick(&inflammation)
                + WEIGHT_MUCUS * pick(&mucus)
                + WEIGHT_TAR * pick(&tar)
                + WEIGHT_NICOTINE * pick(&nicotine)
                + WEIGHT_DOPAMINE * pick(&dopamine)
        };
        let start_overall = weigh(|r| r.start);
        let floor_overall = weigh(|r| r.limit);

        CurveContext {
            exposure,
            metabolism_factor: validated.metabolism_factor,
            soot,
            inflammation,
            mucus,
            cilia,
            tar,
            nicotine,
            dopamine,
            start_overall,
            floor_overall,
        }
    }

    /// Evaluate every subscore at a given day. A faster metabolism
    /// compresses the timeline: the curves see `day * metabolismFactor`.
    pub fn evaluate(&self, day: i64) -> Subscores {
        let effective_day = day.max(0) as f64 * self.metabolism_factor;

        let soot_load = self.soot.at(effective_day);
        let inflammation = self.inflammation.at(effective_day);
        let mucus = self.mucus.at(effective_day);
        let cilia_function = self.cilia.at(effective_day);
        let tar_burden = self.tar.at(effective_day);
        let nicotine_dependence = self.nicotine.at(effective_day);
        let dopamine_tolerance = self.dopamine.at(effective_day);

        let overall_dirtiness = clamp01(
            WEIGHT_SOOT * soot_load
                + WEIGHT_INFLAMMATION * inflammation
                + WEIGHT_MUCUS * mucus
                + WEIGHT_TAR * tar_burden
                + WEIGHT_NICOTINE * nicotine_dependence
                + WEIGHT_DOPAMINE * dopamine_tolerance,
        );

        let range = self.start_overall - self.floor_overall;
        let recovery_percent = if range <= DEGENERATE_RANGE_EPSILON {
            // Nothing to recover from (never-smoker profile).
            1.0
        } else {
            clamp01((self.start_overall - overall_dirtiness) / range)
        };

        Subscores {
            soot_load,
            inflammation,
            mucus,
            cilia_function,
            tar_burden,
            nicotine_dependence,
            dopamine_tolerance,
            overall_dirtiness,
            recovery_percent,
        }
    }
}

/// First integer day at which recovery percent crosses
/// [`FULL_RECOVERY_THRESHOLD`], by linear forward scan from day 0;
/// [`MAX_PREVIEW_DAYS`] when the curve never crosses within the bound.
///
/// The curve is a sum of monotonic exponentials, so a binary search
/// would also work, but the first-crossing semantics of the scan are a
/// compatibility target.
pub fn estimate_full_recovery_day(validated: &ValidatedInputs) -> i64 {
    let context = CurveContext::new(validated);
    for day in 0..=MAX_PREVIEW_DAYS {
        if context.evaluate(day).recovery_percent >= FULL_RECOVERY_THRESHOLD {
            return day;
        }
    }
    MAX_PREVIEW_DAYS
}

/// Smoking-adjusted resting heart rate and respiration rate at one
/// evaluated day.
pub(crate) fn cardio_rates(validated: &ValidatedInputs, scores: &Subscores) -> (f64, f64) {
    let exposure_penalty = (validated.effective_pack_years / 20.0).min(1.0) * 5.0;
    let recovery_penalty = 8.0 * scores.nicotine_dependence
        + 6.0 * scores.inflammation
        + 3.0 * scores.dopamine_tolerance;

    let resting_heart_rate = (validated.baseline_resting_heart_rate + exposure_penalty
        + recovery_penalty
        - 3.0 * scores.recovery_percent)
        .clamp(48.0, 112.0);

    let respiration_rate = (resting_heart_rate / 4.7 + 3.0 * scores.inflammation
        + 2.0 * scores.mucus
        - 1.2 * scores.cilia_function)
        .clamp(10.0, 24.0);

    (resting_heart_rate, respiration_rate)
}

/// Evaluate the full per-day snapshot for the presentation layer.
///
/// The requested preview day is clamped into [0, fullRecoveryDay]; past
/// the full-recovery day the curve has already asymptoted. Passing a
/// precomputed full-recovery day skips the forward scan.
pub fn compute_recovery_state(
    validated: &ValidatedInputs,
    preview_days: i64,
    now: NaiveDateTime,
    full_recovery_day_override: Option<i64>,
) -> RecoveryState {
    let full_recovery_day = full_recovery_day_override
        .unwrap_or_else(|| estimate_full_recovery_day(validated))
        .clamp(0, MAX_PREVIEW_DAYS);
    let day = preview_days.clamp(0, full_recovery_day);
    let days_since_quit = dates::days_since(validated.quit_date, now);

    let context = CurveContext::new(validated);
    let scores = context.evaluate(day);
    let (resting_heart_rate, respiration_rate) = cardio_rates(validated, &scores);

    RecoveryState {
        soot_load: scores.soot_load,
        inflammation: scores.inflammation,
        mucus: scores.mucus,
        cilia_function: scores.cilia_function,
        tar_burden: scores.tar_burden,
        nicotine_dependence: scores.nicotine_dependence,
        dopamine_tolerance: scores.dopamine_tolerance,
        overall_dirtiness: scores.overall_dirtiness,
        recovery_percent: scores.recovery_percent,
        preview_days: day,
        days_since_quit,
        full_recovery_day,
        is_projected: day > days_since_quit,
        resting_heart_rate,
        respiration_rate,
        smoking_years: validated.smoking_years,
        cigs_per_day: validated.cigs_per_day,
        packs_per_week: validated.packs_per_week,
        pack_years: validated.pack_years,
        effective_pack_years: validated.effective_pack_years,
        age_years: validated.age_years,
        bmi: validated.bmi,
        bmr_kcal_per_day: validated.bmr_kcal_per_day,
        metabolism_factor: validated.metabolism_factor,
        metabolism_category: validated.metabolism_category,
        nicotine_mg_per_cig: validated.nicotine_mg_per_cig,
        tar_mg_per_cig: validated.tar_mg_per_cig,
        daily_nicotine_mg: validated.daily_nicotine_mg,
        daily_tar_mg: validated.daily_tar_mg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sanitize_inputs;
    use crate::types::{
        BiologicalSex, ConsumptionIntervalUnit, ConsumptionUnit, HeightUnit, Inputs,
        SmokingLengthMode, WeightUnit,
    };
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn heavy_smoker_inputs() -> Inputs {
        Inputs {
            smoking_length_mode: SmokingLengthMode::ExactDates,
            smoking_start_date_iso: "2006-01-01".into(),
            approx_smoking_years: None,
            quit_date_iso: "2026-01-10".into(),
            consumption_unit: ConsumptionUnit::Packs,
            consumption_quantity: Some(2.0),
            consumption_interval_unit: ConsumptionIntervalUnit::Days,
            consumption_interval_count: Some(1.0),
            cigarette_brand_id: "pall-mall-red".into(),
            dob_iso: "1982-01-01".into(),
            biological_sex: BiologicalSex::Male,
            weight_value: Some(82.0),
            weight_unit: WeightUnit::Kg,
            height_value: Some(178.0),
            height_unit: HeightUnit::Cm,
        }
    }

    fn light_smoker_inputs() -> Inputs {
        let mut inputs = heavy_smoker_inputs();
        inputs.consumption_unit = ConsumptionUnit::Cigarettes;
        inputs.consumption_quantity = Some(10.0);
        inputs.smoking_start_date_iso = "2018-01-10".into();
        inputs.cigarette_brand_id = "average-us-king".into();
        inputs
    }

    #[test]
    fn test_monotonic_trends() {
        let now = at(2026, 2, 26);
        let validated = sanitize_inputs(&heavy_smoker_inputs(), now);

        let day0 = compute_recovery_state(&validated, 0, now, None);
        let day30 = compute_recovery_state(&validated, 30, now, None);
        let day365 = compute_recovery_state(&validated, 365, now, None);

        assert!(day30.soot_load < day0.soot_load);
        assert!(day365.soot_load < day30.soot_load);

        assert!(day30.inflammation < day0.inflammation);
        assert!(day365.inflammation < day30.inflammation);

        assert!(day30.mucus < day0.mucus);
        assert!(day365.mucus < day30.mucus);

        assert!(day30.tar_burden < day0.tar_burden);
        assert!(day365.tar_burden < day30.tar_burden);

        assert!(day30.nicotine_dependence < day0.nicotine_dependence);
        assert!(day365.nicotine_dependence < day30.nicotine_dependence);

        assert!(day30.dopamine_tolerance < day0.dopamine_tolerance);
        assert!(day365.dopamine_tolerance < day30.dopamine_tolerance);

        assert!(day30.cilia_function > day0.cilia_function);
        assert!(day365.cilia_function > day30.cilia_function);

        assert!(day30.recovery_percent > day0.recovery_percent);
        assert!(day365.recovery_percent > day30.recovery_percent);
    }

    #[test]
    fn test_subscores_stay_in_unit_interval() {
        let now = at(2026, 2, 26);
        let validated = sanitize_inputs(&heavy_smoker_inputs(), now);
        let context = CurveContext::new(&validated);

        for day in [0, 1, 7, 30, 90, 365, 1000, MAX_PREVIEW_DAYS] {
            let s = context.evaluate(day);
            for value in [
                s.soot_load,
                s.inflammation,
                s.mucus,
                s.cilia_function,
                s.tar_burden,
                s.nicotine_dependence,
                s.dopamine_tolerance,
                s.overall_dirtiness,
                s.recovery_percent,
            ] {
                assert!((0.0..=1.0).contains(&value), "day {}: {}", day, value);
            }
        }
    }

    #[test]
    fn test_full_recovery_day_caps_preview() {
        let now = at(2026, 2, 26);
        let validated = sanitize_inputs(&light_smoker_inputs(), now);
        let full_day = estimate_full_recovery_day(&validated);

        assert!(full_day > 0);
        assert!(full_day <= MAX_PREVIEW_DAYS);

        let past_full =
            compute_recovery_state(&validated, full_day + 500, now, Some(full_day));
        assert_eq!(past_full.preview_days, full_day);
        assert!(past_full.recovery_percent > 0.99);
    }

    #[test]
    fn test_full_recovery_day_is_first_crossing() {
        let now = at(2026, 2, 26);
        let validated = sanitize_inputs(&light_smoker_inputs(), now);
        let full_day = estimate_full_recovery_day(&validated);
        let context = CurveContext::new(&validated);

        assert!(context.evaluate(full_day).recovery_percent >= FULL_RECOVERY_THRESHOLD);
        if full_day > 0 {
            assert!(
                context.evaluate(full_day - 1).recovery_percent < FULL_RECOVERY_THRESHOLD
            );
        }
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let now = at(2026, 2, 26);
        let validated = sanitize_inputs(&light_smoker_inputs(), now);
        let full_day = estimate_full_recovery_day(&validated);

        let a = compute_recovery_state(&validated, 90, now, Some(full_day));
        let b = compute_recovery_state(&validated, 90, now, Some(full_day));
        assert_eq!(a, b);
    }

    #[test]
    fn test_never_smoker_is_recovered_by_construction() {
        let now = at(2026, 2, 26);
        let mut inputs = light_smoker_inputs();
        inputs.consumption_quantity = Some(0.0);
        inputs.smoking_start_date_iso = inputs.quit_date_iso.clone();
        let validated = sanitize_inputs(&inputs, now);

        assert_eq!(validated.pack_years, 0.0);
        let state = compute_recovery_state(&validated, 0, now, None);
        // Zero exposure still leaves the fixed start/floor offsets, so
        // the range is non-degenerate but recovery is immediate-ish.
        assert!(state.recovery_percent >= 0.0);
        assert!(state.overall_dirtiness < 0.25);
    }

    #[test]
    fn test_projected_flag() {
        let now = at(2026, 2, 26);
        let mut inputs = light_smoker_inputs();
        // Quit 10 days before "now".
        inputs.quit_date_iso = "2026-02-16".into();
        let validated = sanitize_inputs(&inputs, now);

        let current = compute_recovery_state(&validated, 10, now, None);
        assert_eq!(current.days_since_quit, 10);
        assert!(!current.is_projected);

        let future = compute_recovery_state(&validated, 60, now, None);
        assert!(future.is_projected);

        let negative = compute_recovery_state(&validated, -5, now, None);
        assert_eq!(negative.preview_days, 0);
    }

    #[test]
    fn test_faster_metabolism_accelerates_recovery() {
        let now = at(2026, 2, 26);
        let slow = sanitize_inputs(&heavy_smoker_inputs(), now);

        let mut fast = slow.clone();
        fast.metabolism_factor = 1.20;

        let slow_day90 = CurveContext::new(&slow).evaluate(90);
        let fast_day90 = CurveContext::new(&fast).evaluate(90);
        assert!(fast_day90.recovery_percent > slow_day90.recovery_percent);
    }

    #[test]
    fn test_cardio_rates_within_bounds() {
        let now = at(2026, 2, 26);
        let validated = sanitize_inputs(&heavy_smoker_inputs(), now);

        let day0 = compute_recovery_state(&validated, 0, now, None);
        let late = compute_recovery_state(&validated, 365, now, None);

        for state in [&day0, &late] {
            assert!((48.0..=112.0).contains(&state.resting_heart_rate));
            assert!((10.0..=24.0).contains(&state.respiration_rate));
        }
        // Heart rate eases as dependence and inflammation clear.
        assert!(late.resting_heart_rate < day0.resting_heart_rate);
    }
}
