//! Derived physiological metrics.
//!
//! BMI, Mifflin-St Jeor BMR, the metabolism factor that scales simulated
//! recovery speed, baseline resting heart rate, and pack-year math
//! including the brand chemistry adjustment. These are tuned contract
//! values; every result is clamped to its documented range.

use crate::types::{BiologicalSex, MetabolismCategory};

const BMR_BASELINE_KCAL: f64 = 1600.0;
const REFERENCE_WEIGHT_KG: f64 = 70.0;

/// Body mass index from canonical units. A degenerate zero height is
/// defined as BMI 0 rather than a division by zero.
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    if height_cm <= 0.0 {
        return 0.0;
    }
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Basal metabolic rate (kcal/day) via Mifflin-St Jeor with a neutral
/// blended offset for the "other" sex option.
pub fn bmr_kcal_per_day(weight_kg: f64, height_cm: f64, age_years: f64, sex: BiologicalSex) -> f64 {
    let sex_offset = match sex {
        BiologicalSex::Male => 5.0,
        BiologicalSex::Female => -161.0,
        BiologicalSex::Other => -78.0,
    };
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years + sex_offset
}

/// Metabolism factor: a weighted blend of BMR against a 1600 kcal
/// baseline and body mass against 70 kg, clamped to [0.80, 1.25].
pub fn metabolism_factor(bmr_kcal: f64, weight_kg: f64) -> f64 {
    let bmr_component = bmr_kcal / BMR_BASELINE_KCAL;
    let mass_component = (weight_kg / REFERENCE_WEIGHT_KG).max(0.0).sqrt();
    (0.62 * bmr_component + 0.38 * mass_component).clamp(0.80, 1.25)
}

/// Bucket a metabolism factor into a display category.
pub fn metabolism_category(factor: f64) -> MetabolismCategory {
    if factor < 0.95 {
        MetabolismCategory::Slower
    } else if factor > 1.07 {
        MetabolismCategory::Faster
    } else {
        MetabolismCategory::Average
    }
}

/// Baseline resting heart rate (bpm) before any smoking penalty,
/// clamped to [52, 95].
pub fn baseline_resting_heart_rate(
    age_years: f64,
    bmi: f64,
    sex: BiologicalSex,
    metabolism_factor: f64,
) -> f64 {
    let sex_offset = match sex {
        BiologicalSex::Male => -1.0,
        BiologicalSex::Female => 1.0,
        BiologicalSex::Other => 0.0,
    };
    let rate = 70.0
        + sex_offset
        + 0.22 * (age_years - 35.0)
        + 0.75 * (bmi - 22.0)
        + 10.0 * (1.0 - metabolism_factor);
    rate.clamp(52.0, 95.0)
}

/// Pack-years: (cigarettes/day / 20) * years smoked.
pub fn pack_years(cigs_per_day: f64, years_smoking: f64) -> f64 {
    (cigs_per_day / 20.0) * years_smoking
}

/// Brand chemistry multiplier in [0.86, 1.20], weighting tar over
/// nicotine. Normalization windows: tar 6-20 mg, nicotine 0.4-1.7 mg.
pub fn brand_chemistry_multiplier(nicotine_mg: f64, tar_mg: f64) -> f64 {
    let norm_tar = ((tar_mg - 6.0) / 14.0).clamp(0.0, 1.0);
    let norm_nicotine = ((nicotine_mg - 0.4) / 1.3).clamp(0.0, 1.0);
    0.86 + 0.34 * (0.68 * norm_tar + 0.32 * norm_nicotine)
}

/// Pack-years scaled by the brand chemistry multiplier.
pub fn effective_pack_years(pack_years: f64, nicotine_mg: f64, tar_mg: f64) -> f64 {
    pack_years * brand_chemistry_multiplier(nicotine_mg, tar_mg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_years_exact() {
        assert_eq!(pack_years(20.0, 10.0), 10.0);
        assert_eq!(pack_years(10.0, 8.0), 4.0);
        assert_eq!(pack_years(0.0, 12.0), 0.0);
    }

    #[test]
    fn test_bmi_guards_zero_height() {
        assert_eq!(bmi(70.0, 0.0), 0.0);
        assert!((bmi(70.0, 170.0) - 24.22).abs() < 0.01);
    }

    #[test]
    fn test_bmr_sex_offsets() {
        let male = bmr_kcal_per_day(70.0, 170.0, 35.0, BiologicalSex::Male);
        let female = bmr_kcal_per_day(70.0, 170.0, 35.0, BiologicalSex::Female);
        let other = bmr_kcal_per_day(70.0, 170.0, 35.0, BiologicalSex::Other);

        // 10*70 + 6.25*170 - 5*35 = 1587.5 before the offset
        assert!((male - 1592.5).abs() < 1e-9);
        assert!((female - 1426.5).abs() < 1e-9);
        assert!((other - 1509.5).abs() < 1e-9);
    }

    #[test]
    fn test_metabolism_factor_clamped() {
        assert_eq!(metabolism_factor(0.0, 0.0), 0.80);
        assert_eq!(metabolism_factor(10_000.0, 300.0), 1.25);

        let mid = metabolism_factor(1600.0, 70.0);
        assert!((mid - 1.0).abs() < 1e-9);
        assert_eq!(metabolism_category(mid), MetabolismCategory::Average);
        assert_eq!(metabolism_category(0.90), MetabolismCategory::Slower);
        assert_eq!(metabolism_category(1.10), MetabolismCategory::Faster);
    }

    #[test]
    fn test_baseline_heart_rate_clamped() {
        let rate = baseline_resting_heart_rate(35.0, 22.0, BiologicalSex::Other, 1.0);
        assert!((rate - 70.0).abs() < 1e-9);

        assert_eq!(
            baseline_resting_heart_rate(100.0, 45.0, BiologicalSex::Female, 0.80),
            95.0
        );
        assert_eq!(
            baseline_resting_heart_rate(18.0, 12.0, BiologicalSex::Male, 1.25),
            52.0
        );
    }

    #[test]
    fn test_chemistry_multiplier_ranges() {
        // Reference brand: 1.0mg nicotine / 12mg tar
        let reference = brand_chemistry_multiplier(1.0, 12.0);
        assert!(reference > 0.86 && reference < 1.20);

        // Heaviest yield saturates both normalizations
        assert!((brand_chemistry_multiplier(2.0, 25.0) - 1.20).abs() < 1e-9);
        // Lightest yield bottoms out
        assert!((brand_chemistry_multiplier(0.1, 2.0) - 0.86).abs() < 1e-9);
    }

    #[test]
    fn test_effective_pack_years_scales() {
        let base = 10.0;
        let heavy = effective_pack_years(base, 1.2, 16.0);
        let light = effective_pack_years(base, 0.6, 7.0);
        assert!(heavy > base);
        assert!(light < base);
    }
}
