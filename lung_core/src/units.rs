//! Pure numeric conversions between alternate measurement units.
//!
//! Conversions are symmetric: `unit -> other -> unit` returns the
//! original value within rounding tolerance, and converting a
//! consumption pattern between units or intervals preserves the implied
//! cigarettes/day rate.

use crate::types::{ConsumptionIntervalUnit, ConsumptionUnit, HeightUnit, WeightUnit};

pub const CIGS_PER_PACK: f64 = 20.0;
pub const DAYS_PER_WEEK: f64 = 7.0;
const LB_PER_KG: f64 = 2.2046226218;
const CM_PER_IN: f64 = 2.54;

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Convert an optional form value, keeping the empty marker empty and
/// rounding the converted result. Never produces NaN or a spurious zero
/// for a blank field.
pub fn convert_optional<F>(value: Option<f64>, convert: F, decimals: u32) -> Option<f64>
where
    F: FnOnce(f64) -> f64,
{
    match value {
        Some(v) if v.is_finite() => Some(round_to(convert(v), decimals)),
        _ => None,
    }
}

/// kg <-> lb. Identity when units match.
pub fn convert_weight(value: f64, from: WeightUnit, to: WeightUnit) -> f64 {
    if from == to {
        return value;
    }
    match from {
        WeightUnit::Kg => value * LB_PER_KG,
        WeightUnit::Lb => value / LB_PER_KG,
    }
}

/// cm <-> in. Identity when units match.
pub fn convert_height(value: f64, from: HeightUnit, to: HeightUnit) -> f64 {
    if from == to {
        return value;
    }
    match from {
        HeightUnit::Cm => value / CM_PER_IN,
        HeightUnit::In => value * CM_PER_IN,
    }
}

/// cigarettes <-> packs of 20, applied to a consumption quantity.
pub fn convert_consumption_quantity_for_unit(
    quantity: f64,
    from: ConsumptionUnit,
    to: ConsumptionUnit,
) -> f64 {
    if from == to {
        return quantity;
    }
    match from {
        ConsumptionUnit::Cigarettes => quantity / CIGS_PER_PACK,
        ConsumptionUnit::Packs => quantity * CIGS_PER_PACK,
    }
}

/// days <-> weeks, applied to the quantity so the implied daily rate is
/// unchanged (a per-day quantity becomes 7x when expressed per week).
pub fn convert_consumption_quantity_for_interval(
    quantity: f64,
    from: ConsumptionIntervalUnit,
    to: ConsumptionIntervalUnit,
) -> f64 {
    if from == to {
        return quantity;
    }
    match from {
        ConsumptionIntervalUnit::Days => quantity * DAYS_PER_WEEK,
        ConsumptionIntervalUnit::Weeks => quantity / DAYS_PER_WEEK,
    }
}

/// Split total inches into whole feet plus remaining inches (0-11).
pub fn inches_to_feet_inches(total_inches: f64) -> (u32, u32) {
    let rounded = total_inches.round().max(0.0) as u32;
    (rounded / 12, rounded % 12)
}

/// Recombine whole feet and inches into total inches. Round-trips with
/// [`inches_to_feet_inches`] for any integer total.
pub fn feet_inches_to_total_inches(feet: u32, inches: u32) -> u32 {
    feet * 12 + inches
}
