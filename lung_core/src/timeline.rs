//! Recovery timeline export.
//!
//! Writes the simulated day-by-day trajectory for one profile to CSV,
//! from day 0 through the full-recovery day. The export is a pure
//! function of the validated inputs, so re-running it for the same
//! profile produces the same rows.

use crate::curve::{cardio_rates, estimate_full_recovery_day, CurveContext, Subscores};
use crate::types::ValidatedInputs;
use crate::{Error, Result};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct TimelineRow {
    day: i64,
    recovery_percent: f64,
    overall_dirtiness: f64,
    soot_load: f64,
    inflammation: f64,
    mucus: f64,
    cilia_function: f64,
    tar_burden: f64,
    nicotine_dependence: f64,
    dopamine_tolerance: f64,
    resting_heart_rate: f64,
    respiration_rate: f64,
}

impl TimelineRow {
    fn new(day: i64, validated: &ValidatedInputs, scores: &Subscores) -> Self {
        let (resting_heart_rate, respiration_rate) = cardio_rates(validated, scores);
        TimelineRow {
            day,
            recovery_percent: scores.recovery_percent,
            overall_dirtiness: scores.overall_dirtiness,
            soot_load: scores.soot_load,
            inflammation: scores.inflammation,
            mucus: scores.mucus,
            cilia_function: scores.cilia_function,
            tar_burden: scores.tar_burden,
            nicotine_dependence: scores.nicotine_dependence,
            dopamine_tolerance: scores.dopamine_tolerance,
            resting_heart_rate,
            respiration_rate,
        }
    }
}

/// Write the recovery timeline to `csv_path`, sampling every `step_days`
/// from day 0 to the full-recovery day. The final day is always written
/// even when the step does not land on it. Returns the row count.
pub fn write_timeline_csv(
    validated: &ValidatedInputs,
    csv_path: &Path,
    step_days: i64,
) -> Result<usize> {
    if step_days < 1 {
        return Err(Error::Other(format!(
            "timeline step must be at least 1 day, got {}",
            step_days
        )));
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let full_recovery_day = estimate_full_recovery_day(validated);
    let context = CurveContext::new(validated);

    let file = File::create(csv_path)?;
    let mut writer = csv::Writer::from_writer(file);

    let mut rows = 0;
    let mut day = 0;
    while day <= full_recovery_day {
        writer.serialize(TimelineRow::new(day, validated, &context.evaluate(day)))?;
        rows += 1;
        day += step_days;
    }
    // Always include the final crossing day itself.
    if day - step_days != full_recovery_day {
        writer.serialize(TimelineRow::new(
            full_recovery_day,
            validated,
            &context.evaluate(full_recovery_day),
        ))?;
        rows += 1;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} timeline rows to {:?}", rows, csv_path);

    Ok(rows)
}
