use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use lung_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "smokefree")]
#[command(about = "Smoke-free lung recovery tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's recovery snapshot (default)
    Status,

    /// Show the projected snapshot at a future smoke-free day
    Preview {
        /// Smoke-free day to evaluate
        #[arg(long)]
        day: i64,
    },

    /// Update the smoking profile
    Set {
        /// Quit date (YYYY-MM-DD)
        #[arg(long)]
        quit_date: Option<String>,

        /// Smoking start date (YYYY-MM-DD); switches to exact-dates mode
        #[arg(long)]
        start_date: Option<String>,

        /// Approximate years smoked; switches to approx-years mode
        #[arg(long)]
        years: Option<f64>,

        /// Consumption unit (cigarettes, packs)
        #[arg(long)]
        unit: Option<String>,

        /// Consumption quantity per interval
        #[arg(long)]
        quantity: Option<f64>,

        /// Consumption interval unit (days, weeks)
        #[arg(long)]
        interval_unit: Option<String>,

        /// Consumption interval count
        #[arg(long)]
        interval_count: Option<f64>,

        /// Cigarette brand id (see `smokefree brands`)
        #[arg(long)]
        brand: Option<String>,

        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,

        /// Biological sex (female, male, other)
        #[arg(long)]
        sex: Option<String>,

        /// Body weight
        #[arg(long)]
        weight: Option<f64>,

        /// Weight unit (kg, lb)
        #[arg(long)]
        weight_unit: Option<String>,

        /// Height
        #[arg(long)]
        height: Option<f64>,

        /// Height unit (cm, in)
        #[arg(long)]
        height_unit: Option<String>,
    },

    /// Show milestone badges and which are earned
    Badges,

    /// List the cigarette brand reference catalog
    Brands,

    /// Export the day-by-day recovery timeline to CSV
    Export {
        /// Output CSV path (defaults to timeline.csv in the data directory)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Sample every N days (final day is always included)
        #[arg(long)]
        step: Option<i64>,
    },

    /// Ask a question about lung anatomy and your recovery
    Ask {
        /// The question to answer
        question: String,

        /// Scope the answer to one lung part
        /// (trachea, bronchi, alveoli, left-lung, right-lung, pleura)
        #[arg(long)]
        part: Option<String>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    lung_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let state_path = data_dir.join("state.json");
    let now = chrono::Local::now().naive_local();

    match cli.command {
        Some(Commands::Status) | None => cmd_status(&state_path, now),
        Some(Commands::Preview { day }) => cmd_preview(&state_path, now, day),
        Some(Commands::Set {
            quit_date,
            start_date,
            years,
            unit,
            quantity,
            interval_unit,
            interval_count,
            brand,
            dob,
            sex,
            weight,
            weight_unit,
            height,
            height_unit,
        }) => cmd_set(
            &state_path,
            now,
            SetArgs {
                quit_date,
                start_date,
                years,
                unit,
                quantity,
                interval_unit,
                interval_count,
                brand,
                dob,
                sex,
                weight,
                weight_unit,
                height,
                height_unit,
            },
        ),
        Some(Commands::Badges) => cmd_badges(&state_path, now),
        Some(Commands::Brands) => cmd_brands(),
        Some(Commands::Export { out, step }) => {
            let out = out.unwrap_or_else(|| data_dir.join("timeline.csv"));
            let step = step.unwrap_or(config.export.step_days);
            cmd_export(&state_path, now, &out, step)
        }
        Some(Commands::Ask { question, part }) => cmd_ask(&state_path, now, &question, part),
    }
}

struct SetArgs {
    quit_date: Option<String>,
    start_date: Option<String>,
    years: Option<f64>,
    unit: Option<String>,
    quantity: Option<f64>,
    interval_unit: Option<String>,
    interval_count: Option<f64>,
    brand: Option<String>,
    dob: Option<String>,
    sex: Option<String>,
    weight: Option<f64>,
    weight_unit: Option<String>,
    height: Option<f64>,
    height_unit: Option<String>,
}

/// Load state, compute today's snapshot, and persist newly earned badges.
fn current_state(
    state_path: &std::path::Path,
    now: NaiveDateTime,
) -> Result<(StoredState, RecoveryState)> {
    let mut stored = load_or_default(state_path, now)?;
    let validated = sanitize_inputs(&stored.inputs, now);
    let state = compute_recovery_state(
        &validated,
        lung_core::dates::days_since(validated.quit_date, now),
        now,
        None,
    );

    let unlocked = earned_badge_ids(state.days_since_quit);
    let merged = merge_earned_badge_ids(&stored.earned_badge_ids, &unlocked);
    if merged != stored.earned_badge_ids {
        stored.earned_badge_ids = merged;
    }
    // Persist so a fresh profile and newly unlocked badges survive.
    stored.save(state_path)?;

    Ok((stored, state))
}

fn cmd_status(state_path: &std::path::Path, now: NaiveDateTime) -> Result<()> {
    let (stored, state) = current_state(state_path, now)?;
    display_snapshot(&state);

    println!(
        "  Badges earned: {} of {}",
        stored.earned_badge_ids.len(),
        MILESTONE_BADGES.len()
    );
    println!();

    Ok(())
}

fn cmd_preview(state_path: &std::path::Path, now: NaiveDateTime, day: i64) -> Result<()> {
    let stored = load_or_default(state_path, now)?;
    let validated = sanitize_inputs(&stored.inputs, now);
    let state = compute_recovery_state(&validated, day, now, None);

    display_snapshot(&state);
    if state.is_projected {
        println!("  (projection beyond your current streak)");
        println!();
    }

    Ok(())
}

fn cmd_set(state_path: &std::path::Path, now: NaiveDateTime, args: SetArgs) -> Result<()> {
    let mut stored = load_or_default(state_path, now)?;
    apply_set_args(&mut stored.inputs, args)?;

    let result = validate_inputs(&stored.inputs, now);
    if !result.errors.is_empty() {
        eprintln!("Profile not saved:");
        for (field, message) in &result.errors {
            eprintln!("  {}: {}", field, message);
        }
        std::process::exit(1);
    }

    stored.save(state_path)?;
    println!("✓ Profile saved");

    cmd_status(state_path, now)
}

fn apply_set_args(inputs: &mut Inputs, args: SetArgs) -> Result<()> {
    if let Some(quit_date) = args.quit_date {
        inputs.quit_date_iso = quit_date;
    }
    if let Some(start_date) = args.start_date {
        inputs.smoking_start_date_iso = start_date;
        inputs.smoking_length_mode = SmokingLengthMode::ExactDates;
    }
    if let Some(years) = args.years {
        inputs.approx_smoking_years = Some(years);
        inputs.smoking_length_mode = SmokingLengthMode::ApproxYears;
    }
    if let Some(unit) = args.unit {
        inputs.consumption_unit = match unit.to_lowercase().as_str() {
            "cigarettes" => ConsumptionUnit::Cigarettes,
            "packs" => ConsumptionUnit::Packs,
            other => {
                return Err(Error::Other(format!(
                    "unknown consumption unit '{}' (expected cigarettes or packs)",
                    other
                )))
            }
        };
    }
    if let Some(quantity) = args.quantity {
        inputs.consumption_quantity = Some(quantity);
    }
    if let Some(interval_unit) = args.interval_unit {
        inputs.consumption_interval_unit = match interval_unit.to_lowercase().as_str() {
            "days" => ConsumptionIntervalUnit::Days,
            "weeks" => ConsumptionIntervalUnit::Weeks,
            other => {
                return Err(Error::Other(format!(
                    "unknown interval unit '{}' (expected days or weeks)",
                    other
                )))
            }
        };
    }
    if let Some(interval_count) = args.interval_count {
        inputs.consumption_interval_count = Some(interval_count);
    }
    if let Some(brand) = args.brand {
        inputs.cigarette_brand_id = brand;
    }
    if let Some(dob) = args.dob {
        inputs.dob_iso = dob;
    }
    if let Some(sex) = args.sex {
        inputs.biological_sex = match sex.to_lowercase().as_str() {
            "female" => BiologicalSex::Female,
            "male" => BiologicalSex::Male,
            "other" => BiologicalSex::Other,
            other => {
                return Err(Error::Other(format!(
                    "unknown sex '{}' (expected female, male, or other)",
                    other
                )))
            }
        };
    }
    if let Some(weight) = args.weight {
        inputs.weight_value = Some(weight);
    }
    if let Some(weight_unit) = args.weight_unit {
        inputs.weight_unit = match weight_unit.to_lowercase().as_str() {
            "kg" => WeightUnit::Kg,
            "lb" => WeightUnit::Lb,
            other => {
                return Err(Error::Other(format!(
                    "unknown weight unit '{}' (expected kg or lb)",
                    other
                )))
            }
        };
    }
    if let Some(height) = args.height {
        inputs.height_value = Some(height);
    }
    if let Some(height_unit) = args.height_unit {
        inputs.height_unit = match height_unit.to_lowercase().as_str() {
            "cm" => HeightUnit::Cm,
            "in" => HeightUnit::In,
            other => {
                return Err(Error::Other(format!(
                    "unknown height unit '{}' (expected cm or in)",
                    other
                )))
            }
        };
    }

    Ok(())
}

fn cmd_badges(state_path: &std::path::Path, now: NaiveDateTime) -> Result<()> {
    let (stored, state) = current_state(state_path, now)?;

    println!();
    println!("  {} days smoke-free", state.days_since_quit);
    println!();
    for badge in &MILESTONE_BADGES {
        let marker = if stored.earned_badge_ids.iter().any(|id| id == badge.id) {
            "✓"
        } else {
            " "
        };
        println!("  [{}] {} (day {})", marker, badge.title, badge.day);
        println!("      {}", badge.detail);
    }
    println!();

    Ok(())
}

fn cmd_brands() -> Result<()> {
    println!();
    println!(
        "  {:<28} {:>9} {:>7}  {}",
        "ID", "NICOTINE", "TAR", "NAME"
    );
    for brand in all_brands() {
        println!(
            "  {:<28} {:>7}mg {:>5}mg  {}",
            brand.id, brand.nicotine_mg, brand.tar_mg, brand.name
        );
    }
    println!();

    Ok(())
}

fn cmd_export(
    state_path: &std::path::Path,
    now: NaiveDateTime,
    out: &std::path::Path,
    step: i64,
) -> Result<()> {
    let stored = load_or_default(state_path, now)?;
    let validated = sanitize_inputs(&stored.inputs, now);

    let rows = write_timeline_csv(&validated, out, step)?;

    println!("✓ Exported {} timeline rows", rows);
    println!("  CSV: {}", out.display());

    Ok(())
}

fn cmd_ask(
    state_path: &std::path::Path,
    now: NaiveDateTime,
    question: &str,
    part: Option<String>,
) -> Result<()> {
    let part_id = match part {
        Some(raw) => Some(raw.parse::<LungPartId>().map_err(Error::Other)?),
        None => None,
    };

    let stored = load_or_default(state_path, now)?;
    let validated = sanitize_inputs(&stored.inputs, now);
    let state = compute_recovery_state(
        &validated,
        lung_core::dates::days_since(validated.quit_date, now),
        now,
        None,
    );

    println!("{}", answer_lung_question(question, part_id, &state));

    Ok(())
}

fn percent(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

fn display_snapshot(state: &RecoveryState) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  LUNG RECOVERY, DAY {}", state.preview_days);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Smoke-free streak: {} days", state.days_since_quit);
    println!(
        "  Recovery: {}% (full recovery around day {})",
        percent(state.recovery_percent),
        state.full_recovery_day
    );
    println!();
    println!("  Soot load:           {:>3}%", percent(state.soot_load));
    println!("  Tar burden:          {:>3}%", percent(state.tar_burden));
    println!("  Inflammation:        {:>3}%", percent(state.inflammation));
    println!("  Mucus:               {:>3}%", percent(state.mucus));
    println!("  Cilia function:      {:>3}%", percent(state.cilia_function));
    println!(
        "  Nicotine dependence: {:>3}%",
        percent(state.nicotine_dependence)
    );
    println!(
        "  Dopamine tolerance:  {:>3}%",
        percent(state.dopamine_tolerance)
    );
    println!();
    println!(
        "  Resting heart rate: {:.0} bpm   Respiration: {:.0} /min",
        state.resting_heart_rate, state.respiration_rate
    );
    println!(
        "  Pack-years: {:.1} ({:.1} effective)   Metabolism: {}",
        state.pack_years, state.effective_pack_years, state.metabolism_category
    );
    println!();
}
