//! Local lung anatomy Q&A.
//!
//! A fixed six-part anatomy catalog plus a keyword-intent responder
//! that folds the current recovery snapshot into its answers. Fully
//! offline and deterministic: the same question, part, and snapshot
//! always produce the same answer string.

use crate::types::RecoveryState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The anatomy parts a question can be scoped to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LungPartId {
    Trachea,
    Bronchi,
    Alveoli,
    LeftLung,
    RightLung,
    Pleura,
}

impl fmt::Display for LungPartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self {
            LungPartId::Trachea => "trachea",
            LungPartId::Bronchi => "bronchi",
            LungPartId::Alveoli => "alveoli",
            LungPartId::LeftLung => "left-lung",
            LungPartId::RightLung => "right-lung",
            LungPartId::Pleura => "pleura",
        };
        write!(f, "{}", id)
    }
}

impl FromStr for LungPartId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trachea" => Ok(LungPartId::Trachea),
            "bronchi" => Ok(LungPartId::Bronchi),
            "alveoli" => Ok(LungPartId::Alveoli),
            "left-lung" => Ok(LungPartId::LeftLung),
            "right-lung" => Ok(LungPartId::RightLung),
            "pleura" => Ok(LungPartId::Pleura),
            other => Err(format!(
                "unknown lung part '{}' (expected one of: trachea, bronchi, alveoli, left-lung, right-lung, pleura)",
                other
            )),
        }
    }
}

/// One anatomy catalog entry
#[derive(Clone, Copy, Debug)]
pub struct LungPart {
    pub id: LungPartId,
    pub label: &'static str,
    pub function_text: &'static str,
    pub discomfort_text: &'static str,
    pub why_smokers_feel_it: &'static str,
}

pub const LUNG_PARTS: [LungPart; 6] = [
    LungPart {
        id: LungPartId::Trachea,
        label: "Trachea",
        function_text: "Main airway tube that moves air from mouth/nose to bronchi.",
        discomfort_text: "Irritation here can feel like burning, throat tightness, or dry cough.",
        why_smokers_feel_it:
            "Smoke particulates and hot gases irritate the lining and trigger inflammation.",
    },
    LungPart {
        id: LungPartId::Bronchi,
        label: "Bronchi",
        function_text: "Large airway branches that distribute air into each lung.",
        discomfort_text: "Inflamed bronchi can feel like chest pressure, wheeze, or painful cough.",
        why_smokers_feel_it: "Tar and toxins increase mucus and bronchial wall swelling.",
    },
    LungPart {
        id: LungPartId::Alveoli,
        label: "Alveoli",
        function_text: "Tiny air sacs where oxygen enters blood and carbon dioxide leaves.",
        discomfort_text:
            "Damage can feel like shortness of breath and reduced exercise tolerance.",
        why_smokers_feel_it:
            "Smoke exposure reduces gas-exchange efficiency and can inflame surrounding tissue.",
    },
    LungPart {
        id: LungPartId::LeftLung,
        label: "Left lung tissue",
        function_text:
            "Expands and recoils to move air; contains bronchi, bronchioles, and alveoli.",
        discomfort_text:
            "Localized pain can come from airway irritation or pleural inflammation.",
        why_smokers_feel_it: "Inflammation and mucus burden can make breathing feel uneven.",
    },
    LungPart {
        id: LungPartId::RightLung,
        label: "Right lung tissue",
        function_text:
            "Same respiratory role as left lung with three lobes and large air volume.",
        discomfort_text:
            "Can feel heavy or tight when mucus burden and inflammation are elevated.",
        why_smokers_feel_it: "Tobacco smoke raises oxidative stress and airway reactivity.",
    },
    LungPart {
        id: LungPartId::Pleura,
        label: "Pleura",
        function_text: "Thin membrane around lungs that lets them glide during breathing.",
        discomfort_text: "Pleural irritation often causes sharp pain on deep breath or cough.",
        why_smokers_feel_it:
            "Inflammatory conditions can sensitize pleural tissue and chest wall.",
    },
];

pub fn lung_part_by_id(id: LungPartId) -> &'static LungPart {
    LUNG_PARTS
        .iter()
        .find(|part| part.id == id)
        .unwrap_or(&LUNG_PARTS[0])
}

fn format_percent(value: f64) -> String {
    format!("{}%", (value * 100.0).round() as i64)
}

fn contains_any(prompt: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| prompt.contains(needle))
}

/// Answer a free-form question about lung anatomy and recovery.
///
/// Intent is matched by keyword, in fixed priority order: pain, then
/// function (both require a selected part), then dark/soot, then
/// progress. Unmatched questions fall back to the selected part's
/// summary or to a usage hint.
pub fn answer_lung_question(
    question: &str,
    selected_part_id: Option<LungPartId>,
    state: &RecoveryState,
) -> String {
    let prompt = question.trim().to_lowercase();
    let selected = selected_part_id.map(lung_part_by_id);

    if prompt.is_empty() {
        return match selected {
            Some(part) => format!(
                "{}: {} {}",
                part.label, part.function_text, part.discomfort_text
            ),
            None => {
                "Ask about pain, function, recovery, breathing, or name a lung part first."
                    .to_string()
            }
        };
    }

    let pain_intent = contains_any(&prompt, &["hurt", "pain", "ache", "sore", "tight"]);
    let function_intent = contains_any(&prompt, &["what does", "function", "do", "for", "role"]);
    let dark_intent = contains_any(&prompt, &["dark", "black", "dirty", "soot", "tar"]);
    let progress_intent =
        contains_any(&prompt, &["recover", "healing", "improv", "better", "timeline"]);

    if pain_intent {
        if let Some(part) = selected {
            return format!(
                "{}: {} {} Current inflammation proxy is {}.",
                part.label,
                part.discomfort_text,
                part.why_smokers_feel_it,
                format_percent(state.inflammation)
            );
        }
    }

    if function_intent {
        if let Some(part) = selected {
            return format!(
                "{}: {} Current cilia function proxy is {}.",
                part.label,
                part.function_text,
                format_percent(state.cilia_function)
            );
        }
    }

    if dark_intent {
        return format!(
            "Dark areas represent soot/tar burden in this model. Current soot load is {}; as smoke-free days increase, this layer fades.",
            format_percent(state.soot_load)
        );
    }

    if progress_intent {
        return format!(
            "Today your model recovery is {} of the way to full recovery, with mucus at {} and inflammation at {}.",
            format_percent(state.recovery_percent),
            format_percent(state.mucus),
            format_percent(state.inflammation)
        );
    }

    match selected {
        Some(part) => format!(
            "{}: {} {}",
            part.label, part.function_text, part.discomfort_text
        ),
        None => {
            "Try naming a lung part, then ask: 'Why does this part hurt?' or 'What does this part do?'"
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::compute_recovery_state;
    use crate::model::sanitize_inputs;
    use crate::types::Inputs;
    use chrono::NaiveDate;

    fn snapshot() -> RecoveryState {
        let now = NaiveDate::from_ymd_opt(2026, 2, 26)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let validated = sanitize_inputs(&Inputs::default_at(now), now);
        compute_recovery_state(&validated, 0, now, None)
    }

    #[test]
    fn test_part_id_round_trips_through_str() {
        for part in &LUNG_PARTS {
            let parsed: LungPartId = part.id.to_string().parse().unwrap();
            assert_eq!(parsed, part.id);
        }
        assert!("spleen".parse::<LungPartId>().is_err());
    }

    #[test]
    fn test_pain_intent_uses_selected_part() {
        let state = snapshot();
        let answer = answer_lung_question("why does this hurt?", Some(LungPartId::Bronchi), &state);
        assert!(answer.starts_with("Bronchi:"));
        assert!(answer.contains("inflammation proxy"));
    }

    #[test]
    fn test_dark_intent_needs_no_part() {
        let state = snapshot();
        let answer = answer_lung_question("why are the lungs so dark?", None, &state);
        assert!(answer.contains("soot/tar burden"));
        assert!(answer.contains('%'));
    }

    #[test]
    fn test_progress_intent_reports_recovery() {
        let state = snapshot();
        let answer = answer_lung_question("how is my recovery going?", None, &state);
        assert!(answer.contains("full recovery"));
        assert!(answer.contains("mucus"));
    }

    #[test]
    fn test_empty_question_with_part_gives_summary() {
        let state = snapshot();
        let answer = answer_lung_question("   ", Some(LungPartId::Pleura), &state);
        assert!(answer.starts_with("Pleura:"));
        assert!(answer.contains("glide"));
    }

    #[test]
    fn test_empty_question_without_part_gives_hint() {
        let state = snapshot();
        let answer = answer_lung_question("", None, &state);
        assert!(answer.starts_with("Ask about"));
    }

    #[test]
    fn test_answers_are_deterministic() {
        let state = snapshot();
        let a = answer_lung_question("recovery?", Some(LungPartId::Alveoli), &state);
        let b = answer_lung_question("recovery?", Some(LungPartId::Alveoli), &state);
        assert_eq!(a, b);
    }
}
