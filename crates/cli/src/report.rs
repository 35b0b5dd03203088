//! Plain-text rendering of an analysis for terminal output.

use symptom_core::{Likelihood, NormalizationTier, ProbableCondition, ResultEnvelope};

pub fn render(envelope: &ResultEnvelope) -> String {
    let patient = &envelope.patient;
    let mut lines = vec![
        format!(
            "Symptom analysis for {} ({}, {})",
            patient.display_name(),
            patient.age,
            patient.gender
        ),
        format!(
            "Symptoms: {} ({}, {})",
            patient.symptoms, patient.duration, patient.severity
        ),
    ];
    if envelope.tier == NormalizationTier::Fallback {
        lines.push("Note: the model reply could not be read; showing generic advice.".into());
    }
    lines.push(String::new());

    let report = match envelope.analysis.report() {
        Ok(report) => report,
        Err(mismatch) => {
            lines.push(format!("Unrecognised analysis format ({mismatch}):"));
            lines.push(
                serde_json::to_string_pretty(envelope.analysis.as_value()).unwrap_or_default(),
            );
            return finish(lines);
        }
    };

    if !report.probable_conditions.is_empty() {
        lines.push("Probable conditions:".into());
        for (i, condition) in report.probable_conditions.iter().enumerate() {
            lines.push(format!(
                "  {}. {} [{}]",
                i + 1,
                condition.name,
                likelihood_label(condition)
            ));
            if !condition.description.is_empty() {
                lines.push(format!("     {}", condition.description));
            }
            if !condition.reasoning.is_empty() {
                lines.push(format!("     Why: {}", condition.reasoning));
            }
        }
        lines.push(String::new());
    }

    section(&mut lines, "Recommendations", &report.recommendations);
    section(&mut lines, "Warning symptoms (seek urgent care)", &report.warning_symptoms);
    section(&mut lines, "Next steps", &report.next_steps);

    if !report.disclaimer.is_empty() {
        lines.push(report.disclaimer);
    }
    finish(lines)
}

/// Canonical level name, or the model's own wording when it is not one of the levels.
fn likelihood_label(condition: &ProbableCondition) -> &str {
    match condition.likelihood_level() {
        Likelihood::High => "High",
        Likelihood::Medium => "Medium",
        Likelihood::Low => "Low",
        Likelihood::Unknown if condition.likelihood.trim().is_empty() => "Unknown",
        Likelihood::Unknown => condition.likelihood.trim(),
    }
}

fn section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(format!("{title}:"));
    lines.extend(items.iter().map(|item| format!("  - {item}")));
    lines.push(String::new());
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
