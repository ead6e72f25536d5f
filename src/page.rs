//! Form page rendering
//!
//! Server-side HTML for the single-page detector: two input columns, the
//! analyze button and, after a submission, either the verdict card or the
//! error that prevented one.

use std::fmt::Write;

use crate::features::input::{
    component_field, AMOUNT_FIELD, AMOUNT_MIN, AMOUNT_STEP, COMPONENT_PRECISION,
};
use crate::features::{TransactionInput, COMPONENT_COUNT};
use crate::pipeline::Assessment;

/// What to show under the form
pub enum Outcome<'a> {
    None,
    Verdict(&'a Assessment),
    Error(&'a str),
}

const STYLE: &str = r#"
body { background: #0e1117; color: #fafafa; font-family: sans-serif; margin: 0 auto; max-width: 1100px; padding: 2rem; }
.main-title { font-size: 3rem; font-weight: 700; text-align: center; color: #FF4B4B; margin-bottom: 0.5rem; }
.subtitle { text-align: center; font-size: 1.2rem; color: #aaaaaa; margin-bottom: 3rem; }
.glass-container { background: rgba(255, 255, 255, 0.05); border-radius: 16px; border: 1px solid rgba(255, 255, 255, 0.1); padding: 2rem; margin: 1.5rem 0; }
.section-header { font-size: 1.3rem; color: #FF6B6B; font-weight: 600; border-bottom: 1px solid #333; padding-bottom: 0.5rem; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; }
.columns input { display: block; width: 100%; margin: 0.3rem 0; padding: 0.4rem; background: #262730; color: #fafafa; border: 1px solid #444; border-radius: 6px; }
button { background: linear-gradient(90deg, #FF4B4B, #FF6B6B); color: white; border: none; border-radius: 12px; padding: 0.8rem 2rem; font-size: 1.1rem; font-weight: 600; width: 100%; margin-top: 1.5rem; }
.result-card { text-align: center; font-size: 1.4rem; border: 2px solid; }
.fraud-card { background: rgba(255, 0, 0, 0.1); border-color: #FF4444; }
.safe-card { background: rgba(0, 255, 0, 0.1); border-color: #44FF44; }
.error-card { background: rgba(255, 165, 0, 0.1); border-color: #FFA500; }
.prob-text { font-size: 3rem; font-weight: bold; margin: 1rem 0; }
progress { width: 100%; }
.steppers { display: flex; gap: 0.5rem; }
.steppers button { margin-top: 0.3rem; padding: 0.3rem 1rem; font-size: 0.9rem; }
footer { text-align: center; margin-top: 4rem; color: #666; }
"#;

/// Escape text for inclusion in HTML
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn component_input(html: &mut String, input: &TransactionInput, index: usize) {
    let _ = write!(
        html,
        r#"<input type="number" name="{name}" aria-label="{label}" title="{label}" value="{value:.prec$}" step="any" required>"#,
        name = component_field(index),
        label = TransactionInput::component_label(index),
        value = input.component(index),
        prec = COMPONENT_PRECISION,
    );
}

/// Inline handler that moves the amount by `delta` without going below the minimum
fn amount_stepper(delta: f64) -> String {
    format!(
        "var a = document.getElementById('amount'); \
         a.value = Math.max({AMOUNT_MIN}, (parseFloat(a.value) || 0) + ({delta})).toFixed(2);"
    )
}

fn render_outcome(html: &mut String, outcome: Outcome<'_>) {
    match outcome {
        Outcome::None => {}
        Outcome::Verdict(assessment) => {
            let verdict = &assessment.verdict;
            let (card, color, icon) = if verdict.is_fraud() {
                ("fraud-card", "#FF4444", "🚨")
            } else {
                ("safe-card", "#44FF44", "✅")
            };
            let _ = write!(
                html,
                r#"<div class="glass-container result-card {card}" id="verdict">
<h2>{icon} {headline}</h2>
<div class="prob-text" style="color: {color};">{percent}</div>
<p><strong>{risk}</strong> — {recommendation}</p>
</div>
<progress value="{probability:.4}" max="1"></progress>"#,
                headline = verdict.headline(),
                percent = verdict.probability_percent(),
                risk = verdict.risk.as_str(),
                recommendation = verdict.recommendation(),
                probability = verdict.probability,
            );
        }
        Outcome::Error(message) => {
            let _ = write!(
                html,
                r#"<div class="glass-container result-card error-card" id="error"><h2>⚠️ No verdict</h2><p>{}</p></div>"#,
                escape_html(message),
            );
        }
    }
}

/// Render the full page
pub fn render(input: &TransactionInput, model_name: &str, outcome: Outcome<'_>) -> String {
    let mut html = String::with_capacity(16 * 1024);

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Credit Card Fraud Detector</title>
<style>{STYLE}</style>
</head>
<body>
<h1 class="main-title">Credit Card Fraud Detector</h1>
<p class="subtitle">Real-time fraud detection using {model}<br><strong>Educational Project • Anonymized Features</strong></p>
<form method="post" action="/analyze">
<div class="glass-container">
<div class="section-header">🔍 Transaction Features (Anonymized PCA Components)</div>
<div class="columns">
<div><strong>V1 to V14</strong>"#,
        model = escape_html(model_name),
    );

    let half = COMPONENT_COUNT / 2;
    for index in 0..half {
        component_input(&mut html, input, index);
    }
    html.push_str("</div>\n<div><strong>V15 to V28 + Amount</strong>");
    for index in half..COMPONENT_COUNT {
        component_input(&mut html, input, index);
    }

    let _ = write!(
        html,
        r#"<label for="amount">Transaction Amount ($)</label>
<input type="number" id="amount" name="{AMOUNT_FIELD}" value="{amount:.2}" min="{AMOUNT_MIN}" step="any" required>
<div class="steppers">
<button type="button" onclick="{decrease}">− {AMOUNT_STEP}</button>
<button type="button" onclick="{increase}">+ {AMOUNT_STEP}</button>
</div>
</div>
</div>
</div>
<button type="submit">🔍 Analyze Transaction Risk</button>
</form>
"#,
        amount = input.amount,
        decrease = amount_stepper(-AMOUNT_STEP),
        increase = amount_stepper(AMOUNT_STEP),
    );

    render_outcome(&mut html, outcome);

    html.push_str(
        r#"
<footer><hr style="border-color: #333;">Built with Rust • Dataset: Credit Card Fraud 2023<br><small>For educational purposes only</small></footer>
</body>
</html>
"#,
    );

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::Verdict;

    #[test]
    fn test_form_has_all_fields_with_defaults() {
        let html = render(&TransactionInput::default(), "Random Forest", Outcome::None);

        for i in 1..=28 {
            assert!(html.contains(&format!(r#"name="v{i}""#)), "missing v{i}");
        }
        assert!(html.contains(r#"value="0.0000""#));
        assert!(html.contains(r#"name="amount" value="100.00" min="0" step="any""#));
        assert!(html.contains("Analyze Transaction Risk"));
        assert!(!html.contains(r#"id="verdict""#));
    }

    #[test]
    fn test_verdict_card() {
        let assessment = Assessment {
            verdict: Verdict::new(1, 0.91),
            model: "Random Forest".to_string(),
            inference_time_us: 12,
        };
        let html = render(&TransactionInput::default(), "Random Forest", Outcome::Verdict(&assessment));

        assert!(html.contains("fraud-card"));
        assert!(html.contains("Fraudulent Transaction Detected"));
        assert!(html.contains("91.0%"));
        assert!(html.contains("Recommend blocking this transaction"));
        assert!(html.contains(r#"<progress value="0.9100" max="1">"#));
    }

    #[test]
    fn test_error_is_escaped() {
        let html = render(
            &TransactionInput::default(),
            "Random Forest",
            Outcome::Error("v1 must be a number, got \"<script>\""),
        );
        assert!(html.contains("No verdict"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_submitted_values_are_kept() {
        let mut input = TransactionInput::default();
        input.components[13] = -5.25;
        input.amount = 0.0;
        let html = render(&input, "m", Outcome::None);
        assert!(html.contains(r#"name="v14" aria-label="V14" title="V14" value="-5.2500""#));
        assert!(html.contains(r#"value="0.00""#));
    }

    #[test]
    fn test_inputs_accept_arbitrary_precision() {
        let html = render(&TransactionInput::default(), "m", Outcome::None);

        // A browser would refuse 149.62 or -1.359807134 against a fixed step
        assert!(!html.contains(r#"step="10""#));
        assert!(!html.contains(r#"step="0.0001""#));
        assert_eq!(html.matches(r#"step="any""#).count(), COMPONENT_COUNT + 1);

        assert!(html.contains("+ 10</button>"));
        assert!(html.contains("Math.max(0, (parseFloat(a.value) || 0) + (-10))"));
    }
}
