//! HTML rendering for the prediction form (self-contained page, no templates).

use crate::config;
use crate::models::{CancerType, FieldError, Gender, PatientForm, Stage, Treatment};
use crate::predictor::Prediction;

/// Everything the form page can show.
#[derive(Debug, Default)]
pub struct FormView<'a> {
    /// Values to pre-fill; empty on first load.
    pub form: Option<&'a PatientForm>,
    pub prediction: Option<&'a Prediction>,
    pub errors: &'a [FieldError],
    /// Page-level message (e.g. internal failure).
    pub notice: Option<&'a str>,
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn render_select(name: &str, label: &str, options: &[&str], selected: &str) -> String {
    let mut html = format!(
        r#"<label for="{name}">{label}</label>
    <select id="{name}" name="{name}">"#
    );
    for option in options {
        let attr = if *option == selected { " selected" } else { "" };
        let value = escape_html(option);
        html.push_str(&format!(r#"<option value="{value}"{attr}>{value}</option>"#));
    }
    html.push_str("</select>");
    html
}

fn render_number(name: &str, label: &str, value: &str, step: &str) -> String {
    format!(
        r#"<label for="{name}">{label}</label>
    <input id="{name}" name="{name}" type="number" step="{step}" min="0" value="{value}" required>"#,
        value = escape_html(value),
    )
}

fn render_errors(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| {
            format!(
                "<li><strong>{}</strong> {}</li>",
                escape_html(e.field),
                escape_html(&e.message)
            )
        })
        .collect();
    format!(r#"<ul class="errors">{items}</ul>"#)
}

fn render_result(prediction: Option<&Prediction>) -> String {
    let Some(prediction) = prediction else {
        return String::new();
    };
    let warnings: String = prediction
        .warnings
        .iter()
        .map(|w| format!(r#"<p class="warning">{}</p>"#, escape_html(w)))
        .collect();
    format!(
        r#"<div class="result">Predicted survival: <strong>{months:.1}</strong> months</div>{warnings}"#,
        months = prediction.months,
    )
}

/// Render the full form page.
pub fn render_form_page(view: &FormView<'_>) -> String {
    let empty = PatientForm::default();
    let form = view.form.unwrap_or(&empty);

    let notice = view
        .notice
        .map(|n| format!(r#"<p class="notice">{}</p>"#, escape_html(n)))
        .unwrap_or_default();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{app_name}</title>
<style>
*,*::before,*::after{{box-sizing:border-box}}
body{{margin:0;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:#fafaf9;color:#1c1917;display:flex;align-items:center;justify-content:center;min-height:100vh;padding:24px}}
.card{{background:#fff;border-radius:16px;box-shadow:0 4px 24px rgba(0,0,0,.08);max-width:440px;width:100%;padding:32px}}
h1{{font-size:1.4rem;margin:0 0 20px;text-align:center}}
label{{display:block;font-size:.85rem;font-weight:600;margin:12px 0 4px}}
input,select{{width:100%;padding:10px;border:1px solid #d6d3d1;border-radius:8px;font-size:1rem}}
button{{display:block;width:100%;margin-top:20px;padding:14px;border:none;border-radius:12px;font-size:1rem;font-weight:600;background:#2DD4BF;color:#fff;cursor:pointer}}
.result{{margin-top:20px;padding:16px;border-radius:12px;background:#f0fdf4;border:1px solid #bbf7d0;text-align:center}}
.errors{{margin:0 0 12px;padding:12px 12px 12px 28px;border-radius:8px;background:#fef2f2;border:1px solid #fecaca;color:#991b1b;font-size:.85rem}}
.warning,.notice{{font-size:.85rem;color:#92400e;background:#fffbeb;border-radius:8px;padding:8px 12px}}
.version{{color:#a8a29e;font-size:.75rem;text-align:center;margin-top:16px}}
</style>
</head>
<body>
<div class="card">
  <h1>Cancer Survival Prediction</h1>
  {notice}
  {errors}
  <form method="post" action="/">
    {age}
    {gender}
    {cancer_type}
    {tumor_size}
    {stage}
    {treatment}
    <button type="submit">Predict</button>
  </form>
  {result}
  <p class="version">v{version}</p>
</div>
</body>
</html>"##,
        app_name = config::APP_NAME,
        version = config::APP_VERSION,
        notice = notice,
        errors = render_errors(view.errors),
        age = render_number("Age", "Age (years)", &form.age, "any"),
        gender = render_select("Gender", "Gender", &Gender::labels(), form.gender.trim()),
        cancer_type = render_select(
            "Cancer_Type",
            "Cancer type",
            &CancerType::labels(),
            form.cancer_type.trim()
        ),
        tumor_size = render_number("Tumor_Size", "Tumor size (cm)", &form.tumor_size, "0.1"),
        stage = render_select("Stage", "Stage", &Stage::labels(), form.stage.trim()),
        treatment = render_select(
            "Treatment",
            "Treatment",
            &Treatment::labels(),
            form.treatment.trim()
        ),
        result = render_result(view.prediction),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_form_lists_every_option() {
        let html = render_form_page(&FormView::default());
        for label in Gender::labels()
            .into_iter()
            .chain(Stage::labels())
            .chain(CancerType::labels())
            .chain(Treatment::labels())
        {
            assert!(
                html.contains(&format!(r#"<option value="{label}">"#)),
                "missing option {label}"
            );
        }
        assert!(!html.contains("Predicted survival"));
        assert!(!html.contains(" selected"));
    }

    #[test]
    fn submitted_values_are_selected() {
        let form = PatientForm {
            age: "55".into(),
            gender: "F".into(),
            cancer_type: "Breast".into(),
            tumor_size: "3.2".into(),
            stage: "II".into(),
            treatment: "Hormone Therapy".into(),
        };
        let html = render_form_page(&FormView {
            form: Some(&form),
            ..FormView::default()
        });
        assert!(html.contains(r#"<option value="F" selected>"#));
        assert!(html.contains(r#"<option value="Breast" selected>"#));
        assert!(html.contains(r#"<option value="II" selected>"#));
        assert!(html.contains(r#"<option value="Hormone Therapy" selected>"#));
        assert!(html.contains(r#"value="3.2""#));
    }

    #[test]
    fn prediction_and_warnings_rendered() {
        let prediction = Prediction {
            months: 56.0,
            warnings: vec!["'Cancer_Type_Prostate' is not a model input".into()],
        };
        let html = render_form_page(&FormView {
            prediction: Some(&prediction),
            ..FormView::default()
        });
        assert!(html.contains("Predicted survival: <strong>56.0</strong> months"));
        assert!(html.contains("&#39;Cancer_Type_Prostate&#39; is not a model input"));
    }

    #[test]
    fn submitted_values_are_escaped() {
        let form = PatientForm {
            age: r#""><script>alert(1)</script>"#.into(),
            ..PatientForm::default()
        };
        let errors = vec![FieldError::new("Age", "must be a number, got '<b>'")];
        let html = render_form_page(&FormView {
            form: Some(&form),
            errors: &errors,
            ..FormView::default()
        });
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("got &#39;&lt;b&gt;&#39;"));
    }

    #[test]
    fn number_inputs_accept_fractions() {
        let html = render_form_page(&FormView::default());
        assert!(html.contains(r#"id="Age" name="Age" type="number" step="any""#));
        assert!(html.contains(r#"id="Tumor_Size" name="Tumor_Size" type="number" step="0.1""#));
        assert!(!html.contains(r#"step="1""#));
    }

    #[test]
    fn notice_rendered() {
        let html = render_form_page(&FormView {
            notice: Some("The prediction could not be computed."),
            ..FormView::default()
        });
        assert!(html.contains(r#"<p class="notice">The prediction could not be computed.</p>"#));
    }
}
