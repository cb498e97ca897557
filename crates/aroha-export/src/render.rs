use serde::Serialize;
use tera::{Context, Tera};

use crate::error::ExportError;
use crate::report::HistoryReport;

pub const REPORT_TEMPLATE_NAME: &str = "history_report.md";

/// Markdown subset understood by [`crate::docx::generate_docx`].
pub const REPORT_TEMPLATE: &str = r#"# {{ labels.title }}

{{ labels.exported }}: {{ exported }}

## {{ labels.summary }}

- **{{ labels.total_assessments }}:** {{ summary.count }}
- **{{ labels.average_score }}:** {{ summary.average }} / 27
- **{{ labels.latest_score }}:** {{ summary.latest }} / 27
{% if summary.change %}- **{{ labels.change_from_first }}:** {{ summary.change }} {{ labels.points }}
{% endif %}
> {{ labels.disclaimer }}

## {{ labels.history }}

| # | {{ labels.date }} | {{ labels.score }} | {{ labels.severity }} | {{ labels.answers }} |
|---|---|---|---|---|
{% for row in rows %}| {{ row.number }} | {{ row.date }} | {{ row.total }}/27 | {{ row.severity }} | {{ row.answers }} |
{% endfor %}
{{ labels.footer }}
"#;

/// Render a Tera template against any serializable context.
///
/// The template name decides autoescaping, so `.md` names render verbatim.
pub fn render_template<T: Serialize>(
    template_name: &str,
    template_content: &str,
    data: &T,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(data)?;
    let context = Context::from_value(value)
        .map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render(template_name, &context)?;
    Ok(rendered)
}

pub fn render_report(report: &HistoryReport) -> Result<String, ExportError> {
    render_template(REPORT_TEMPLATE_NAME, REPORT_TEMPLATE, report)
}
