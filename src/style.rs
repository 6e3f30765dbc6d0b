use crate::error::SurveyPrintError;
use crate::types::{Margins, Size};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

const BASE_CSS: &str = r#"
html { font-family: "Helvetica Neue", Arial, sans-serif; font-size: 10pt; color: #1b1f24; }
body { margin: 0; }
h1 { font-size: 20pt; margin: 0 0 6pt 0; }
h2 { font-size: 13pt; margin: 14pt 0 6pt 0; }
h3 { font-size: 11pt; margin: 8pt 0 4pt 0; }
.break-before-page { break-before: page; page-break-before: always; }
.break-after-page { break-after: page; page-break-after: always; }
.avoid-break { break-inside: avoid; page-break-inside: avoid; }
.vessel-name { font-size: 14pt; font-weight: bold; margin: 0 0 8pt 0; }
.fields { display: grid; grid-template-columns: repeat(3, 1fr); gap: 4pt 12pt; margin: 0; }
.fields dt { font-weight: bold; font-size: 8pt; text-transform: uppercase; color: #5a6470; }
.fields dd { margin: 0 0 4pt 0; }
.kpis { display: flex; gap: 10pt; }
.kpi { flex: 1; border: 1pt solid #c7ced6; border-radius: 4pt; padding: 6pt; text-align: center; }
.kpi-value { font-size: 18pt; font-weight: bold; }
.kpi-label { font-size: 8pt; color: #5a6470; }
table { width: 100%; border-collapse: collapse; }
th, td { border: 0.5pt solid #c7ced6; padding: 3pt 4pt; text-align: left; vertical-align: top; }
th { background: #eef1f4; }
tr { break-inside: avoid; page-break-inside: avoid; }
.placeholder { color: #7a848f; font-style: italic; }
.photo-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 10pt; }
.photo-card { border: 0.5pt solid #c7ced6; padding: 6pt; }
.photo-card img { width: 100%; max-height: 220pt; object-fit: contain; }
.photo-card img.hide-on-error:not([src]) { display: none; }
.photo-caption { font-size: 8.5pt; }
.badge { display: inline-block; padding: 1pt 4pt; border-radius: 3pt; font-size: 8pt; color: #fff; background: #5a6470; }
.badge.cond-fire { background: #c0392b; }
.badge.cond-trip { background: #d68910; }
.badge.cond-rust { background: #8e5b3a; }
.badge.cond-attention { background: #b7950b; }
.badge.cond-none { background: #1e8449; }
.page-of { font-size: 8pt; color: #7a848f; }
"#;

/// `@page` rule for the configured sheet.
pub fn page_rule(size: Size, margins: Margins) -> String {
    format!(
        "@page {{ size: {} {}; margin: {} {} {} {}; }}",
        size.width, size.height, margins.top, margins.right, margins.bottom, margins.left
    )
}

/// Page rule, base rules, then caller CSS; parsed and minified so a bad
/// override fails at build time rather than in the print engine.
pub fn compile_stylesheet(
    size: Size,
    margins: Margins,
    extra_css: Option<&str>,
) -> Result<String, SurveyPrintError> {
    let mut source = page_rule(size, margins);
    source.push('\n');
    source.push_str(BASE_CSS);
    if let Some(extra) = extra_css.map(str::trim).filter(|css| !css.is_empty()) {
        source.push('\n');
        source.push_str(extra);
    }
    minify_css(&source)
}

pub fn minify_css(source: &str) -> Result<String, SurveyPrintError> {
    let sheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|err| SurveyPrintError::Stylesheet(err.to_string()))?;
    let printed = sheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|err| SurveyPrintError::Stylesheet(err.to_string()))?;
    Ok(printed.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_rule_uses_points() {
        let rule = page_rule(Size::letter(), Margins::all(36.0));
        assert_eq!(rule, "@page { size: 612pt 792pt; margin: 36pt 36pt 36pt 36pt; }");
    }

    #[test]
    fn compiled_sheet_is_minified_and_keeps_break_rules() {
        let css = compile_stylesheet(Size::a4(), Margins::all(36.0), None).expect("base css");
        assert!(css.starts_with("@page"));
        assert!(css.contains("break-inside:avoid"));
        assert!(css.contains(".break-before-page"));
        assert!(!css.contains('\n'));
    }

    #[test]
    fn extra_css_is_appended() {
        let css = compile_stylesheet(
            Size::a4(),
            Margins::all(36.0),
            Some(".vessel-name { color: red; }"),
        )
        .expect("css with override");
        assert!(css.contains("color:red"));
    }

    #[test]
    fn broken_extra_css_is_rejected() {
        let err = compile_stylesheet(Size::a4(), Margins::all(36.0), Some("..broken { color: red; }"));
        assert!(matches!(err, Err(SurveyPrintError::Stylesheet(_))));
    }
}
