// Presentation snapshot of a session. JS renders this as-is; no logic on the page side.

use serde::Serialize;

use crate::schema::{self, ShapeSchema};
use crate::session::Session;
use crate::types::*;

/// Everything the page needs to draw the current state.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub selected_shape: ShapeKind,
    pub icon: &'static str,
    pub fields: Vec<FieldView>,
    pub result: Option<ResultView>,
    pub history: Vec<HistoryEntryView>,
    pub insight: InsightView,
}

/// One input box.
#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: f64,
    /// Text for the input box; empty while the value is zero so the
    /// placeholder shows.
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub area: f64,
    pub perimeter: f64,
    pub area_text: String,
    pub perimeter_text: String,
}

/// Compact history line, e.g. "A: 16.0" / "P: 16.0".
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntryView {
    pub id: HistoryId,
    pub shape: ShapeKind,
    pub area_text: String,
    pub perimeter_text: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightView {
    /// Show the insight card at all.
    pub visible: bool,
    pub loading: bool,
    pub text: String,
    pub paragraphs: Vec<String>,
}

impl SessionView {
    pub fn from_session(session: &Session) -> Self {
        let shape_schema = schema::schema_for(session.selected_shape());
        let inputs = session.inputs();

        let fields = shape_schema
            .fields
            .iter()
            .map(|field| {
                let value = inputs.get(field.key);
                FieldView {
                    key: field.key,
                    label: field.label,
                    placeholder: field.placeholder,
                    value,
                    text: input_text(value),
                }
            })
            .collect();

        let result = session.last_result().map(|r| ResultView {
            area: r.area,
            perimeter: r.perimeter,
            area_text: fixed(r.area, 2),
            perimeter_text: fixed(r.perimeter, 2),
        });

        let history = session
            .history()
            .iter()
            .map(|record| HistoryEntryView {
                id: record.id.clone(),
                shape: record.shape,
                area_text: format!("A: {}", fixed(record.area, 1)),
                perimeter_text: format!("P: {}", fixed(record.perimeter, 1)),
                timestamp: record.timestamp,
            })
            .collect();

        let text = session.insight_text().to_string();
        let insight = InsightView {
            visible: session.insight_loading() || !text.is_empty(),
            loading: session.insight_loading(),
            paragraphs: if text.is_empty() {
                Vec::new()
            } else {
                text.split('\n').map(str::to_string).collect()
            },
            text,
        };

        SessionView {
            selected_shape: session.selected_shape(),
            icon: shape_schema.icon,
            fields,
            result,
            history,
            insight,
        }
    }
}

/// The shape selector catalog.
pub fn shape_catalog() -> &'static [ShapeSchema] {
    schema::all_schemas()
}

/// Fixed-decimal rendering with `Number.prototype.toFixed` rules: ties
/// round away from zero, and magnitudes of 1e21 and up fall back to
/// [`number_text`].
pub fn fixed(value: f64, places: usize) -> String {
    if value.is_nan() || value.abs() >= 1e21 {
        return number_text(value);
    }

    // Exact decimal expansion; an f64 never needs more than 1074 fraction digits.
    let exact = format!("{:.1100}", value.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut digits: Vec<u8> = whole.bytes().chain(fraction.bytes().take(places)).collect();
    if fraction.as_bytes().get(places).is_some_and(|&d| d >= b'5') {
        round_up(&mut digits);
    }

    let split = digits.len() - places;
    let mut out = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(&String::from_utf8_lossy(&digits[..split]));
    if places > 0 {
        out.push('.');
        out.push_str(&String::from_utf8_lossy(&digits[split..]));
    }
    out
}

fn round_up(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Shortest text for `value` the way JS `String(number)` writes it:
/// exponent form below 1e-6 and from 1e21 up (`1e-7`, `1.5e+21`).
pub fn number_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }
    let text = format!("{:e}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}

fn input_text(value: f64) -> String {
    if value == 0.0 || value.is_nan() {
        String::new()
    } else {
        number_text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_matches_page_formatting() {
        assert_eq!(fixed(16.0, 2), "16.00");
        assert_eq!(fixed(std::f64::consts::PI * 4.0, 2), "12.57");
        assert_eq!(fixed(12.566, 1), "12.6");
        assert_eq!(fixed(-0.0, 2), "0.00");
        assert_eq!(fixed(f64::INFINITY, 2), "Infinity");
        assert_eq!(fixed(f64::NAN, 2), "NaN");
    }

    #[test]
    fn fixed_rounds_ties_up() {
        assert_eq!(fixed(0.25, 1), "0.3");
        assert_eq!(fixed(0.125, 2), "0.13");
        assert_eq!(fixed(2.5, 0), "3");
        assert_eq!(fixed(-0.25, 1), "-0.3");
        // 1.005 is stored just below the tie.
        assert_eq!(fixed(1.005, 2), "1.00");
        assert_eq!(fixed(0.96, 1), "1.0");
        assert_eq!(fixed(99.995, 1), "100.0");
        assert_eq!(fixed(-0.001, 2), "-0.00");
    }

    #[test]
    fn fixed_uses_exponent_text_from_1e21() {
        assert_eq!(fixed(1e21, 2), "1e+21");
        assert_eq!(fixed(-2.5e22, 1), "-2.5e+22");
        assert_eq!(fixed(1e20, 1), "100000000000000000000.0");
    }

    #[test]
    fn number_text_matches_js_strings() {
        assert_eq!(number_text(2.5), "2.5");
        assert_eq!(number_text(1e-7), "1e-7");
        assert_eq!(number_text(1.5e-7), "1.5e-7");
        assert_eq!(number_text(0.000001), "0.000001");
        assert_eq!(number_text(1e21), "1e+21");
        assert_eq!(number_text(-0.0), "0");
        assert_eq!(number_text(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn tiny_inputs_show_in_exponent_form() {
        let mut session = Session::new(ShapeKind::Square);
        session.set_input("side", "0.0000001");
        let view = SessionView::from_session(&session);
        assert_eq!(view.fields[0].text, "1e-7");
    }

    #[test]
    fn fresh_session_view() {
        let view = SessionView::from_session(&Session::new(ShapeKind::Parallelogram));
        assert_eq!(view.icon, "fa-shapes");
        let keys: Vec<&str> = view.fields.iter().map(|f| f.key).collect();
        assert_eq!(keys, ["base", "height", "side"]);
        assert!(view.fields.iter().all(|f| f.text.is_empty()));
        assert!(view.result.is_none());
        assert!(!view.insight.visible);
    }

    #[test]
    fn view_after_calculation() {
        let mut session = Session::new(ShapeKind::Square);
        session.set_input("side", "2.2");
        let ticket = session.calculate(Timestamp::from_millis(7)).unwrap();

        let loading = SessionView::from_session(&session);
        assert_eq!(loading.fields[0].text, "2.2");
        assert_eq!(loading.result.as_ref().unwrap().area_text, "4.84");
        assert_eq!(loading.history[0].area_text, "A: 4.8");
        assert_eq!(loading.history[0].perimeter_text, "P: 8.8");
        assert!(loading.insight.visible && loading.insight.loading);

        session.complete_insight(ticket.request_id, "Line one\nLine two".to_string());
        let done = SessionView::from_session(&session);
        assert!(!done.insight.loading);
        assert_eq!(done.insight.paragraphs, ["Line one", "Line two"]);
    }

    #[test]
    fn history_summary_rounds_half_up() {
        let mut session = Session::new(ShapeKind::Square);
        session.set_input("side", "0.5");
        session.calculate(Timestamp::from_millis(1));

        let view = SessionView::from_session(&session);
        assert_eq!(view.result.as_ref().unwrap().area_text, "0.25");
        assert_eq!(view.history[0].area_text, "A: 0.3");
        assert_eq!(view.history[0].perimeter_text, "P: 2.0");
    }

    #[test]
    fn view_serializes_for_js() {
        let view = SessionView::from_session(&Session::new(ShapeKind::Circle));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["selected_shape"], "Circle");
        assert_eq!(json["fields"][0]["label"], "Radius");
        assert!(json["result"].is_null());
    }

    #[test]
    fn catalog_lists_every_shape() {
        let names: Vec<ShapeKind> = shape_catalog().iter().map(|s| s.shape).collect();
        assert_eq!(names, ShapeKind::ALL);
    }
}
