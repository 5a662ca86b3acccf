// Session state: selected shape, inputs, last result, history, insight flags.
// Every mutation goes through one of the methods below; the struct is plain data
// so it can be driven without any rendering layer.

use tracing::debug;

use crate::calculator;
use crate::history::{History, IdGenerator};
use crate::schema;
use crate::types::*;

/// Explicit state of one calculator page.
#[derive(Debug, Clone)]
pub struct Session {
    selected_shape: ShapeKind,
    inputs: InputValues,
    last_result: Option<ComputationResult>,
    history: History,
    insight_text: String,
    insight_loading: bool,
    latest_request: Option<RequestId>,
    issued_requests: RequestId,
    ids: IdGenerator,
}

impl Session {
    pub fn new(initial_shape: ShapeKind) -> Self {
        Session {
            selected_shape: initial_shape,
            inputs: InputValues::for_shape(initial_shape),
            last_result: None,
            history: History::new(),
            insight_text: String::new(),
            insight_loading: false,
            latest_request: None,
            issued_requests: RequestId::new(0),
            ids: IdGenerator::new(),
        }
    }

    pub fn selected_shape(&self) -> ShapeKind {
        self.selected_shape
    }

    pub fn inputs(&self) -> &InputValues {
        &self.inputs
    }

    pub fn last_result(&self) -> Option<ComputationResult> {
        self.last_result
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn insight_text(&self) -> &str {
        &self.insight_text
    }

    pub fn insight_loading(&self) -> bool {
        self.insight_loading
    }

    /// Switch shape. Inputs are zero-filled for the new schema, the result and
    /// insight are cleared, and any outstanding insight request goes stale.
    pub fn select_shape(&mut self, shape: ShapeKind) {
        debug!(from = %self.selected_shape, to = %shape, "select shape");
        self.selected_shape = shape;
        self.inputs = InputValues::for_shape(shape);
        self.last_result = None;
        self.insight_text.clear();
        self.insight_loading = false;
        self.latest_request = None;
    }

    /// Store `raw_text` for `key`, parsed the way a browser's `parseFloat` would.
    /// Unparseable text stores 0. Returns false if `key` is not part of the
    /// active shape's schema.
    pub fn set_input(&mut self, key: &str, raw_text: &str) -> bool {
        if !schema::schema_for(self.selected_shape).has_field(key) {
            debug!(shape = %self.selected_shape, key, "ignoring input for unknown field");
            return false;
        }
        let parsed = parse_float(raw_text);
        let value = if parsed.is_nan() { 0.0 } else { parsed };
        self.inputs.set(key, value)
    }

    /// Run the calculator on the current inputs.
    ///
    /// A NaN result leaves the session untouched and returns `None`. Otherwise
    /// the result is stored, a history record is prepended, the insight is
    /// marked loading, and a ticket for the insight request is returned.
    pub fn calculate(&mut self, now: Timestamp) -> Option<InsightTicket> {
        let result = calculator::compute(self.selected_shape, &self.inputs);
        if !result.is_usable() {
            debug!(shape = %self.selected_shape, "discarding NaN result");
            return None;
        }

        self.last_result = Some(result);
        self.history.push_front(HistoryRecord {
            id: self.ids.next_id(),
            shape: self.selected_shape,
            inputs: self.inputs.clone(),
            area: result.area,
            perimeter: result.perimeter,
            timestamp: now,
        });

        let request_id = self.issued_requests.next();
        self.issued_requests = request_id;
        self.latest_request = Some(request_id);
        self.insight_loading = true;

        debug!(
            shape = %self.selected_shape,
            area = result.area,
            perimeter = result.perimeter,
            request = request_id.as_u64(),
            "calculated"
        );

        Some(InsightTicket {
            request_id,
            request: InsightRequest {
                shape: self.selected_shape,
                area: result.area,
                perimeter: result.perimeter,
            },
        })
    }

    /// Deliver insight text for `request_id`. Only the most recently issued
    /// request is applied; anything older is dropped and `false` returned.
    pub fn complete_insight(&mut self, request_id: RequestId, text: String) -> bool {
        if self.latest_request != Some(request_id) {
            debug!(request = request_id.as_u64(), "dropping stale insight");
            return false;
        }
        self.insight_text = text;
        self.insight_loading = false;
        self.latest_request = None;
        true
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ShapeKind::default())
    }
}

/// Parse the longest numeric prefix of `text`, like JavaScript `parseFloat`.
///
/// Leading whitespace is skipped; an optional sign may precede digits or the
/// literal `Infinity`. Returns NaN when no number can be read.
pub fn parse_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let int_digits = digits(end);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}
