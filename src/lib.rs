// shape_engine: Rust/WASM core of the geometry calculator page.
// All calculation and session logic lives here; JS only forwards events and renders snapshots.

mod calculator;
mod controller;
mod error;
mod history;
mod schema;
mod session;
mod types;
mod view;

pub mod insight;

use wasm_bindgen::prelude::*;

pub use calculator::compute;
pub use controller::SessionController;
pub use error::{EngineError, InsightError};
pub use history::{History, IdGenerator, HISTORY_LIMIT};
pub use insight::{InsightService, InsightSource, UnconfiguredSource};
pub use schema::{all_schemas, schema_for, FieldSpec, ShapeSchema};
pub use session::{parse_float, Session};
pub use types::*;
pub use view::{fixed, number_text, shape_catalog, SessionView};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[cfg(target_arch = "wasm32")]
fn install_logging(level: LogLevel) {
    use std::sync::Once;

    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let config = tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(level.into())
            .build();
        tracing_wasm::set_as_global_default_with_config(config);
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn install_logging(_level: LogLevel) {}

fn to_js(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_config(config_json: &str) -> Result<EngineConfig, EngineError> {
    serde_json::from_str(config_json).map_err(|e| EngineError::InvalidConfig(e.to_string()))
}

/// Pick the insight source for this page: a host callback wins, then the
/// Gemini API when a key is configured, otherwise canned fallbacks.
#[cfg(target_arch = "wasm32")]
fn insight_service(
    settings: InsightSettings,
    callback: Option<js_sys::Function>,
) -> InsightService {
    use insight::{FetchTransport, GeminiClient, JsCallbackSource};

    match callback {
        Some(callback) => InsightService::new(JsCallbackSource::new(callback)),
        None if settings.api_key.as_deref().is_some_and(|k| !k.is_empty()) => {
            InsightService::new(GeminiClient::new(FetchTransport, settings))
        }
        None => InsightService::new(UnconfiguredSource),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn insight_service(
    _settings: InsightSettings,
    _callback: Option<js_sys::Function>,
) -> InsightService {
    InsightService::new(UnconfiguredSource)
}

/// Main engine interface exposed to JavaScript.
/// Structured results cross the boundary as JSON strings.
#[wasm_bindgen]
pub struct ShapeEngine {
    controller: SessionController,
}

#[wasm_bindgen]
impl ShapeEngine {
    /// `insight_callback`, if given, is called as
    /// `(shapeName, area, perimeter) => string | Promise<string>`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: &str,
        insight_callback: Option<js_sys::Function>,
    ) -> Result<ShapeEngine, JsValue> {
        let config = parse_config(config_json).map_err(to_js)?;
        install_logging(config.log_level);
        let insight = insight_service(config.insight.clone(), insight_callback);
        Ok(ShapeEngine::from_config(config, insight))
    }

    /// Switch to the shape named `name` (case-insensitive).
    pub fn select_shape(&self, name: &str) -> Result<(), JsValue> {
        self.select_shape_named(name).map(|_| ()).map_err(to_js)
    }

    /// Store a raw text entry. Returns false for fields the current shape lacks.
    pub fn set_input(&self, key: &str, raw_text: &str) -> bool {
        self.controller.session().borrow_mut().set_input(key, raw_text)
    }

    /// Compute, record history and fetch an insight.
    /// Resolves to `false` when the result was NaN and was discarded.
    pub fn calculate(&self) -> js_sys::Promise {
        let controller = self.controller.clone();
        let now = Timestamp::from_millis(js_sys::Date::now() as u64);
        wasm_bindgen_futures::future_to_promise(async move {
            Ok(JsValue::from_bool(controller.calculate(now).await))
        })
    }

    pub fn clear_history(&self) {
        self.controller.session().borrow_mut().clear_history();
    }

    /// Current state as `SessionView` JSON.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.snapshot_json().map_err(to_js)
    }

    /// Shape catalog (fields, labels, icons) as JSON.
    pub fn shapes() -> Result<String, JsValue> {
        shapes_json().map_err(to_js)
    }

    /// Stateless calculator: `inputs_json` is an object of field values.
    /// Returns `{ "area": .., "perimeter": .. }`.
    pub fn compute(shape: &str, inputs_json: &str) -> Result<String, JsValue> {
        compute_json(shape, inputs_json).map_err(to_js)
    }
}

impl ShapeEngine {
    pub fn from_config(config: EngineConfig, insight: InsightService) -> Self {
        ShapeEngine {
            controller: SessionController::new(Session::new(config.initial_shape), insight),
        }
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn select_shape_named(&self, name: &str) -> Result<ShapeKind, EngineError> {
        let shape: ShapeKind = name.parse()?;
        self.controller.session().borrow_mut().select_shape(shape);
        Ok(shape)
    }

    pub fn snapshot_json(&self) -> Result<String, EngineError> {
        let view = SessionView::from_session(&self.controller.session().borrow());
        Ok(serde_json::to_string(&view)?)
    }
}

fn shapes_json() -> Result<String, EngineError> {
    Ok(serde_json::to_string(shape_catalog())?)
}

fn compute_json(shape: &str, inputs_json: &str) -> Result<String, EngineError> {
    let shape: ShapeKind = shape.parse()?;
    let inputs: InputValues = serde_json::from_str(inputs_json)?;
    Ok(serde_json::to_string(&compute(shape, &inputs))?)
}
