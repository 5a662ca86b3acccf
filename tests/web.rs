// Browser tests for the JS-facing surface. Run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use js_sys::Function;
use serde_json::Value;
use shape_engine::ShapeEngine;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn snapshot(engine: &ShapeEngine) -> Value {
    serde_json::from_str(&engine.snapshot().unwrap()).unwrap()
}

#[wasm_bindgen_test]
async fn callback_insight_lands_in_snapshot() {
    let callback = Function::new_with_args(
        "shape, area, perimeter",
        "return Promise.resolve(shape + ' ' + area.toFixed(2) + ' ' + perimeter.toFixed(2));",
    );
    let engine = ShapeEngine::new("{}", Some(callback)).unwrap();
    assert!(engine.set_input("side", "4"));

    let recorded = JsFuture::from(engine.calculate()).await.unwrap();
    assert_eq!(recorded.as_bool(), Some(true));

    let view = snapshot(&engine);
    assert_eq!(view["result"]["area_text"], "16.00");
    assert_eq!(view["insight"]["text"], "Square 16.00 16.00");
    assert_eq!(view["insight"]["loading"], false);
    assert_eq!(view["history"].as_array().map(Vec::len), Some(1));
}

#[wasm_bindgen_test]
async fn throwing_callback_yields_fallback() {
    let callback = Function::new_no_args("throw new Error('boom');");
    let engine = ShapeEngine::new(r#"{"initial_shape":"Circle"}"#, Some(callback)).unwrap();
    engine.set_input("radius", "2");

    JsFuture::from(engine.calculate()).await.unwrap();

    let view = snapshot(&engine);
    assert_eq!(
        view["insight"]["text"],
        shape_engine::insight::UNAVAILABLE_INSIGHT
    );
}

#[wasm_bindgen_test]
async fn nan_result_resolves_false() {
    let engine = ShapeEngine::new(r#"{"initial_shape":"Rectangle"}"#, None).unwrap();
    engine.set_input("length", "Infinity");
    engine.set_input("width", "0");

    let recorded = JsFuture::from(engine.calculate()).await.unwrap();
    assert_eq!(recorded.as_bool(), Some(false));
    assert!(snapshot(&engine)["history"].as_array().unwrap().is_empty());
}

#[wasm_bindgen_test]
fn unknown_shape_is_an_error() {
    let engine = ShapeEngine::new("{}", None).unwrap();
    assert!(engine.select_shape("hexagon").is_err());
    assert!(engine.select_shape("Triangle").is_ok());
}

#[wasm_bindgen_test]
fn invalid_config_is_an_error() {
    assert!(ShapeEngine::new("not json", None).is_err());
}
