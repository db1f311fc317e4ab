// Utility helpers shared by the components.

use wasm_bindgen::JsValue;

pub fn format_zoom(scale: f64) -> String {
    format!("{}%", (scale * 100.0).round() as i64)
}

pub fn clog(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}
