// Console helpers. Only call from code that runs in the browser.
use wasm_bindgen::JsValue;

const PREFIX: &str = "[ct-joystick]";

pub fn clog(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(&format!("{} {}", PREFIX, msg)));
}

pub fn cwarn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(&format!("{} {}", PREFIX, msg)));
}

/// CSS pixel length.
pub fn px(v: f64) -> String {
    format!("{}px", v)
}
