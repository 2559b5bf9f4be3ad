// Delivery of key transitions to the host page
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, KeyboardEvent, KeyboardEventInit};

use crate::model::KeyTransition;
use crate::util::{clog, cwarn};

/// Receives transitions after the controller borrow has been released, so a
/// host listener reacting to a key event may re-enter the overlay.
pub trait KeySink {
    fn emit(&self, transition: KeyTransition);

    fn emit_all(&self, transitions: Vec<KeyTransition>) {
        for transition in transitions {
            self.emit(transition);
        }
    }
}

/// Dispatches synthetic arrow-key events on `document`, where the host page listens.
pub struct DocumentKeySink {
    document: Option<Document>,
    debug: bool,
}

impl DocumentKeySink {
    pub fn new(debug: bool) -> Self {
        let document = web_sys::window().and_then(|w| w.document());
        if document.is_none() {
            cwarn("no document, key events will be dropped");
        }
        Self { document, debug }
    }

    fn dispatch(&self, transition: KeyTransition) -> Result<bool, JsValue> {
        let Some(document) = &self.document else {
            return Ok(false);
        };
        let event = keyboard_event(transition)?;
        document.dispatch_event(&event)
    }
}

impl KeySink for DocumentKeySink {
    fn emit(&self, transition: KeyTransition) {
        if self.debug {
            clog(&format!(
                "{} {}",
                transition.phase.event_type(),
                transition.direction.key_name()
            ));
        }
        if let Err(err) = self.dispatch(transition) {
            cwarn(&format!(
                "dispatch {} {} failed: {:?}",
                transition.phase.event_type(),
                transition.direction.key_name(),
                err
            ));
        }
    }
}

/// Builds the event with both modern (`key`, `code`) and legacy (`keyCode`,
/// `which`) fields; some pages still read only the legacy ones.
pub fn keyboard_event(transition: KeyTransition) -> Result<KeyboardEvent, JsValue> {
    let direction = transition.direction;
    let init = js_sys::Object::new();
    let name = JsValue::from_str(direction.key_name());
    let code = JsValue::from(direction.key_code());
    js_sys::Reflect::set(&init, &JsValue::from_str("key"), &name)?;
    js_sys::Reflect::set(&init, &JsValue::from_str("code"), &name)?;
    js_sys::Reflect::set(&init, &JsValue::from_str("keyCode"), &code)?;
    js_sys::Reflect::set(&init, &JsValue::from_str("which"), &code)?;
    js_sys::Reflect::set(&init, &JsValue::from_str("bubbles"), &JsValue::TRUE)?;
    js_sys::Reflect::set(&init, &JsValue::from_str("cancelable"), &JsValue::TRUE)?;
    KeyboardEvent::new_with_keyboard_event_init_dict(
        transition.phase.event_type(),
        init.unchecked_ref::<KeyboardEventInit>(),
    )
}
