use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, MouseEvent, TouchEvent, Window};
use yew::prelude::*;

use crate::config::JoystickConfig;
use crate::keys::{DocumentKeySink, KeySink};
use crate::model::{Anchor, PointerSample};
use crate::state::{HoldTicket, JoystickController};
use crate::util::{clog, cwarn, px};

type Controller = Rc<RefCell<JoystickController>>;

const IDLE_BODY_BG: &str = "rgba(0, 0, 0, 0.6)";
const DRAG_BODY_BG: &str = "rgba(0, 110, 230, 0.6)";

#[derive(Properties, PartialEq, Clone)]
pub struct JoystickOverlayProps {
    pub config: JoystickConfig,
    pub anchor: Anchor,
}

/// First contact that started on the listening element. `touches()` would
/// also list fingers resting on the other handle.
fn own_touch(e: &TouchEvent) -> Option<PointerSample> {
    e.target_touches()
        .item(0)
        .map(|t| PointerSample::new(t.client_x() as f64, t.client_y() as f64))
}

fn mouse_sample(e: &MouseEvent) -> PointerSample {
    PointerSample::new(e.client_x() as f64, e.client_y() as f64)
}

fn viewport(window: &Window) -> Option<(f64, f64)> {
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

fn cancel_timer(window: &Window, timer: &Cell<Option<i32>>) {
    if let Some(id) = timer.take() {
        window.clear_timeout_with_handle(id);
    }
}

#[function_component(JoystickOverlay)]
pub fn joystick_overlay(props: &JoystickOverlayProps) -> Html {
    let body_ref = use_node_ref();
    let grip_ref = use_node_ref();
    let controller: Controller = {
        let config = props.config.clone();
        let anchor = props.anchor;
        use_mut_ref(move || JoystickController::new(&config, anchor))
    };
    let sink = {
        let debug = props.config.debug_log;
        use_mut_ref(move || Rc::new(DocumentKeySink::new(debug)))
    };
    let view = {
        let controller = controller.clone();
        use_state_eq(move || controller.borrow().view())
    };

    {
        let body_ref = body_ref.clone();
        let grip_ref = grip_ref.clone();
        let controller = controller.clone();
        let sink: Rc<DocumentKeySink> = sink.borrow().clone();
        let view = view.clone();
        let hold_ms = props.config.drag_hold_ms;
        let debug = props.config.debug_log;
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("no window");
            let body = body_ref.cast::<HtmlElement>().expect("joystick body not mounted");
            let grip = grip_ref.cast::<HtmlElement>().expect("drag grip not mounted");
            let hold_delay = i32::try_from(hold_ms).unwrap_or_else(|_| {
                cwarn(&format!("drag hold {}ms out of range, clamped", hold_ms));
                i32::MAX
            });

            let refresh: Rc<dyn Fn()> = {
                let controller = controller.clone();
                Rc::new(move || view.set(controller.borrow().view()))
            };
            // Hold timer bookkeeping: the ticket it was armed for and its handle.
            let armed: Rc<Cell<Option<HoldTicket>>> = Rc::new(Cell::new(None));
            let timer: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

            let hold_cb = {
                let controller = controller.clone();
                let armed = armed.clone();
                let timer = timer.clone();
                let refresh = refresh.clone();
                Rc::new(Closure::wrap(Box::new(move || {
                    timer.set(None);
                    if let Some(ticket) = armed.take() {
                        if controller.borrow_mut().hold_elapsed(ticket) {
                            if debug {
                                clog("drag mode on");
                            }
                            refresh();
                        }
                    }
                }) as Box<dyn FnMut()>))
            };
            let start_hold: Rc<dyn Fn(PointerSample)> = {
                let controller = controller.clone();
                let armed = armed.clone();
                let timer = timer.clone();
                let window = window.clone();
                Rc::new(move |sample: PointerSample| {
                    cancel_timer(&window, &timer);
                    let ticket = controller.borrow_mut().grip_down(sample);
                    armed.set(Some(ticket));
                    timer.set(
                        window
                            .set_timeout_with_callback_and_timeout_and_arguments_0(
                                (*hold_cb).as_ref().unchecked_ref(),
                                hold_delay,
                            )
                            .ok(),
                    );
                })
            };
            let end_grip: Rc<dyn Fn()> = {
                let controller = controller.clone();
                let armed = armed.clone();
                let timer = timer.clone();
                let window = window.clone();
                let refresh = refresh.clone();
                Rc::new(move || {
                    let was_dragging = controller.borrow().view().dragging;
                    if controller.borrow_mut().grip_up().is_some() {
                        cancel_timer(&window, &timer);
                        armed.set(None);
                    }
                    if was_dragging && debug {
                        clog("drag mode off");
                    }
                    refresh();
                })
            };
            let release_all: Rc<dyn Fn()> = {
                let controller = controller.clone();
                let sink = sink.clone();
                let armed = armed.clone();
                let timer = timer.clone();
                let window = window.clone();
                Rc::new(move || {
                    let (released, _) = controller.borrow_mut().release_all();
                    cancel_timer(&window, &timer);
                    armed.set(None);
                    sink.emit_all(released);
                })
            };

            // Joystick body: knob tracking
            let body_start_cb = {
                let controller = controller.clone();
                let sink = sink.clone();
                let refresh = refresh.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    e.prevent_default();
                    if let Some(sample) = own_touch(&e) {
                        let out = controller.borrow_mut().knob_down(sample);
                        sink.emit_all(out);
                        refresh();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let body_move_cb = {
                let controller = controller.clone();
                let sink = sink.clone();
                let refresh = refresh.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    e.prevent_default();
                    if let Some(sample) = own_touch(&e) {
                        let out = controller.borrow_mut().knob_move(sample);
                        sink.emit_all(out);
                        refresh();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let body_end_cb = {
                let controller = controller.clone();
                let sink = sink.clone();
                let refresh = refresh.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    // another finger still on the body keeps the stream alive
                    if e.target_touches().length() > 0 {
                        return;
                    }
                    let out = controller.borrow_mut().knob_up();
                    sink.emit_all(out);
                    refresh();
                }) as Box<dyn FnMut(_)>)
            };
            let body_mousedown_cb = {
                let controller = controller.clone();
                let sink = sink.clone();
                let refresh = refresh.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    e.prevent_default();
                    let out = controller.borrow_mut().knob_down(mouse_sample(&e));
                    sink.emit_all(out);
                    refresh();
                }) as Box<dyn FnMut(_)>)
            };
            body.add_event_listener_with_callback("touchstart", body_start_cb.as_ref().unchecked_ref())
                .ok();
            body.add_event_listener_with_callback("touchmove", body_move_cb.as_ref().unchecked_ref())
                .ok();
            body.add_event_listener_with_callback("touchend", body_end_cb.as_ref().unchecked_ref())
                .ok();
            body.add_event_listener_with_callback("touchcancel", body_end_cb.as_ref().unchecked_ref())
                .ok();
            body.add_event_listener_with_callback("mousedown", body_mousedown_cb.as_ref().unchecked_ref())
                .ok();

            // Drag grip: hold then relocate
            let grip_start_cb = {
                let start_hold = start_hold.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    e.prevent_default();
                    e.stop_propagation();
                    if let Some(sample) = own_touch(&e) {
                        start_hold(sample);
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let grip_move_cb = {
                let controller = controller.clone();
                let refresh = refresh.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    e.prevent_default();
                    if let Some(sample) = own_touch(&e) {
                        if controller.borrow_mut().grip_move(sample) {
                            refresh();
                        }
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let grip_end_cb = {
                let end_grip = end_grip.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    if e.target_touches().length() == 0 {
                        end_grip();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let grip_mousedown_cb = {
                let start_hold = start_hold.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    e.prevent_default();
                    e.stop_propagation();
                    start_hold(mouse_sample(&e));
                }) as Box<dyn FnMut(_)>)
            };
            grip.add_event_listener_with_callback("touchstart", grip_start_cb.as_ref().unchecked_ref())
                .ok();
            grip.add_event_listener_with_callback("touchmove", grip_move_cb.as_ref().unchecked_ref())
                .ok();
            grip.add_event_listener_with_callback("touchend", grip_end_cb.as_ref().unchecked_ref())
                .ok();
            grip.add_event_listener_with_callback("touchcancel", grip_end_cb.as_ref().unchecked_ref())
                .ok();
            grip.add_event_listener_with_callback("mousedown", grip_mousedown_cb.as_ref().unchecked_ref())
                .ok();

            // Window: mouse moves/releases outside the widget, focus loss, rotation
            let mousemove_cb = {
                let controller = controller.clone();
                let sink = sink.clone();
                let refresh = refresh.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    let sample = mouse_sample(&e);
                    let mut c = controller.borrow_mut();
                    let knob = c.knob_active();
                    let out = if knob { c.knob_move(sample) } else { Vec::new() };
                    let moved = c.grip_move(sample);
                    drop(c);
                    sink.emit_all(out);
                    if knob || moved {
                        refresh();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let mouseup_cb = {
                let controller = controller.clone();
                let sink = sink.clone();
                let end_grip = end_grip.clone();
                Closure::wrap(Box::new(move |_e: MouseEvent| {
                    let knob = controller.borrow().knob_active();
                    if knob {
                        let out = controller.borrow_mut().knob_up();
                        sink.emit_all(out);
                    }
                    end_grip();
                }) as Box<dyn FnMut(_)>)
            };
            let blur_cb = {
                let release_all = release_all.clone();
                let refresh = refresh.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    release_all();
                    refresh();
                }) as Box<dyn FnMut(_)>)
            };
            let resize_cb = {
                let controller = controller.clone();
                let window = window.clone();
                let refresh = refresh.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    if let Some((width, height)) = viewport(&window) {
                        if controller.borrow_mut().fit_viewport(width, height) {
                            refresh();
                        }
                    }
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("mousemove", mousemove_cb.as_ref().unchecked_ref())
                .ok();
            window
                .add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref())
                .ok();
            window
                .add_event_listener_with_callback("blur", blur_cb.as_ref().unchecked_ref())
                .ok();
            window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
                .ok();

            // Cleanup
            move || {
                let _ = body.remove_event_listener_with_callback(
                    "touchstart",
                    body_start_cb.as_ref().unchecked_ref(),
                );
                let _ = body.remove_event_listener_with_callback(
                    "touchmove",
                    body_move_cb.as_ref().unchecked_ref(),
                );
                let _ = body.remove_event_listener_with_callback(
                    "touchend",
                    body_end_cb.as_ref().unchecked_ref(),
                );
                let _ = body.remove_event_listener_with_callback(
                    "touchcancel",
                    body_end_cb.as_ref().unchecked_ref(),
                );
                let _ = body.remove_event_listener_with_callback(
                    "mousedown",
                    body_mousedown_cb.as_ref().unchecked_ref(),
                );
                let _ = grip.remove_event_listener_with_callback(
                    "touchstart",
                    grip_start_cb.as_ref().unchecked_ref(),
                );
                let _ = grip.remove_event_listener_with_callback(
                    "touchmove",
                    grip_move_cb.as_ref().unchecked_ref(),
                );
                let _ = grip.remove_event_listener_with_callback(
                    "touchend",
                    grip_end_cb.as_ref().unchecked_ref(),
                );
                let _ = grip.remove_event_listener_with_callback(
                    "touchcancel",
                    grip_end_cb.as_ref().unchecked_ref(),
                );
                let _ = grip.remove_event_listener_with_callback(
                    "mousedown",
                    grip_mousedown_cb.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "mouseup",
                    mouseup_cb.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "blur",
                    blur_cb.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "resize",
                    resize_cb.as_ref().unchecked_ref(),
                );
                release_all();
                let _keep_alive = (
                    &body_start_cb,
                    &body_move_cb,
                    &body_end_cb,
                    &body_mousedown_cb,
                    &grip_start_cb,
                    &grip_move_cb,
                    &grip_end_cb,
                    &grip_mousedown_cb,
                    &mousemove_cb,
                    &mouseup_cb,
                    &blur_cb,
                    &resize_cb,
                );
            }
        });
    }

    let cfg = &props.config;
    let v = *view;
    let (left, top) = v.anchor.origin();
    let diameter = v.anchor.radius * 2.0;
    let wrapper_style = format!(
        "position:fixed; left:{}; top:{}; width:{}; height:{}; z-index:9999; touch-action:none; user-select:none; -webkit-user-select:none;",
        px(left),
        px(top),
        px(diameter),
        px(diameter)
    );
    let body_bg = if v.dragging { DRAG_BODY_BG } else { IDLE_BODY_BG };
    let body_style = format!(
        "width:100%; height:100%; background:{}; border-radius:50%; display:flex; justify-content:center; align-items:center; cursor:pointer; touch-action:none;",
        body_bg
    );
    let knob_style = format!(
        "width:{}; height:{}; background:rgba(255, 255, 255, 0.8); border-radius:50%; position:relative; transform:translate({}, {}); transition:{};",
        px(cfg.handle_diameter),
        px(cfg.handle_diameter),
        px(v.knob.dx),
        px(v.knob.dy),
        if v.dragging { "none" } else { "transform 0.1s ease" }
    );
    let grip = cfg.grip_diameter;
    let grip_bg = if v.dragging { "rgba(0, 110, 230, 0.95)" } else { "rgba(255, 255, 255, 0.85)" };
    let grip_style = format!(
        "position:absolute; top:{}; right:{}; width:{}; height:{}; line-height:{}; border-radius:50%; background:{}; color:#222; font-size:16px; text-align:center; cursor:move; touch-action:none;",
        px(-grip / 4.0),
        px(-grip / 4.0),
        px(grip),
        px(grip),
        px(grip),
        grip_bg
    );

    html! {
        <div data-role="joystick" style={wrapper_style}>
            <div ref={body_ref} data-role="joystick-body" style={body_style}>
                <div style={knob_style}></div>
            </div>
            <div ref={grip_ref} data-role="joystick-grip" style={grip_style} title="Hold to move">{"✥"}</div>
        </div>
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gloo::timers::future::TimeoutFuture;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_test::*;
    use web_sys::{
        Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent, MouseEvent,
        MouseEventInit, Touch, TouchEvent, TouchEventInit, TouchInit,
    };
    use yew::AppHandle;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    // center (200, 300), radius 50
    const ANCHOR: Anchor = Anchor { center_x: 200.0, center_y: 300.0, radius: 50.0 };
    const DOCKED: &str = "left:150px; top:250px;";

    fn document() -> Document {
        web_sys::window()
            .and_then(|w| w.document())
            .expect("document available")
    }

    fn window_target() -> EventTarget {
        web_sys::window().expect("window available").into()
    }

    fn set(obj: &js_sys::Object, key: &str, value: &JsValue) {
        js_sys::Reflect::set(obj, &JsValue::from_str(key), value).expect("set init field");
    }

    struct Mounted {
        root: Element,
        handle: Option<AppHandle<JoystickOverlay>>,
    }

    impl Mounted {
        async fn new(id: &str) -> Self {
            let document = document();
            let root = document.create_element("div").expect("create test root");
            root.set_id(id);
            document
                .body()
                .expect("body available")
                .append_child(&root)
                .expect("append test root");
            let props = JoystickOverlayProps {
                config: JoystickConfig::default(),
                anchor: ANCHOR,
            };
            let handle = yew::Renderer::<JoystickOverlay>::with_root_and_props(root.clone(), props)
                .render();
            TimeoutFuture::new(30).await;
            Self { root, handle: Some(handle) }
        }

        fn part(&self, role: &str) -> HtmlElement {
            self.root
                .query_selector(&format!("[data-role={}]", role))
                .expect("valid selector")
                .expect("part rendered")
                .dyn_into::<HtmlElement>()
                .expect("html element")
        }

        fn style(&self, role: &str) -> String {
            self.part(role).get_attribute("style").unwrap_or_default()
        }

        async fn unmount(mut self) {
            if let Some(handle) = self.handle.take() {
                handle.destroy();
            }
            TimeoutFuture::new(30).await;
            self.root.remove();
        }
    }

    /// Records every keydown/keyup reaching `document`.
    struct KeyLog {
        seen: Rc<RefCell<Vec<String>>>,
        listener: Closure<dyn FnMut(KeyboardEvent)>,
    }

    impl KeyLog {
        fn attach() -> Self {
            let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
            let seen_cb = seen.clone();
            let listener = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                seen_cb.borrow_mut().push(format!("{} {}", e.type_(), e.key()));
            }) as Box<dyn FnMut(_)>);
            for kind in ["keydown", "keyup"] {
                document()
                    .add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())
                    .expect("listen");
            }
            Self { seen, listener }
        }

        fn entries(&self) -> Vec<String> {
            self.seen.borrow().clone()
        }
    }

    impl Drop for KeyLog {
        fn drop(&mut self) {
            for kind in ["keydown", "keyup"] {
                let _ = document()
                    .remove_event_listener_with_callback(kind, self.listener.as_ref().unchecked_ref());
            }
        }
    }

    fn mouse(target: &EventTarget, kind: &str, x: f64, y: f64) {
        let init = js_sys::Object::new();
        set(&init, "clientX", &JsValue::from_f64(x));
        set(&init, "clientY", &JsValue::from_f64(y));
        set(&init, "bubbles", &JsValue::TRUE);
        set(&init, "cancelable", &JsValue::TRUE);
        let event = MouseEvent::new_with_mouse_event_init_dict(kind, init.unchecked_ref::<MouseEventInit>())
            .expect("mouse event");
        target.dispatch_event(&event).expect("dispatch mouse event");
    }

    /// `None` where the browser cannot construct touches (desktop Firefox).
    fn finger(id: i32, target: &EventTarget, x: f64, y: f64) -> Option<Touch> {
        TouchEvent::new("touchstart").ok()?;
        let init = js_sys::Object::new();
        set(&init, "identifier", &JsValue::from(id));
        set(&init, "target", target.as_ref());
        set(&init, "clientX", &JsValue::from_f64(x));
        set(&init, "clientY", &JsValue::from_f64(y));
        Touch::new(init.unchecked_ref::<TouchInit>()).ok()
    }

    fn touch(target: &EventTarget, kind: &str, all: &[&Touch], on_target: &[&Touch], changed: &[&Touch]) {
        let list = |touches: &[&Touch]| {
            let arr = js_sys::Array::new();
            for t in touches {
                arr.push(t.as_ref());
            }
            arr
        };
        let init = js_sys::Object::new();
        set(&init, "touches", &list(all));
        set(&init, "targetTouches", &list(on_target));
        set(&init, "changedTouches", &list(changed));
        set(&init, "bubbles", &JsValue::TRUE);
        set(&init, "cancelable", &JsValue::TRUE);
        let event = TouchEvent::new_with_event_init_dict(kind, init.unchecked_ref::<TouchEventInit>())
            .expect("touch event");
        target.dispatch_event(&event).expect("dispatch touch event");
    }

    #[wasm_bindgen_test(async)]
    async fn short_grip_press_leaves_widget_in_place() {
        let m = Mounted::new("ct-test-short-press").await;
        let grip = m.part("joystick-grip");
        mouse(&grip, "mousedown", 245.0, 255.0);
        TimeoutFuture::new(500).await;
        mouse(&window_target(), "mouseup", 245.0, 255.0);
        // well past the original deadline: a timer left running would fire here
        TimeoutFuture::new(700).await;
        mouse(&window_target(), "mousemove", 445.0, 155.0);
        TimeoutFuture::new(30).await;
        assert!(m.style("joystick").contains(DOCKED), "{}", m.style("joystick"));
        assert!(m.style("joystick-body").contains(IDLE_BODY_BG));
        m.unmount().await;
    }

    #[wasm_bindgen_test(async)]
    async fn held_grip_enters_drag_mode_and_moves_widget() {
        let m = Mounted::new("ct-test-hold").await;
        let grip = m.part("joystick-grip");
        mouse(&grip, "mousedown", 245.0, 255.0);
        TimeoutFuture::new(1100).await;
        assert!(m.style("joystick-body").contains(DRAG_BODY_BG));
        mouse(&window_target(), "mousemove", 345.0, 205.0);
        TimeoutFuture::new(30).await;
        assert!(m.style("joystick").contains("left:250px; top:200px;"), "{}", m.style("joystick"));
        mouse(&window_target(), "mouseup", 345.0, 205.0);
        TimeoutFuture::new(30).await;
        assert!(m.style("joystick-body").contains(IDLE_BODY_BG));
        assert!(m.style("joystick").contains("left:250px; top:200px;"));
        m.unmount().await;
    }

    #[wasm_bindgen_test(async)]
    async fn blur_releases_held_key() {
        let log = KeyLog::attach();
        let m = Mounted::new("ct-test-blur").await;
        mouse(&m.part("joystick-body"), "mousedown", 155.0, 300.0);
        assert_eq!(log.entries(), vec!["keydown ArrowLeft"]);
        let blur = Event::new("blur").expect("blur event");
        window_target().dispatch_event(&blur).expect("dispatch blur");
        assert_eq!(log.entries(), vec!["keydown ArrowLeft", "keyup ArrowLeft"]);
        m.unmount().await;
        assert_eq!(log.entries().len(), 2);
    }

    #[wasm_bindgen_test(async)]
    async fn mouseup_anywhere_releases_held_key() {
        let log = KeyLog::attach();
        let m = Mounted::new("ct-test-mouseup").await;
        mouse(&m.part("joystick-body"), "mousedown", 245.0, 300.0);
        mouse(&window_target(), "mouseup", 600.0, 40.0);
        assert_eq!(log.entries(), vec!["keydown ArrowRight", "keyup ArrowRight"]);
        m.unmount().await;
    }

    #[wasm_bindgen_test(async)]
    async fn unmount_releases_held_key() {
        let log = KeyLog::attach();
        let m = Mounted::new("ct-test-unmount").await;
        mouse(&m.part("joystick-body"), "mousedown", 200.0, 345.0);
        assert_eq!(log.entries(), vec!["keydown ArrowDown"]);
        m.unmount().await;
        assert_eq!(log.entries(), vec!["keydown ArrowDown", "keyup ArrowDown"]);
    }

    #[wasm_bindgen_test(async)]
    async fn host_blurring_inside_keydown_listener_still_releases() {
        let log = KeyLog::attach();
        let m = Mounted::new("ct-test-reentrant").await;
        let blur_on_key = Closure::wrap(Box::new(move |_e: KeyboardEvent| {
            if let Ok(blur) = Event::new("blur") {
                let _ = window_target().dispatch_event(&blur);
            }
        }) as Box<dyn FnMut(_)>);
        document()
            .add_event_listener_with_callback("keydown", blur_on_key.as_ref().unchecked_ref())
            .expect("listen");
        mouse(&m.part("joystick-body"), "mousedown", 245.0, 300.0);
        let _ = document()
            .remove_event_listener_with_callback("keydown", blur_on_key.as_ref().unchecked_ref());
        assert_eq!(log.entries(), vec!["keydown ArrowRight", "keyup ArrowRight"]);
        m.unmount().await;
        assert_eq!(log.entries().len(), 2);
    }

    #[wasm_bindgen_test(async)]
    async fn knob_ignores_finger_resting_on_grip() {
        let log = KeyLog::attach();
        let m = Mounted::new("ct-test-two-fingers").await;
        let grip = m.part("joystick-grip");
        let body = m.part("joystick-body");
        let (Some(on_grip), Some(on_knob)) = (
            finger(1, &grip, 245.0, 255.0),
            finger(2, &body, 200.0, 300.0),
        ) else {
            m.unmount().await;
            return;
        };
        touch(&grip, "touchstart", &[&on_grip], &[&on_grip], &[&on_grip]);
        TimeoutFuture::new(1100).await;
        assert!(m.style("joystick-body").contains(DRAG_BODY_BG));

        touch(&body, "touchstart", &[&on_grip, &on_knob], &[&on_knob], &[&on_knob]);
        touch(&body, "touchmove", &[&on_grip, &on_knob], &[&on_knob], &[&on_knob]);
        assert!(log.entries().is_empty(), "{:?}", log.entries());

        touch(&body, "touchend", &[&on_grip], &[], &[&on_knob]);
        touch(&grip, "touchend", &[], &[], &[&on_grip]);
        TimeoutFuture::new(30).await;
        assert!(m.style("joystick-body").contains(IDLE_BODY_BG));
        assert!(log.entries().is_empty());
        m.unmount().await;
    }
}
