use super::joystick_overlay::JoystickOverlay;
use crate::config::JoystickConfig;
use crate::model::Anchor;
use crate::util::clog;
use yew::prelude::*;

fn viewport_height(fallback: f64) -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|h| h.as_f64())
        .unwrap_or(fallback)
}

#[function_component(App)]
pub fn app() -> Html {
    let config = use_state(JoystickConfig::load);
    let anchor = {
        let config = (*config).clone();
        use_state(move || {
            let fallback = config.container_diameter + 2.0 * config.corner_offset;
            Anchor::docked(
                config.container_diameter,
                config.corner_offset,
                viewport_height(fallback),
            )
        })
    };

    {
        let anchor = *anchor;
        use_effect_with((), move |_| {
            clog(&format!(
                "mounted at ({:.0}, {:.0}) r={}",
                anchor.center_x, anchor.center_y, anchor.radius
            ));
            || ()
        });
    }

    html! { <JoystickOverlay config={(*config).clone()} anchor={*anchor} /> }
}
