// Floating on-screen joystick that turns touch drags into arrow-key events.
mod components;
mod config;
mod keys;
mod model;
mod state;
mod util;

use components::app::App;
use util::cwarn;

const ROOT_ID: &str = "ct-joystick-root";

/// Appends the overlay's own mount point to the page body.
fn mount_root() -> Result<web_sys::Element, &'static str> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    if document.get_element_by_id(ROOT_ID).is_some() {
        return Err("already mounted");
    }
    let body = document.body().ok_or("no document body")?;
    let root = document
        .create_element("div")
        .map_err(|_| "cannot create mount element")?;
    root.set_id(ROOT_ID);
    body.append_child(&root)
        .map_err(|_| "cannot append mount element")?;
    Ok(root)
}

fn main() {
    match mount_root() {
        Ok(root) => {
            yew::Renderer::<App>::with_root(root).render();
        }
        Err(reason) => cwarn(&format!("joystick not mounted: {}", reason)),
    }
}
