use gloo_timers::future::sleep;
use web_sys::HtmlElement;

use crate::geometry;

use super::*;

/// Re-applies the toggle control's critical geometry unconditionally, and
/// the panel's while it exists. Some page builders rewrite inline styles or
/// move nodes on their own schedule, so this runs as a continuous correction
/// loop rather than a one-time fix. Structural styling only; conversation
/// state is never touched here.
pub(super) fn reassert_geometry() {
    if let Some(toggle) = dom::element_by_id::<HtmlElement>(TOGGLE_ID) {
        dom::apply_geometry(&toggle, &geometry::toggle_geometry());
    }
    if let Some(panel) = dom::element_by_id::<HtmlElement>(PANEL_ID) {
        let open = MOUNT.with(|state| state.borrow().is_open());
        dom::apply_geometry(&panel, &geometry::panel_geometry(open));
    }
}

/// Singleton interval task; runs for as long as the widget is mounted.
pub(super) fn ensure_resilience_loop() {
    let already_running = RESILIENCE_ACTIVE.with(|active| {
        if active.get() {
            true
        } else {
            active.set(true);
            false
        }
    });
    if already_running {
        return;
    }

    spawn_local(async {
        loop {
            if !MOUNT.with(|state| state.borrow().is_mounted()) {
                break;
            }
            reassert_geometry();
            sleep(RESILIENCE_INTERVAL).await;
        }
        RESILIENCE_ACTIVE.with(|active| active.set(false));
    });
}

/// Scroll and resize are the moments host scripts most often reflow or
/// reposition; both re-assert immediately instead of waiting for the next
/// interval tick.
pub(super) fn install_window_listeners() {
    let Some(window) = web_sys::window() else {
        return;
    };

    WINDOW_SCROLL_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            reassert_geometry();
        }));
        let _ = window.add_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });

    WINDOW_RESIZE_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            reassert_geometry();
        }));
        let _ = window.add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });
}
