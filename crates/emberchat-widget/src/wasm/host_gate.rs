use gloo_timers::future::sleep;
use web_time::Duration;

use super::*;

const BODY_POLL_INTERVAL: Duration = Duration::from_millis(200);
const BODY_POLL_ATTEMPTS: u32 = 10;

/// Waits until the host document is safe to mutate. Returns false when the
/// document body never becomes available; the caller logs and abandons the
/// mount rather than raising anything into the host page.
pub(super) async fn wait_for_host() -> bool {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return false;
    };

    if document.ready_state() == "loading" {
        await_ready_signal(&document).await;
    }
    // Page builders report ready and keep constructing the DOM; give their
    // frameworks a fixed head start either way.
    sleep(HOST_GRACE_DELAY).await;

    let mut attempts = 0;
    loop {
        if document.body().is_some() {
            return true;
        }
        attempts += 1;
        if attempts >= BODY_POLL_ATTEMPTS {
            return false;
        }
        sleep(BODY_POLL_INTERVAL).await;
    }
}

/// Defers to `DOMContentLoaded`. The readiness check and the listener
/// install happen without yielding to the event loop, so the signal cannot
/// slip between them.
async fn await_ready_signal(document: &web_sys::Document) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            let _ = resolve.call0(&JsValue::NULL);
        }));
        let _ = document.add_event_listener_with_callback(
            "DOMContentLoaded",
            callback.as_ref().unchecked_ref(),
        );
        READY_HANDLER.with(|slot| {
            *slot.borrow_mut() = Some(callback);
        });
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

/// One deferred re-check per page load: some host frameworks asynchronously
/// wipe injected subtrees during their own hydration, so if the toggle
/// marker is gone after the delay the mount routine runs again.
pub(super) fn schedule_backup_mount() {
    let already_scheduled = BACKUP_SCHEDULED.with(|scheduled| {
        if scheduled.get() {
            true
        } else {
            scheduled.set(true);
            false
        }
    });
    if already_scheduled {
        return;
    }

    spawn_local(async {
        sleep(BACKUP_MOUNT_DELAY).await;

        let toggle_missing = web_sys::window()
            .and_then(|window| window.document())
            .is_some_and(|document| document.get_element_by_id(TOGGLE_ID).is_none());
        if !toggle_missing {
            return;
        }

        log_warn("emberchat: injected nodes disappeared after mount, mounting again");
        let Some(config) = current_config() else {
            return;
        };
        match dom::mount_widget(&config) {
            Ok(()) => {
                MOUNT.with(|state| state.borrow_mut().mounted());
                dom::render_messages_dom();
            }
            Err(message) => log_warn(&format!("emberchat: backup mount failed: {message}")),
        }
    });
}
