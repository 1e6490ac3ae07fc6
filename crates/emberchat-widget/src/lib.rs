#![allow(clippy::needless_pass_by_value)]

#[cfg(any(target_arch = "wasm32", test))]
pub mod geometry;
#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::{Cell, RefCell};

    use emberchat_core::config::WidgetConfig;
    use emberchat_core::mount::MountState;
    use emberchat_core::session::ConversationSession;
    use emberchat_core::tenant::TenantResolution;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    use crate::wasm_constants::*;

    mod conversation;
    mod dom;
    mod host_gate;
    mod network;
    mod resilience;

    thread_local! {
        static CONFIG: RefCell<Option<WidgetConfig>> = const { RefCell::new(None) };
        static SESSION: RefCell<Option<ConversationSession>> = const { RefCell::new(None) };
        static TENANT: RefCell<TenantResolution> = const { RefCell::new(TenantResolution::Unresolved) };
        static MOUNT: RefCell<MountState> = const { RefCell::new(MountState::Unmounted) };
        static BOOT_ACTIVE: Cell<bool> = const { Cell::new(false) };
        static RESILIENCE_ACTIVE: Cell<bool> = const { Cell::new(false) };
        static BACKUP_SCHEDULED: Cell<bool> = const { Cell::new(false) };
        static TOGGLE_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static CLOSE_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static SEND_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static INPUT_KEYDOWN_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::KeyboardEvent)>>> = const { RefCell::new(None) };
        static WINDOW_SCROLL_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static WINDOW_RESIZE_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static READY_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        if let Some(config_value) = read_config_global() {
            init(config_value);
        }
    }

    /// Entry point for the host page. Safe to call more than once: the mount
    /// routine removes previously injected nodes, so repeated init never
    /// produces duplicate widgets.
    #[wasm_bindgen]
    pub fn init(config: JsValue) {
        let config = match parse_config(config) {
            Ok(config) => config,
            Err(message) => {
                log_warn(&format!("emberchat: invalid configuration: {message}"));
                return;
            }
        };

        SESSION.with(|session| {
            let mut session = session.borrow_mut();
            if session.is_none() {
                let mut created = ConversationSession::new(now_unix_ms());
                created.append_welcome(&config.welcome_message);
                *session = Some(created);
            }
        });
        CONFIG.with(|slot| {
            *slot.borrow_mut() = Some(config);
        });
        MOUNT.with(|state| state.borrow_mut().begin_waiting());

        let already_booting = BOOT_ACTIVE.with(|active| {
            if active.get() {
                true
            } else {
                active.set(true);
                false
            }
        });
        if already_booting {
            // A mount pass is in flight; idempotent re-mount happens there.
            return;
        }

        spawn_local(async {
            boot().await;
            BOOT_ACTIVE.with(|active| active.set(false));
        });
    }

    #[wasm_bindgen]
    pub fn toggle_widget() {
        let open = MOUNT.with(|state| {
            let mut state = state.borrow_mut();
            state.toggle().then(|| state.is_open())
        });
        if let Some(open) = open {
            dom::set_panel_open(open);
        }
    }

    #[wasm_bindgen]
    pub fn open_widget() {
        if MOUNT.with(|state| state.borrow_mut().open()) {
            dom::set_panel_open(true);
        }
    }

    #[wasm_bindgen]
    pub fn close_widget() {
        if MOUNT.with(|state| state.borrow_mut().close()) {
            dom::set_panel_open(false);
        }
    }

    /// Programmatic send, same path as the composer.
    #[wasm_bindgen]
    pub fn send_message(text: String) {
        conversation::submit_message(text);
    }

    /// Diagnostics snapshot for integrators and tests.
    #[wasm_bindgen]
    pub fn widget_state_json() -> String {
        let mount = MOUNT.with(|state| *state.borrow());
        let tenant = TENANT.with(|state| state.borrow().clone());
        let session = SESSION.with(|session| session.borrow().clone());
        serde_json::to_string(&serde_json::json!({
            "mount": mount,
            "tenant": tenant,
            "session": session,
        }))
        .unwrap_or_else(|_| "{}".to_string())
    }

    async fn boot() {
        if !host_gate::wait_for_host().await {
            log_warn("emberchat: host document never became ready, giving up");
            return;
        }
        // Read after the wait so a re-init issued in the meantime wins.
        let Some(config) = current_config() else {
            return;
        };

        resolve_tenant_once(&config).await;

        if let Err(message) = dom::mount_widget(&config) {
            log_warn(&format!("emberchat: mount failed: {message}"));
            return;
        }
        MOUNT.with(|state| state.borrow_mut().mounted());
        dom::render_messages_dom();

        resilience::install_window_listeners();
        resilience::ensure_resilience_loop();
        host_gate::schedule_backup_mount();
    }

    /// One lookup per page load; both outcomes are cached for the session.
    /// Detection only runs for generic multi-tenant deployments, signalled
    /// by `tenantHint` ("auto" resolves the current host's domain, anything
    /// else is an explicit domain override). A per-site embed with no hint
    /// talks to the generic public endpoint and never looks up a tenant.
    async fn resolve_tenant_once(config: &WidgetConfig) {
        let Some(hint) = config.tenant_hint.as_deref() else {
            return;
        };
        let settled = TENANT.with(|state| state.borrow().is_settled());
        if settled {
            return;
        }

        let lookup_domain = if hint == "auto" {
            network::host_domain()
        } else {
            hint.to_string()
        };
        let resolution = match network::fetch_tenant(&config.api_url, &lookup_domain).await {
            Ok(response) => TenantResolution::from_detect_response(response, &lookup_domain),
            Err(error) => TenantResolution::Failed {
                message: error.to_string(),
            },
        };

        if let TenantResolution::Failed { message } = &resolution {
            log_warn(&format!("emberchat: tenant lookup failed: {message}"));
        }
        TENANT.with(|state| {
            *state.borrow_mut() = resolution;
        });
    }

    fn current_config() -> Option<WidgetConfig> {
        CONFIG.with(|slot| slot.borrow().clone())
    }

    fn parse_config(value: JsValue) -> Result<WidgetConfig, String> {
        let raw = js_sys::JSON::stringify(&value)
            .ok()
            .and_then(|raw| raw.as_string())
            .ok_or_else(|| "configuration is not a plain object".to_string())?;
        let json: serde_json::Value =
            serde_json::from_str(&raw).map_err(|error| error.to_string())?;
        WidgetConfig::from_json(&json).map_err(|error| error.to_string())
    }

    fn read_config_global() -> Option<JsValue> {
        let window = web_sys::window()?;
        let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)).ok()?;
        if value.is_undefined() || value.is_null() {
            None
        } else {
            Some(value)
        }
    }

    fn now_unix_ms() -> u64 {
        let now = js_sys::Date::now();
        if !now.is_finite() || now.is_sign_negative() {
            return 0;
        }
        now.floor().min(u64::MAX as f64) as u64
    }

    fn log_warn(message: &str) {
        web_sys::console::warn_1(&JsValue::from_str(message));
    }
}
