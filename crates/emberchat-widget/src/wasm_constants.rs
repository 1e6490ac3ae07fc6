use web_time::Duration;

pub(crate) const TOGGLE_ID: &str = "emberchat-toggle";
pub(crate) const PANEL_ID: &str = "emberchat-panel";
pub(crate) const HEADER_ID: &str = "emberchat-header";
pub(crate) const HEADER_TITLE_ID: &str = "emberchat-header-title";
pub(crate) const CLOSE_ID: &str = "emberchat-close";
pub(crate) const MESSAGES_ID: &str = "emberchat-messages";
pub(crate) const COMPOSER_ID: &str = "emberchat-composer";
pub(crate) const INPUT_ID: &str = "emberchat-input";
pub(crate) const SEND_ID: &str = "emberchat-send";
pub(crate) const TYPING_ID: &str = "emberchat-typing";

/// Reserved window global read by `start()` for the script-tag drop-in path.
pub(crate) const CONFIG_GLOBAL: &str = "__EMBERCHAT_CONFIG__";

/// Grace delay after the host's ready signal; page builders keep building
/// the DOM after they report ready.
pub(crate) const HOST_GRACE_DELAY: Duration = Duration::from_millis(1_000);
/// One-shot backup re-check for hosts that wipe injected subtrees during
/// their own hydration.
pub(crate) const BACKUP_MOUNT_DELAY: Duration = Duration::from_millis(5_000);
pub(crate) const RESILIENCE_INTERVAL: Duration = Duration::from_millis(1_000);
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

pub(crate) const TENANT_DETECT_PATH: &str = "/api/tenant/detect";
pub(crate) const PUBLIC_CHAT_PATH: &str = "/api/chat/public";
pub(crate) const DOMAIN_CHAT_PATH: &str = "/api/chat/by-domain";

pub(crate) const TYPING_LABEL: &str = "\u{2022} \u{2022} \u{2022}";
