pub mod config;
pub mod error;
pub mod markup;
pub mod mount;
pub mod protocol;
pub mod session;
pub mod tenant;

pub use config::{ConfigError, WidgetConfig};
pub use error::{ErrorKind, WidgetApiError};
pub use mount::MountState;
pub use session::{
    ConversationSession, Message, MessageLifecycle, MessageRole, TurnRejection, TurnTicket,
};
pub use tenant::{TenantIdentity, TenantResolution};
