pub mod errors;
pub mod events;
pub mod paths;
pub mod types;

pub use errors::{ConfigError, PlatformError};
pub use events::{EventBus, SessionEvent};
pub use types::{InlineAsset, Message, Part, Role};
