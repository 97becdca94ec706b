pub mod agents;
pub mod audio;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod reply;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
pub mod widget;

// Re-export main types for convenience
pub use agents::AgentConfig;
pub use audio::{AudioPlayback, AudioSink, ExternalPlayer};
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, SubmitError};
pub use reply::{BackendReply, NormalizedReply, ReplyBody};
pub use routes::{Page, Route};
pub use session::ChatSession;
pub use state::{AudioRef, ChatMessage, ChatRole};
pub use store::MessageStore;
pub use widget::ChatWidget;
