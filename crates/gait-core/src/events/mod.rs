//! Event system: synchronous handlers for batch progress and spec lifecycle.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::GaitEventHandler;
pub use types::*;
