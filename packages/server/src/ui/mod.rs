//! UI layer: WebSocket/HTTP entry points and the message router.

mod handler;
pub mod router;
mod server;
mod signal;
pub mod state;

pub use router::MessageRouter;
pub use server::Server;
