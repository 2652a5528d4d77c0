pub mod auth;
pub mod livro;
pub mod middleware;
pub mod rest;
pub mod state;

// Re-export the handlers the binary wires into the router.
pub use auth::{callback_handler, logout_handler, magic_link_handler, session_handler};
pub use livro::{access_handler, chat_handler, redeem_handler};
pub use middleware::require_auth;
pub use rest::list_agents_handler;
