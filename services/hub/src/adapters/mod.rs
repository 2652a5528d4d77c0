pub mod chat_webhook;
pub mod entitlement_db;
pub mod session_gotrue;

pub use chat_webhook::WebhookChatAdapter;
pub use entitlement_db::EntitlementDbAdapter;
pub use session_gotrue::GoTrueSessionAdapter;
