//! Database model exports.

pub mod event;
pub mod fee;
pub mod registration;
pub mod user;

pub use event::Event;
pub use fee::Fee;
pub use registration::RegisteredEvent;
pub use user::User;
