//! Domain records persisted through the store contracts.

pub mod session;
pub mod user;

pub use session::Session;
pub use user::User;
