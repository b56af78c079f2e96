//! Data models shared by the auth core and the web front.

mod identity;

pub use identity::{Avatar, Identity, Role};
