//! Domain layer - Core business entities and logic
//!
//! The user record and the password value object. Nothing here touches the
//! database or HTTP.

pub mod password;
pub mod user;

pub use password::{Password, WorkFactor};
pub use user::{NewUser, User, UserResponse};
