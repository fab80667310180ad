pub mod auth;
pub mod bulletin;
pub mod category;
pub mod shared;
