pub mod bulletin;
pub mod category;
pub mod health;
