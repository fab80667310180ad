pub mod jwt;
pub mod role;

pub use jwt::{Claims, JwtManager};
pub use role::Role;
