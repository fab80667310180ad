pub mod middleware;
pub mod request_id;

pub use middleware::{auth_middleware, AuthUser};
pub use request_id::{current_request_id, request_id_middleware, X_REQUEST_ID};
