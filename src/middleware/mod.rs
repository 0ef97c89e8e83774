mod auth;
mod request_id;

pub use auth::admin_auth_middleware;
pub use request_id::request_id_middleware;
