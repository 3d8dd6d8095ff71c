// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Routes here sit behind jwt_auth_middleware, which injects AuthUser into
// the request extensions.

pub mod auth;
pub mod gifts;
