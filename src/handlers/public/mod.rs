// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Account creation, token acquisition, catalog reads and gift suggestions.
// The gift endpoint reads a Bearer token when one is sent but never requires it.

pub mod auth;
pub mod gifts;
pub mod products;
pub mod service;
