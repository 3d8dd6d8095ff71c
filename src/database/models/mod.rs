pub mod gift;
pub mod product;
pub mod user;

pub use gift::StoredBundle;
pub use product::Product;
pub use user::{PublicUser, User};
