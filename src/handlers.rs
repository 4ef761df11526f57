pub mod auth;
pub mod categories;
pub mod godowns;
pub mod products;
