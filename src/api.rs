pub mod client;
pub use client::ApiClient;
pub mod wire;
pub mod auth_api;
pub use auth_api::AuthApi;
pub mod product_api;
pub use product_api::{ProductApi, ProductSearchParams};
pub mod category_api;
pub use category_api::CategoryApi;
pub mod godown_api;
pub use godown_api::GodownApi;
