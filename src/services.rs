pub mod session;
pub use session::SessionStore;
pub mod product_table;
pub use product_table::ProductTable;
pub mod product_form;
pub use product_form::ProductForm;
pub mod export;
