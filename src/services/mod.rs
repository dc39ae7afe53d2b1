pub mod auth;
pub mod categories;
pub mod image_store;
pub mod products;

pub use auth::AuthService;
pub use categories::CategoryService;
pub use products::{NewProduct, ProductPatch, ProductService};
