pub mod category;
pub mod product;
pub mod product_image;
pub mod user;

pub use category::Category;
pub use product::{OwnerSummary, Product, ProductListing};
pub use product_image::ProductImage;
pub use user::User;
