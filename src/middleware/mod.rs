pub mod exists;
pub mod session;

pub use exists::{category_exists, product_exists, LoadedCategory, LoadedProduct};
pub use session::{protect_session, SessionUser};
