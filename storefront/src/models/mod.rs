// storefront/src/models/mod.rs

//! Catalog entities read by the product routes. Cart entities live in `wingtip_cart`.

pub mod category;
pub mod product;

pub use category::Category;
pub use product::Product;
