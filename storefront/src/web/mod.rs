// storefront/src/web/mod.rs

pub mod extractors;
pub mod handlers;
pub mod routes;

pub use routes::configure_app_routes;

#[cfg(test)]
pub(crate) mod test_support;
