pub mod local;

pub use local::CatalogLocalClient;
