//! Dataset loading, cleaning, and schema definition

pub mod loader;
pub mod schema;

pub use loader::{load, Dataset, DatasetError};
pub use schema::SchemaInfo;
