//! Data module - CSV loading, typed schema and cleaning

pub mod loader;
pub mod processor;
pub mod schema;

pub use loader::{DataLoader, DataSource, FallbackSource, LoadedDataset, LoaderError};
pub use processor::{
    AgeGroup, CleanTable, CleaningOptions, CleaningReport, DataCleaner, FareGroup,
};
pub use schema::{Nullable, PassengerTable, Pclass, SchemaError};
