pub mod connectors;

pub use connectors::{CsvConnector, DataValidator, PriceTableMetadata};
