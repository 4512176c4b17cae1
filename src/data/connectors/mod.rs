mod csv;
mod types;
mod validator;

pub use csv::CsvConnector;
pub use types::PriceTableMetadata;
pub use validator::DataValidator;
