pub mod csv_table;
pub mod error;
pub mod logger;
pub mod monitor;
pub mod validation;
