pub mod dry_run;
pub mod etl;
pub mod pipeline;
pub mod source;

pub use crate::domain::model::{Record, Table, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
