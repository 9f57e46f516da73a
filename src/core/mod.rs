pub mod etl;
pub mod pipeline;
pub mod plan_index;
pub mod reader;
pub mod resolver;
pub mod writer;
pub mod zip_index;

pub use crate::domain::model::{SourceTables, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
