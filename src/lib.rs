pub mod dataset_pipeline;
pub mod logger;
