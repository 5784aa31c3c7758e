//! Input data: per-year news partitions and the audio feature table.

mod features;
mod partition;

pub use features::{load_feature_table, FeatureRow, FeatureTable};
pub use partition::PartitionStore;
