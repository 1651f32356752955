pub mod enable;
pub mod partition;

pub use enable::EnableCommand;
pub use partition::{PartitionedArgs, partition_tokens};
