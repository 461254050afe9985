pub mod config;
pub mod hardware;
pub mod input;
pub mod kernel;
pub mod memory;
pub mod paging;
pub mod process;
pub mod queue;
pub mod stats;
pub mod transcript;
pub mod workload;
