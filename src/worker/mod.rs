//! Worker Lambda handler and task processing

pub mod handler;
pub mod process;

// Re-export the main handler for convenience
pub use handler::{WorkerContext, function_handler as handler};
pub use process::process_task;
