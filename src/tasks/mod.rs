//! Background tasks module
//!
//! This module contains the session task and the tasks that feed it input and
//! render its output.

pub mod input_reader;
pub mod session_task;
pub mod status_renderer;
pub mod ticker;

// Re-export main functions
pub use input_reader::input_reader_task;
pub use session_task::session_task;
pub use status_renderer::status_renderer_task;
pub use ticker::IntervalTicker;
