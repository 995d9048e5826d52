mod task;

pub use task::{Task, TaskDto, TaskStatus, TaskStatusRequest, UnknownStatus};
