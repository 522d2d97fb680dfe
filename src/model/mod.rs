pub mod draft;
pub mod task;

pub use draft::{TaskDraft, TaskPatch};
pub use task::{date_component, EntityId, Page, Priority, Task, TaskId};
