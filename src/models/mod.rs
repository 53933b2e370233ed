pub mod category;
pub mod task;

pub use category::{Category, CreateCategoryRequest, NewCategory};
pub use task::{
    CreateTaskRequest, NewTask, Task, TaskFilter, TaskQuery, TaskStats, UpdateTaskRequest,
};
