//! Stage instruction rendering

mod factory;

pub use factory::{TaskError, TaskFactory};
