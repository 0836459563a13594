pub mod label;
pub mod project;
pub mod stats;
pub mod task;

#[cfg(test)]
#[path = "label_test.rs"]
mod label_test;

#[cfg(test)]
#[path = "project_test.rs"]
mod project_test;


#[cfg(test)]
#[path = "task_test.rs"]
mod task_test;
