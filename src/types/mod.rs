// ABOUTME: Validated domain types for remote log access and uploads.
// ABOUTME: Constructors reject invalid input before it reaches a command or key string.

mod container_name;
mod object_key;

pub use container_name::{ContainerName, ContainerNameError};
pub use object_key::{ObjectKey, ObjectKeyError};
