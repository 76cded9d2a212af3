pub mod task;
pub mod user;

pub use task::{NewTask, PatchTask, Task};
pub use user::{PatchUser, RegisterUser, User, UserResponse};
