pub mod user;

pub use user::{CreateUserRequest, NewUser, User, DEFAULT_ROLE};
