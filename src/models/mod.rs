pub mod user;

pub use user::{filter_users, SearchField, User, UserPage, UserUpdate};
