pub mod directory;
pub mod login;
