pub mod history;
pub mod message;
pub mod roster;
pub mod summary;
