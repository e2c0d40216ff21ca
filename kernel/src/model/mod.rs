pub mod author;
pub mod book;
pub mod borrow;
pub mod id;
pub mod list;
