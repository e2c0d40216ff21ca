pub mod author;
pub mod book;
pub mod borrow;
pub mod health;
