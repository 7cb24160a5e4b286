pub mod common;
pub mod list;
pub mod parse;
