pub mod clause;
pub mod dialect;
pub mod document;
