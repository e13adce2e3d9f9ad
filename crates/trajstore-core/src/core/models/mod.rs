//! Data models shared by the parser, the store and the workflows.

pub mod atom;
pub mod trajectory;
