pub mod builder;
pub mod decompose;
pub mod emitter;
pub mod handler;
pub mod node;
pub mod sargable;
