pub mod component;
pub mod env;
pub mod signal;
pub mod tracer;
