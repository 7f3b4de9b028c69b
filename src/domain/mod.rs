// Domain layer - Models and error types

pub mod errors;
pub mod model;
