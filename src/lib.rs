pub mod error;
pub mod model;
pub mod registry;
pub mod validate;
pub mod wasm;
