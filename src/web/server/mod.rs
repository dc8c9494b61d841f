mod errors;
mod service;
mod setup;

pub use setup::*;
