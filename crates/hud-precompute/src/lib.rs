//! One-pass precompute of cursor-indexed analysis results for replay

mod demo;
mod error;
mod io;
mod pipeline;
mod store;

pub use demo::DEMO_CODE_STATES;
pub use error::PrecomputeError;
pub use io::{atomic_write, read_json, write_json};
pub use pipeline::Pipeline;
pub use store::{
    DemoArtifact, DemoPosition, DemoState, DemoStates, PrecomputedStore, StateKey, StoreShape,
};
