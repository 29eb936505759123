//! Client for the next-token prediction oracle

mod client;
mod config;
mod error;
mod limiter;
mod mock;

pub use client::{parse_completion, HttpOracle, OracleClient};
pub use config::OracleConfig;
pub use error::{OracleError, Recovery};
pub use limiter::RateLimiter;
pub use mock::MockOracle;

use hud_core::Distribution;
use std::future::Future;

/// Anything that can return the top-K distribution for the token after a prefix
pub trait Oracle {
    fn predict(
        &self,
        prefix: &str,
    ) -> impl Future<Output = Result<Distribution, OracleError>> + Send;
}
