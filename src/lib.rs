#![warn(clippy::pedantic)]
// Noisy doc/signature lints
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
// Style preference: keeping format!("{}", x) over format!("{x}") for readability with complex exprs
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod misskey;
pub mod publisher;
pub mod relay;
pub mod twitter;
pub(crate) mod utils;

/// Re-exports for fuzz targets. Not part of the public API.
#[doc(hidden)]
pub mod fuzz_api {
    pub use crate::config::VideoStrategy;
    pub use crate::misskey::Payload;
    pub use crate::relay::composer::compose;
    pub use crate::relay::filter::secret_matches;
    pub use crate::relay::planner::plan_media;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
