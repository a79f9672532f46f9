mod catalog;
mod client;
mod config;
mod error;
mod flag_value;
mod source;
mod summary;
mod test_common;
mod util;

pub use catalog::*;
pub use client::*;
pub use config::*;
pub use error::*;
pub use flag_value::*;
pub use source::*;
pub use summary::*;
pub use util::is_configured;
