//! Core data models, calculations and traits

mod bytes;
mod clock;
mod error;
mod provider;
mod quota;
mod report;

pub use bytes::*;
pub use clock::*;
pub use error::*;
pub use provider::*;
pub use quota::*;
pub use report::*;
