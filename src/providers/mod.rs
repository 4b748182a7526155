//! Quota provider implementations

pub mod quickcheck;

pub use quickcheck::{QuickCheckProvider, QUICKCHECK_URL};
