//! Wire models for both API generations.

pub mod cloudapi;
pub mod legacy;

pub use cloudapi::*;
pub use legacy::*;
