#![allow(dead_code)]

pub mod doubles;
pub mod harness;
pub mod strategies;

pub use doubles::*;
pub use harness::*;
pub use strategies::*;
