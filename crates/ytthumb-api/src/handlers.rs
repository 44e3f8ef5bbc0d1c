//! Request handlers.

pub mod health;
pub mod thumbnails;

pub use health::*;
pub use thumbnails::*;
