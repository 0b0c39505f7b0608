pub mod assistant;
pub mod client;
pub mod session;

pub use assistant::*;
pub use client::*;
pub use session::*;
