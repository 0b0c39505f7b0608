pub mod aggregate;
pub mod dashboard;
pub mod export;
pub mod filter;
pub mod paginate;
pub mod sort;


pub use aggregate::*;
pub use dashboard::*;
pub use export::*;
pub use filter::*;
pub use paginate::*;
pub use sort::*;
