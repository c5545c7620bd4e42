pub mod artifacts;
pub mod dataset;
pub mod error;
pub mod fields;
pub mod io;
pub mod levels;
pub mod registry;

pub use artifacts::*;
pub use dataset::*;
pub use error::*;
pub use fields::*;
pub use levels::*;
pub use registry::*;
