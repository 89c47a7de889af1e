pub mod edge;
pub mod error;
pub mod id;
pub mod parents;

pub use edge::*;
pub use error::*;
pub use id::*;
pub use parents::*;
