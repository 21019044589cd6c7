pub mod fetch;
pub mod loader;
pub mod source;

pub use fetch::*;
pub use loader::*;
pub use source::*;
