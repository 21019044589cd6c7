pub mod boundary;
pub mod country;
pub mod topology;

pub use boundary::*;
pub use country::*;
pub use topology::*;
