pub mod projection;
pub mod rotation;
pub mod vec;

pub use projection::*;
pub use rotation::*;
pub use vec::*;
