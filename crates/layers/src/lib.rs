pub mod classify;
pub mod dots;
pub mod symbology;

pub use classify::*;
pub use dots::*;
pub use symbology::*;
