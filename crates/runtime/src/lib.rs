pub mod config;
pub mod frame;
pub mod graticule;
pub mod interaction;
pub mod render;
pub mod render_loop;
pub mod view;

pub use config::*;
pub use frame::*;
pub use graticule::*;
pub use interaction::*;
pub use render::*;
pub use render_loop::*;
pub use view::*;
