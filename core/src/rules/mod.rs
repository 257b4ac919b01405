pub use placement::*;
pub use win::*;

mod placement;
mod win;
