// the "load more" side of the lists, driven from rust instead of the page scripts
mod error;
mod pager;
mod renderer;
mod transport;

pub use error::*;
pub use pager::*;
pub use renderer::*;
pub use transport::*;
