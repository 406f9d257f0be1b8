mod get;
mod load;

pub use get::*;
pub use load::*;
