pub mod listing;
pub mod upload;

pub use listing::*;
pub use upload::*;
