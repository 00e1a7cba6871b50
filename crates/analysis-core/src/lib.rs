pub mod error;
pub mod format;
pub mod returns;
pub mod symbols;
pub mod traits;
pub mod types;

pub use error::*;
pub use traits::*;
pub use types::*;
