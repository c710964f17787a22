pub mod entities;
pub mod enums;
pub mod repositories;
pub mod source;

pub use entities::*;
pub use enums::*;
