pub mod calculation;
pub mod chat;
pub mod error;
pub mod offence;

pub use calculation::*;
pub use chat::*;
pub use error::*;
pub use offence::*;
