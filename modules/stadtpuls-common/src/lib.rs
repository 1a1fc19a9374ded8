pub mod catalog;
pub mod error;
pub mod locations;
pub mod types;

pub use catalog::EventCatalog;
pub use error::StadtpulsError;
pub use locations::*;
pub use types::*;
