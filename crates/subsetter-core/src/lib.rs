mod error;
pub use error::Error;

pub mod extraction;
pub use extraction::ExtractionModel;

pub mod restriction;
pub use restriction::Restrictions;

pub mod schema;
pub use schema::Schema;

/// A Result type alias that uses the subsetter [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
