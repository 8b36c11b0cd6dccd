pub mod error;
pub mod reporting;
pub mod service;
pub mod validation;

pub use error::*;
pub use reporting::*;
pub use service::*;
pub use validation::{DATE_FORMAT, ValidInput, parse_date, validate};
