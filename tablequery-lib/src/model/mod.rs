//! Data model types

mod column;
mod record;
mod result_set;

pub use column::*;
pub use record::*;
pub use result_set::*;
