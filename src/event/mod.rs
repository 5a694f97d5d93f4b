//! Log event data model.
//!
//! - `level` - severities shared by both front-ends
//! - `value` - field values, including captured errors
//! - `dict` - the event mapping and its reserved keys

pub mod dict;
pub mod level;
pub mod value;

pub use dict::*;
pub use level::*;
pub use value::*;
