//! The annotation pipeline as a single configurable processor.
//!
//! - [`core`]: `Annotator` implementation and stage ordering
//! - [`process`]: panic-safe wrappers used for best-effort stages
//! - [`types`]: configuration and the processor struct
pub mod core;
pub mod process;
pub mod types;

pub use process::process_safe;
pub use types::{AnnotateOptions, Annotator};
