pub use anyhow;

mod doc_map;
mod template;
pub use template::*;
