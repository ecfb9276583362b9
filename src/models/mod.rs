mod launch;
mod page;

pub use launch::*;
pub use page::*;
