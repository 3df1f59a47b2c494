//! Terminal output: status lines and the step progress bar

pub mod console;
pub mod progress;
