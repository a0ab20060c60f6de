pub mod report;

pub use report::{run, Config};
