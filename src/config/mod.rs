//! JSON run configurations for the command-line tools.

pub mod scan;
