//! One module per subcommand.

pub mod completions;
pub mod dump;
pub mod mounts;
