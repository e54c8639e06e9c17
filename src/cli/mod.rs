mod root;
pub use root::{parse, BootstrapCommand};
