pub mod check;
pub mod init;
pub mod parse_log;

pub use check::*;
pub use init::*;
pub use parse_log::*;
