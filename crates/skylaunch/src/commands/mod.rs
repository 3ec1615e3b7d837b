pub mod check;
pub mod config;
pub mod init;
pub mod launch;
pub mod usage;
