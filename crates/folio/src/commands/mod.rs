pub mod bake;
pub mod dev;
pub mod init;
pub mod serve;
