pub mod check_files;
pub mod dispatch;
pub mod import;
pub mod init;
pub mod serve;
