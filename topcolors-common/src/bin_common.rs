pub mod init;
pub mod rc_file;
pub mod termination;
