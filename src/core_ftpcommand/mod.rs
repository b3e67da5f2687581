// Here's the list of the FTP commands implemented
pub mod user;
pub mod cwd;
pub mod pwd;
pub mod type_;
pub mod quit;
pub mod lprt;
pub mod list;
pub mod retr;
pub mod stor;
pub mod handlers;

// Command verb recognition
pub mod ftpcommand;
