// src/constants.rs

use std::time::Duration;

// Canned reply texts. Codes are supplied at the call site so a reply line
// always reads `<code> <text>` on the wire.
pub const MSG_GREETING: &str = "Service ready.";
pub const MSG_OK: &str = "OK";
pub const MSG_CLOSING_CONTROL: &str = "Service closing control connection.";
pub const MSG_CANT_OPEN_DATA: &str = "Can't open data connection.";
pub const MSG_TRANSFER_ABORTED: &str = "Connection closed; transfer aborted.";
pub const MSG_SYNTAX_ERROR: &str = "Syntax error in parameters or arguments.";
pub const MSG_NOT_IMPLEMENTED: &str = "Command not implemented.";
pub const MSG_PARAM_NOT_IMPLEMENTED: &str = "Command not implemented for that parameter.";
pub const MSG_FILE_UNAVAILABLE: &str = "File unavailable.";

pub const TRANSFER_BUFFER_SIZE: usize = 8192;

// Longest accepted control line; a line still missing its newline at the
// cap ends the session.
pub const MAX_COMMAND_LINE: u64 = 64 * 1024;

// A stalled peer must not hold a session task and its handles forever.
pub const DATA_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DATA_IO_TIMEOUT: Duration = Duration::from_secs(60);
pub const CONTROL_IDLE_TIMEOUT: Duration = Duration::from_secs(300);
