#[derive(Clone, Copy, Eq, Hash, PartialEq, Debug)]
pub enum FtpCommand {
    USER,
    CWD,
    LIST,
    PORT,
    LPRT,
    QUIT,
    RETR,
    TYPE,
    PWD,
    STOR,
}

impl FtpCommand {
    /// Matches a verb exactly as received; clients send them uppercase by
    /// convention and anything else is answered with 502 by the dispatcher.
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd {
            "USER" => Some(FtpCommand::USER),
            "CWD" => Some(FtpCommand::CWD),
            "LIST" => Some(FtpCommand::LIST),
            "PORT" => Some(FtpCommand::PORT),
            "LPRT" => Some(FtpCommand::LPRT),
            "QUIT" => Some(FtpCommand::QUIT),
            "RETR" => Some(FtpCommand::RETR),
            "TYPE" => Some(FtpCommand::TYPE),
            "PWD" => Some(FtpCommand::PWD),
            "STOR" => Some(FtpCommand::STOR),
            _ => None,
        }
    }
}
