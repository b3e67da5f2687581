use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_reply::ReplySender;
use crate::session::Session;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Mutex as TokioMutex;

// PORT parsing lives with the rest of the data-connection plumbing
use crate::core_network::port;

type CommandHandler = Box<
    dyn Fn(
            ReplySender,
            Arc<TokioMutex<Session>>,
            Vec<String>, // Command arguments, already split
        ) -> Pin<Box<dyn Future<Output = Result<(), std::io::Error>> + Send>>
        + Send
        + Sync,
>;

pub fn initialize_command_handlers() -> HashMap<FtpCommand, Arc<CommandHandler>> {
    let mut handlers: HashMap<FtpCommand, Arc<CommandHandler>> = HashMap::new();

    handlers.insert(
        FtpCommand::USER,
        Arc::new(Box::new(|replies, session, args| {
            Box::pin(crate::core_ftpcommand::user::handle_user_command(
                replies, session, args,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::CWD,
        Arc::new(Box::new(|replies, session, args| {
            Box::pin(crate::core_ftpcommand::cwd::handle_cwd_command(
                replies, session, args,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::PWD,
        Arc::new(Box::new(|replies, session, args| {
            Box::pin(crate::core_ftpcommand::pwd::handle_pwd_command(
                replies, session, args,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::TYPE,
        Arc::new(Box::new(|replies, session, args| {
            Box::pin(crate::core_ftpcommand::type_::handle_type_command(
                replies, session, args,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::QUIT,
        Arc::new(Box::new(|replies, session, args| {
            Box::pin(crate::core_ftpcommand::quit::handle_quit_command(
                replies, session, args,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::PORT,
        Arc::new(Box::new(|replies, session, args| {
            Box::pin(port::handle_port_command(replies, session, args))
        })),
    );

    handlers.insert(
        FtpCommand::LPRT,
        Arc::new(Box::new(|replies, session, args| {
            Box::pin(crate::core_ftpcommand::lprt::handle_lprt_command(
                replies, session, args,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::LIST,
        Arc::new(Box::new(|replies, session, args| {
            Box::pin(crate::core_ftpcommand::list::handle_list_command(
                replies, session, args,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::RETR,
        Arc::new(Box::new(|replies, session, args| {
            Box::pin(crate::core_ftpcommand::retr::handle_retr_command(
                replies, session, args,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::STOR,
        Arc::new(Box::new(|replies, session, args| {
            Box::pin(crate::core_ftpcommand::stor::handle_stor_command(
                replies, session, args,
            ))
        })),
    );

    handlers
}
