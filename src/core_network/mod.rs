pub mod network;
pub mod port;

#[cfg(test)]
mod test_session;
