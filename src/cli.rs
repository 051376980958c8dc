//! Command-line parsing.
//!
//! `crabline <host> <port> <nickname> <channel> [<account> <password>] -tls`

use crate::irc::handshake::Credentials;
use thiserror::Error;

pub const USAGE: &str = "\
Usage: crabline <host> <port> <nickname> <channel> [<account> <password>] -tls
Example: crabline irc.libera.chat 6697 nick \"#ricecakes\" my_libera_account my_password -tls
Example (no authentication): crabline irc.libera.chat 6697 nick \"#channel\" -tls";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub host: String,
    pub port: u16,
    pub nickname: String,
    pub channel: String,
    pub credentials: Option<Credentials>,
    pub tls: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("help requested")]
    Help,
    #[error("the -tls flag is required")]
    MissingTls,
    #[error("expected <host> <port> <nickname> <channel>")]
    MissingArguments,
    #[error("an account needs a password")]
    MissingPassword,
    #[error("unexpected argument '{0}'")]
    Unexpected(String),
    #[error("invalid port '{0}'")]
    InvalidPort(String),
    #[error("the nickname must not be empty")]
    EmptyNickname,
}

/// Parse arguments, excluding the program name.
pub fn parse_args<I, S>(args: I) -> Result<CliArgs, UsageError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut tls = false;
    let mut positional = Vec::new();
    for arg in args {
        let arg = arg.into();
        match arg.as_str() {
            "-tls" | "--tls" => tls = true,
            "-h" | "--help" => return Err(UsageError::Help),
            _ => positional.push(arg),
        }
    }

    if positional.len() < 4 {
        return Err(UsageError::MissingArguments);
    }
    if !tls {
        return Err(UsageError::MissingTls);
    }

    let mut rest = positional.into_iter();
    let host = rest.next().unwrap_or_default();
    let port_str = rest.next().unwrap_or_default();
    let port = port_str
        .parse::<u16>()
        .map_err(|_| UsageError::InvalidPort(port_str.clone()))?;
    let nickname = rest.next().unwrap_or_default();
    if nickname.trim().is_empty() {
        return Err(UsageError::EmptyNickname);
    }
    let channel = rest.next().unwrap_or_default();

    let credentials = match (rest.next(), rest.next()) {
        (Some(account), Some(password)) => Some(Credentials { account, password }),
        (Some(_), None) => return Err(UsageError::MissingPassword),
        _ => None,
    };
    if let Some(extra) = rest.next() {
        return Err(UsageError::Unexpected(extra));
    }

    Ok(CliArgs {
        host,
        port,
        nickname,
        channel,
        credentials,
        tls,
    })
}
