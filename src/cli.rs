//! Command-line interface for session-tokens.
//!
//! Uses lexopt for minimal binary size overhead (~34KB).

use std::ffi::OsString;
use std::path::PathBuf;

use thiserror::Error;

use crate::crypt::SalterPolicy;

/// Command-line arguments.
#[derive(Debug, Clone)]
pub struct Args {
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Token generation policy (overrides config file).
    pub policy: Option<SalterPolicy>,
    /// Static salt (overrides config file).
    pub salt: Option<String>,
    /// Number of tokens to mint.
    pub count: usize,
    /// Session lifetime in milliseconds (overrides config file).
    pub ttl_ms: Option<u64>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: None,
            policy: None,
            salt: None,
            count: 1,
            ttl_ms: None,
            log_level: None,
            version: false,
            help: false,
        }
    }
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('P') | Long("policy") => {
                let value: String = parser.value()?.parse()?;
                result.policy = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("policy", value))?,
                );
            }
            Short('s') | Long("salt") => {
                result.salt = Some(parser.value()?.parse()?);
            }
            Short('n') | Long("count") => {
                let value: String = parser.value()?.parse()?;
                result.count = match value.parse() {
                    Ok(n) if n > 0 => n,
                    _ => return Err(ArgsError::InvalidValue("count", value)),
                };
            }
            Short('t') | Long("ttl-ms") => {
                let value: String = parser.value()?.parse()?;
                result.ttl_ms = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("ttl-ms", value))?,
                );
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"session-tokens {version}
Mint short-lived, unguessable session tokens

USAGE:
    session-tokens [OPTIONS]

OPTIONS:
    -c, --config <FILE>     Path to configuration file (JSON)
    -P, --policy <POLICY>   Token generation policy: fast, secure [default: secure]
    -s, --salt <SALT>       Static salt mixed into every token
    -n, --count <N>         Number of tokens to mint [default: 1]
    -t, --ttl-ms <MS>       Session lifetime in milliseconds [default: 1800000]
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
    -h, --help              Print help
    -V, --version           Print version

ENVIRONMENT VARIABLES:
    SESSION_TOKENS_POLICY     Token generation policy (overrides config)
    SESSION_TOKENS_SALT       Static salt (overrides config)
    SESSION_TOKENS_TTL_MS     Session lifetime (overrides config)
    SESSION_TOKENS_LOG_LEVEL  Log level (overrides config)
    RUST_LOG                  Alternative log level setting

EXAMPLES:
    # Mint one token with the secure policy
    session-tokens -s my-static-salt

    # Mint 1000 tokens with the fast policy and report timing
    session-tokens -P fast -n 1000 -l debug

    # Use a config file
    session-tokens -c /etc/session-tokens/config.json
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("session-tokens {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug, Error)]
pub enum ArgsError {
    /// Lexopt parsing error.
    #[error("{0}")]
    Lexopt(#[from] lexopt::Error),
    /// Invalid argument value.
    #[error("invalid value for --{0}: '{1}'")]
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    #[error("unexpected argument: '{0}'")]
    UnexpectedArgument(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<OsString> {
        std::iter::once("session-tokens")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_default_args() {
        let result = parse_args_from(args(&[])).unwrap();
        assert_eq!(result.count, 1);
        assert!(result.policy.is_none());
        assert!(result.salt.is_none());
    }

    #[test]
    fn test_policy() {
        let result = parse_args_from(args(&["-P", "fast"])).unwrap();
        assert_eq!(result.policy, Some(SalterPolicy::Fast));

        let result = parse_args_from(args(&["--policy", "secure"])).unwrap();
        assert_eq!(result.policy, Some(SalterPolicy::Secure));
    }

    #[test]
    fn test_invalid_policy() {
        let err = parse_args_from(args(&["-P", "weak"])).unwrap_err();
        assert!(err.to_string().contains("--policy"));
    }

    #[test]
    fn test_salt_and_count() {
        let result = parse_args_from(args(&["-s", "abc123", "-n", "25"])).unwrap();
        assert_eq!(result.salt, Some("abc123".to_string()));
        assert_eq!(result.count, 25);
    }

    #[test]
    fn test_zero_count_rejected() {
        assert!(parse_args_from(args(&["-n", "0"])).is_err());
        assert!(parse_args_from(args(&["--count", "many"])).is_err());
    }

    #[test]
    fn test_ttl() {
        let result = parse_args_from(args(&["--ttl-ms", "10"])).unwrap();
        assert_eq!(result.ttl_ms, Some(10));

        assert!(parse_args_from(args(&["-t", "-5"])).is_err());
    }

    #[test]
    fn test_config_file() {
        let result = parse_args_from(args(&["-c", "/etc/config.json"])).unwrap();
        assert_eq!(result.config, Some(PathBuf::from("/etc/config.json")));
    }

    #[test]
    fn test_help_flag() {
        let result = parse_args_from(args(&["-h"])).unwrap();
        assert!(result.help);

        let result = parse_args_from(args(&["--help"])).unwrap();
        assert!(result.help);
    }

    #[test]
    fn test_version_flag() {
        let result = parse_args_from(args(&["-V"])).unwrap();
        assert!(result.version);
    }

    #[test]
    fn test_log_level() {
        let result = parse_args_from(args(&["-l", "debug"])).unwrap();
        assert_eq!(result.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_unexpected_positional() {
        let err = parse_args_from(args(&["mint"])).unwrap_err();
        assert!(matches!(err, ArgsError::UnexpectedArgument(ref a) if a == "mint"));
    }
}
