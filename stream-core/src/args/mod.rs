//! Command-line arguments of the producer.
//!
//! Three positionals name the order stream, the trade stream and the region.
//! Argument errors exit with status 1 so every startup failure shares the
//! same exit code; `--help` and `--version` keep clap's own handling.

use clap::error::ErrorKind;
use clap::Parser;

/// Process exit status for an argument parse result.
///
/// `--help` and `--version` succeed; any other parse error is a startup
/// failure (clap itself would exit with 2).
pub fn usage_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Holds the configuration parsed from the command line.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "order-feed",
    version,
    about = "Publishes random stock orders and trades to two streams",
    long_about = None
)]
pub struct ProducerArgs {
    /// Name of the stream receiving orders
    order_stream: String,

    /// Name of the stream receiving trades
    trade_stream: String,

    /// AWS region hosting both streams (e.g. us-west-2)
    region: String,

    /// Override the service endpoint (e.g. http://localhost:4566 for a local emulator)
    #[arg(long)]
    endpoint: Option<String>,
}

impl ProducerArgs {
    /// Parses arguments, returning clap's error untouched.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        ProducerArgs::try_parse_from(args)
    }

    /// Parses arguments from the process environment.
    ///
    /// Prints usage and exits with status 1 on bad input.
    pub fn parse_or_exit() -> Self {
        match ProducerArgs::try_parse() {
            Ok(args) => args,
            Err(e) => {
                let _ = e.print();
                std::process::exit(usage_exit_code(&e));
            }
        }
    }

    pub fn get_order_stream(&self) -> &str {
        &self.order_stream
    }

    pub fn get_trade_stream(&self) -> &str {
        &self.trade_stream
    }

    pub fn get_region(&self) -> &str {
        &self.region
    }

    pub fn get_endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_three_positionals() {
        let args =
            ProducerArgs::try_parse_args(["order-feed", "orders", "trades", "us-west-2"]).unwrap();
        assert_eq!(args.get_order_stream(), "orders");
        assert_eq!(args.get_trade_stream(), "trades");
        assert_eq!(args.get_region(), "us-west-2");
        assert_eq!(args.get_endpoint(), None);
    }

    #[test]
    fn test_parses_endpoint_override() {
        let args = ProducerArgs::try_parse_args([
            "order-feed",
            "orders",
            "trades",
            "us-east-1",
            "--endpoint",
            "http://localhost:4566",
        ])
        .unwrap();
        assert_eq!(args.get_endpoint(), Some("http://localhost:4566"));
    }

    #[test]
    fn test_usage_exit_codes() {
        let too_few = ProducerArgs::try_parse_args(["order-feed", "orders"]).unwrap_err();
        assert_eq!(usage_exit_code(&too_few), 1);

        let too_many =
            ProducerArgs::try_parse_args(["order-feed", "a", "b", "us-west-2", "c"]).unwrap_err();
        assert_eq!(usage_exit_code(&too_many), 1);

        let help = ProducerArgs::try_parse_args(["order-feed", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&help), 0);

        let version = ProducerArgs::try_parse_args(["order-feed", "--version"]).unwrap_err();
        assert_eq!(usage_exit_code(&version), 0);
    }

    #[test]
    fn test_rejects_wrong_argument_count() {
        assert!(ProducerArgs::try_parse_args(["order-feed", "orders", "trades"]).is_err());
        assert!(ProducerArgs::try_parse_args(["order-feed"]).is_err());
        assert!(
            ProducerArgs::try_parse_args(["order-feed", "a", "b", "us-west-2", "extra"]).is_err()
        );
    }
}
