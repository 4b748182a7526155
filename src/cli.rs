//! Command-line interface

use clap::Parser;
use url::Url;

use crate::providers::QUICKCHECK_URL;

/// Report the mobile data quota of the current billing period
#[derive(Debug, Parser)]
#[command(name = "gigatraffic", version, about)]
pub struct Cli {
    /// Status page to scrape
    #[arg(long, default_value = QUICKCHECK_URL)]
    pub url: Url,

    /// HTTP request timeout in seconds
    #[arg(
        long,
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Print the report as JSON instead of a sentence
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit log records as JSON
    #[arg(long)]
    pub json_output: bool,
}

/// Process exit codes
pub mod exit_codes {
    use crate::core::QuotaError;

    pub const SUCCESS: i32 = 0;
    pub const UNEXPECTED_FAILURE: i32 = 1;
    pub const TRANSPORT_FAILURE: i32 = 2;
    pub const HTTP_STATUS: i32 = 3;
    pub const PAGE_ERROR: i32 = 4;
    pub const NOT_COMPUTABLE: i32 = 5;

    /// Map an error chain to the exit code of its root quota error
    pub fn for_error(e: &anyhow::Error) -> i32 {
        match e.downcast_ref::<QuotaError>() {
            Some(QuotaError::Transport(_)) => TRANSPORT_FAILURE,
            Some(QuotaError::HttpStatus(_)) => HTTP_STATUS,
            Some(QuotaError::Parse(_)) | Some(QuotaError::Layout { .. }) => PAGE_ERROR,
            Some(QuotaError::NoElapsedTime { .. }) => NOT_COMPUTABLE,
            None => UNEXPECTED_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QuotaError;
    use anyhow::Context;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_ignore_environment() {
        let command = Cli::command();
        assert!(command.get_arguments().all(|arg| arg.get_env().is_none()));

        let cli = Cli::try_parse_from(["gigatraffic"]).unwrap();
        assert_eq!(cli.url.as_str(), QUICKCHECK_URL);
        assert_eq!(cli.timeout, 30);
        assert!(!cli.json);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "gigatraffic",
            "--url",
            "http://127.0.0.1:8080/status",
            "--timeout",
            "5",
            "--json",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.url.as_str(), "http://127.0.0.1:8080/status");
        assert_eq!(cli.timeout, 5);
        assert!(cli.json);
        assert!(cli.verbose);
        assert!(!cli.json_output);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["gigatraffic", "--url", "not a url"]).is_err());
        assert!(Cli::try_parse_from(["gigatraffic", "--timeout", "0"]).is_err());
    }

    #[test]
    fn test_exit_code_per_error_kind() {
        let cases = [
            (QuotaError::HttpStatus(503), exit_codes::HTTP_STATUS),
            (QuotaError::Parse("empty".into()), exit_codes::PAGE_ERROR),
            (QuotaError::layout("table #1 not found"), exit_codes::PAGE_ERROR),
            (
                QuotaError::NoElapsedTime {
                    start: chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                },
                exit_codes::NOT_COMPUTABLE,
            ),
        ];
        for (error, code) in cases {
            let wrapped = Err::<(), _>(error)
                .context("retrieving quota from QuickCheck")
                .unwrap_err();
            assert_eq!(exit_codes::for_error(&wrapped), code);
        }
    }

    #[test]
    fn test_error_chain_names_each_stage_once() {
        let e = Err::<(), _>(QuotaError::HttpStatus(503))
            .context("retrieving quota from QuickCheck")
            .unwrap_err();
        assert_eq!(
            format!("{:#}", e),
            "retrieving quota from QuickCheck: fetching quota page: got HTTP 503, expected 200"
        );
    }

    #[test]
    fn test_unrelated_error_is_unexpected() {
        let e = anyhow::anyhow!("runtime went away");
        assert_eq!(exit_codes::for_error(&e), exit_codes::UNEXPECTED_FAILURE);
    }
}
