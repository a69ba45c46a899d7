//! Command-line interface.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;

use crate::client::{Client, RetryPolicy};
use crate::config::{
    DEFAULT_INTERVAL_MILLIS, DEFAULT_OUTPUT_STEM, DEFAULT_RETRY_ATTEMPTS,
    DEFAULT_RETRY_INTERVAL_MILLIS,
};
use crate::error::Result;
use crate::export::{export, partial_output_path, Format};
use crate::pipeline::{CollectOptions, Collector};
use crate::schema::CityRecord;
use crate::tables::PrefectureTable;

/// Build master data of Japanese cities from RESAS-API.
///
/// It may take a few minutes because of waiting to avoid access restriction.
#[derive(Debug, Parser)]
#[command(name = "get_jp_cities")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// RESAS-API key
    pub api_key: String,

    /// Output file [default: jp_cities.json, or jp_cities.parquet with --format parquet]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    pub format: Format,

    /// Wait between prefectures in milliseconds
    #[arg(long, default_value_t = DEFAULT_INTERVAL_MILLIS)]
    pub interval_ms: u64,

    /// Attempts per prefecture when rate limited (1 disables retrying)
    #[arg(long, default_value_t = DEFAULT_RETRY_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..))]
    pub attempts: u32,

    /// Only fetch this prefecture code (repeatable)
    #[arg(long = "pref", value_name = "CODE")]
    pub prefectures: Vec<u8>,
}

impl Cli {
    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            interval: Duration::from_millis(self.interval_ms),
            retry: RetryPolicy {
                attempts: self.attempts,
                interval: Duration::from_millis(DEFAULT_RETRY_INTERVAL_MILLIS),
            },
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!("{DEFAULT_OUTPUT_STEM}.{}", self.format.extension()))
        })
    }

    pub fn prefecture_table(&self) -> Result<PrefectureTable> {
        if self.prefectures.is_empty() {
            Ok(PrefectureTable::default())
        } else {
            PrefectureTable::only(&self.prefectures)
        }
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    run_from(std::env::args_os())
}

/// Run the CLI with the given arguments, program name first.
///
/// A missing or extra API key prints the usage and returns without doing
/// anything. Other argument errors exit through clap.
pub fn run_from<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if is_usage_error(e.kind()) => {
            e.print()?;
            eprintln!("Input API_KEY as a commandline argument.");
            return Ok(());
        }
        Err(e) => e.exit(),
    };
    download_command(&cli)
}

fn is_usage_error(kind: ClapErrorKind) -> bool {
    matches!(
        kind,
        ClapErrorKind::MissingRequiredArgument | ClapErrorKind::UnknownArgument
    )
}

fn download_command(cli: &Cli) -> Result<()> {
    let prefectures = cli.prefecture_table()?;
    let client = Client::new(cli.api_key.as_str())?;

    let result = Collector::new(&client)
        .with_prefectures(prefectures)
        .with_options(cli.collect_options())
        .collect();

    write_results(result, &cli.output_path(), cli.format)
}

/// Export a finished run, or the partial records of a failed one.
///
/// A failed run always returns its own error, even if saving the partial records fails.
fn write_results(result: Result<Vec<CityRecord>>, output: &Path, format: Format) -> Result<()> {
    match result {
        Ok(records) => {
            export(&records, output, format)?;
            println!("{} was created.", output.display());
            Ok(())
        }
        Err(err) => {
            if let Some(partial) = err.partial_records().filter(|p| !p.is_empty()) {
                let path = partial_output_path(output, format);
                match export(partial, &path, format) {
                    Ok(()) => eprintln!(
                        "Saved {} cities collected before the failure to {}",
                        partial.len(),
                        path.display()
                    ),
                    Err(export_err) => tracing::error!(
                        path = %path.display(),
                        error = %export_err,
                        "Failed to save partial results"
                    ),
                }
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parse_api_key_only() {
        let cli = Cli::parse_from(["get_jp_cities", "my-key"]);

        assert_eq!(cli.api_key, "my-key");
        assert_eq!(cli.output, None);
        assert_eq!(cli.output_path(), PathBuf::from("jp_cities.json"));
        assert_eq!(cli.format, Format::Json);
        assert_eq!(cli.collect_options(), CollectOptions::default());
        assert_eq!(
            cli.prefecture_table().expect("table"),
            PrefectureTable::default()
        );
    }

    #[test]
    fn test_cli_parse_options() {
        let cli = Cli::parse_from([
            "get_jp_cities",
            "my-key",
            "--output",
            "cities.parquet",
            "--format",
            "parquet",
            "--interval-ms",
            "500",
            "--attempts",
            "1",
            "--pref",
            "13",
            "--pref",
            "14",
        ]);

        assert_eq!(cli.output_path(), PathBuf::from("cities.parquet"));
        assert_eq!(cli.format, Format::Parquet);
        let options = cli.collect_options();
        assert_eq!(options.interval, Duration::from_millis(500));
        assert_eq!(options.retry.attempts, 1);
        let codes: Vec<u8> = cli
            .prefecture_table()
            .expect("table")
            .iter()
            .map(|(c, _)| c)
            .collect();
        assert_eq!(codes, vec![13, 14]);
    }

    #[test]
    fn test_cli_requires_exactly_one_key() {
        assert!(Cli::try_parse_from(["get_jp_cities"]).is_err());
        assert!(Cli::try_parse_from(["get_jp_cities", "a", "b"]).is_err());
    }

    #[test]
    fn test_cli_rejects_zero_attempts() {
        assert!(Cli::try_parse_from(["get_jp_cities", "key", "--attempts", "0"]).is_err());
    }

    #[test]
    fn test_cli_unknown_prefecture() {
        let cli = Cli::parse_from(["get_jp_cities", "key", "--pref", "48"]);
        assert!(matches!(
            cli.prefecture_table(),
            Err(Error::UnknownPrefecture(48))
        ));
    }

    #[test]
    fn test_parquet_default_output() {
        let cli = Cli::parse_from(["get_jp_cities", "key", "--format", "parquet"]);
        assert_eq!(cli.output_path(), PathBuf::from("jp_cities.parquet"));

        let cli = Cli::parse_from(["get_jp_cities", "key", "-f", "json"]);
        assert_eq!(cli.output_path(), PathBuf::from("jp_cities.json"));
    }

    #[test]
    fn test_wrong_argument_count_does_nothing() {
        // Both return before a client is built, so nothing is requested or written.
        assert!(run_from(["get_jp_cities"]).is_ok());
        assert!(run_from(["get_jp_cities", "a", "b"]).is_ok());
    }

    #[test]
    fn test_usage_errors() {
        let kind = |args: &[&str]| {
            Cli::try_parse_from(args)
                .map(|_| ())
                .expect_err("invalid arguments")
                .kind()
        };
        assert!(is_usage_error(kind(&["get_jp_cities"])));
        assert!(is_usage_error(kind(&["get_jp_cities", "a", "b"])));
        assert!(!is_usage_error(kind(&["get_jp_cities", "key", "--format", "xml"])));
        assert!(!is_usage_error(kind(&["get_jp_cities", "key", "--pref", "300"])));
        assert!(!is_usage_error(kind(&["get_jp_cities", "key", "--attempts", "0"])));
    }

    #[test]
    fn test_write_results_saves_partial() {
        let dir = tempdir().expect("temp dir");
        let output = dir.path().join("jp_cities.json");
        let err = Error::Interrupted {
            prefecture_code: 2,
            partial: vec![CityRecord::new("01202", "函館市", "北海道", "北海道・東北")],
            source: Box::new(Error::RateLimit),
        };

        let result = write_results(Err(err), &output, Format::Json);

        assert!(matches!(result, Err(Error::Interrupted { .. })));
        assert!(!output.exists());
        let saved = std::fs::read_to_string(dir.path().join("jp_cities.partial.json"))
            .expect("partial file");
        assert_eq!(saved, r#"[["01202","函館市","北海道","北海道・東北"]]"#);
    }

    #[test]
    fn test_write_results_keeps_cause_when_partial_save_fails() {
        let dir = tempdir().expect("temp dir");
        let output = dir.path().join("missing").join("jp_cities.json");
        let err = Error::Interrupted {
            prefecture_code: 2,
            partial: vec![CityRecord::new("01202", "函館市", "北海道", "北海道・東北")],
            source: Box::new(Error::Auth),
        };

        let result = write_results(Err(err), &output, Format::Json);

        let err = result.expect_err("collection error");
        assert!(matches!(err.root(), Error::Auth), "got {err}");
    }

    #[test]
    fn test_write_results_success() {
        let dir = tempdir().expect("temp dir");
        let output = dir.path().join("cities.json");
        let records = vec![CityRecord::new("13101", "千代田区", "東京都", "関東地方")];

        write_results(Ok(records), &output, Format::Json).expect("write");

        assert_eq!(
            std::fs::read_to_string(&output).expect("read"),
            r#"[["13101","千代田区","東京都","関東地方"]]"#
        );
    }
}
