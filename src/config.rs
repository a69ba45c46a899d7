//! Constants shared by the client, the pipeline and the CLI.

/// Base URL of RESAS-API v1. Category paths are appended verbatim.
pub const RESAS_API_BASE_URL: &str = "https://opendata.resas-portal.go.jp/api/v1/";

/// Category path listing the cities of one prefecture (`?prefCode=` follows).
pub const CITIES_PATH: &str = "cities";

/// Stem of the file written by the command line tool when no output is given.
///
/// The extension follows the format, so JSON output goes to `jp_cities.json`.
pub const DEFAULT_OUTPUT_STEM: &str = "jp_cities";

/// Wait between two prefecture requests, to stay under the RESAS rate limit.
pub const DEFAULT_INTERVAL_MILLIS: u64 = 200;

/// Total attempts per prefecture for rate-limited or empty responses.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Base delay before the first retry. Doubles on every further attempt.
pub const DEFAULT_RETRY_INTERVAL_MILLIS: u64 = 1000;

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// `bigCityFlag` of the aggregate row RESAS returns for an ordinance-designated city.
///
/// The wards of such a city are listed separately, so the aggregate row is a duplicate.
pub const BIG_CITY_AGGREGATE_FLAG: &str = "2";

/// User agent string identifying this client.
pub const USER_AGENT: &str = concat!("jp-cities/", env!("CARGO_PKG_VERSION"));
