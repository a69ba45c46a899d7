//! Master data of Japanese cities, built from RESAS-API.
//!
//! Every prefecture's city list is fetched from
//! `https://opendata.resas-portal.go.jp/api/v1/cities?prefCode=N`, the
//! aggregate rows of ordinance-designated cities are dropped, and each city
//! is tagged with its prefecture and region:
//!
//! ```
//! use jp_cities::{CityRecord, RegionTable};
//!
//! let region = RegionTable::default().classify(13101);
//! assert_eq!(region, Some("関東地方"));
//!
//! let record = CityRecord::new("13101", "千代田区", "東京都", "関東地方");
//! assert_eq!(
//!     serde_json::to_string(&record).unwrap(),
//!     r#"["13101","千代田区","東京都","関東地方"]"#
//! );
//! ```
//!
//! Fetching all 47 prefectures takes a while because requests are spaced
//! out to avoid RESAS access restriction.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod region;
pub mod schema;
pub mod tables;
pub mod validate;

use std::path::Path;

pub use client::{Client, Fetch, RetryPolicy};
pub use error::{Error, ErrorKind, Result};
pub use export::Format;
pub use pipeline::{CollectOptions, Collector};
pub use region::RegionTable;
pub use schema::CityRecord;
pub use tables::PrefectureTable;

/// Collect every city of Japan with the default options.
pub fn get_cities(api_key: &str) -> Result<Vec<CityRecord>> {
    let client = Client::new(api_key)?;
    Collector::new(&client).collect()
}

/// Collect every city of Japan and write them to `file_name` as JSON.
///
/// Returns the number of cities written.
pub fn get_json(file_name: impl AsRef<Path>, api_key: &str) -> Result<usize> {
    let records = get_cities(api_key)?;
    export::write_json(&records, file_name.as_ref())?;
    tracing::info!(file = %file_name.as_ref().display(), cities = records.len(), "Wrote cities");
    Ok(records.len())
}
