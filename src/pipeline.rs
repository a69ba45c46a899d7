//! The collection run: one request per prefecture, merged into one ordered list.

use std::thread;
use std::time::Duration;

use serde_json::Value;

use crate::client::{Fetch, RetryPolicy};
use crate::config::{CITIES_PATH, DEFAULT_INTERVAL_MILLIS};
use crate::error::{Error, Result};
use crate::region::RegionTable;
use crate::schema::{City, CityRecord, ResasResponse};
use crate::tables::PrefectureTable;
use crate::validate::validate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
    /// Wait between two prefectures.
    pub interval: Duration,
    pub retry: RetryPolicy,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_INTERVAL_MILLIS),
            retry: RetryPolicy::default(),
        }
    }
}

/// Collects the cities of every prefecture in a [`PrefectureTable`].
///
/// Requests are sequential: RESAS limits the request rate, so the
/// collector waits [`CollectOptions::interval`] between prefectures.
pub struct Collector<'a, F: Fetch> {
    fetcher: &'a F,
    prefectures: PrefectureTable,
    regions: RegionTable,
    options: CollectOptions,
}

impl<'a, F: Fetch> Collector<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self {
            fetcher,
            prefectures: PrefectureTable::default(),
            regions: RegionTable::default(),
            options: CollectOptions::default(),
        }
    }

    pub fn with_prefectures(mut self, prefectures: PrefectureTable) -> Self {
        self.prefectures = prefectures;
        self
    }

    pub fn with_regions(mut self, regions: RegionTable) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_options(mut self, options: CollectOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the collection.
    ///
    /// Records are ordered by prefecture code, then by API response order.
    /// If a prefecture fails, the error is [`Error::Interrupted`] carrying the
    /// records of the prefectures before it.
    pub fn collect(&self) -> Result<Vec<CityRecord>> {
        let mut records = Vec::new();
        for (index, (pref_code, pref_name)) in self.prefectures.iter().enumerate() {
            if index > 0 && !self.options.interval.is_zero() {
                thread::sleep(self.options.interval);
            }
            match self.collect_prefecture(pref_code, pref_name) {
                Ok(cities) => {
                    tracing::info!(pref_code, pref_name, cities = cities.len(), "Fetched prefecture");
                    records.extend(cities);
                }
                Err(source) => {
                    tracing::error!(pref_code, pref_name, error = %source, "Failed to fetch prefecture");
                    return Err(Error::Interrupted {
                        prefecture_code: pref_code,
                        partial: records,
                        source: Box::new(source),
                    });
                }
            }
        }
        Ok(records)
    }

    fn collect_prefecture(&self, pref_code: u8, pref_name: &str) -> Result<Vec<CityRecord>> {
        let cities = self.fetch_cities(pref_code)?;
        let mut records = Vec::with_capacity(cities.len());
        for city in cities {
            if city.is_big_city_aggregate() {
                tracing::debug!(city_code = %city.city_code, city_name = %city.city_name, "Skipping big city aggregate row");
                continue;
            }
            records.push(self.to_record(city, pref_name)?);
        }
        Ok(records)
    }

    fn to_record(&self, city: City, pref_name: &str) -> Result<CityRecord> {
        let numeric_code: u32 = city
            .city_code
            .trim()
            .parse()
            .map_err(|_| Error::InvalidCityCode(city.city_code.clone()))?;
        let region_name = self
            .regions
            .classify(numeric_code)
            .ok_or(Error::Unclassified(numeric_code))?;
        Ok(CityRecord::new(
            city.city_code,
            city.city_name,
            pref_name,
            region_name,
        ))
    }

    fn fetch_cities(&self, pref_code: u8) -> Result<Vec<City>> {
        let path = format!("{CITIES_PATH}?prefCode={pref_code}");
        let mut attempts = 0;
        loop {
            let err = match self.fetcher.fetch(&path).and_then(parse_cities) {
                Ok(cities) => return Ok(cities),
                Err(err) if !err.is_retriable() => return Err(err),
                Err(err) => err,
            };
            attempts += 1;
            if attempts >= self.options.retry.attempts {
                if attempts <= 1 {
                    return Err(err);
                }
                return Err(Error::RetriesExhausted {
                    attempts,
                    source: Box::new(err),
                });
            }
            let delay = self.options.retry.backoff(attempts);
            tracing::warn!(
                pref_code,
                error = %err,
                attempt = attempts,
                max_attempts = self.options.retry.attempts,
                delay_ms = delay.as_millis() as u64,
                "Retryable error, will retry"
            );
            thread::sleep(delay);
        }
    }
}

fn parse_cities(payload: Value) -> Result<Vec<City>> {
    validate(&payload)?;
    let response: ResasResponse<City> = serde_json::from_value(payload)?;
    Ok(response.result)
}
