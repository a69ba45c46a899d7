use serde::{Deserialize, Serialize};

use crate::config::BIG_CITY_AGGREGATE_FLAG;

#[derive(Debug, Deserialize)]
pub struct ResasResponse<T> {
    #[serde(bound(deserialize = "Vec<T>: Deserialize<'de>"))]
    pub result: Vec<T>,
}

/// One row of `cities?prefCode=`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub city_code: String,
    pub city_name: String,
    pub big_city_flag: String,
}

impl City {
    /// Aggregate row of an ordinance-designated city, duplicating its wards.
    pub fn is_big_city_aggregate(&self) -> bool {
        self.big_city_flag == BIG_CITY_AGGREGATE_FLAG
    }
}

type CityTuple = (String, String, String, String);

/// A city with its prefecture and region.
///
/// Serialized as a 4-element array `[city_code, city_name, prefecture_name, region_name]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CityTuple", into = "CityTuple")]
pub struct CityRecord {
    city_code: String,
    city_name: String,
    prefecture_name: String,
    region_name: String,
}

impl CityRecord {
    pub fn new(
        city_code: impl Into<String>,
        city_name: impl Into<String>,
        prefecture_name: impl Into<String>,
        region_name: impl Into<String>,
    ) -> Self {
        Self {
            city_code: city_code.into(),
            city_name: city_name.into(),
            prefecture_name: prefecture_name.into(),
            region_name: region_name.into(),
        }
    }

    pub fn city_code(&self) -> &str {
        &self.city_code
    }

    pub fn city_name(&self) -> &str {
        &self.city_name
    }

    pub fn prefecture_name(&self) -> &str {
        &self.prefecture_name
    }

    pub fn region_name(&self) -> &str {
        &self.region_name
    }
}

impl From<CityTuple> for CityRecord {
    fn from((city_code, city_name, prefecture_name, region_name): CityTuple) -> Self {
        Self::new(city_code, city_name, prefecture_name, region_name)
    }
}

impl From<CityRecord> for CityTuple {
    fn from(record: CityRecord) -> Self {
        (
            record.city_code,
            record.city_name,
            record.prefecture_name,
            record.region_name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_city_deserialize() {
        let city: City = serde_json::from_value(serde_json::json!({
            "prefCode": 13,
            "cityCode": "13101",
            "cityName": "千代田区",
            "bigCityFlag": "0"
        }))
        .expect("valid city");
        assert_eq!(city.city_code, "13101");
        assert!(!city.is_big_city_aggregate());
    }

    #[test]
    fn test_aggregate_row() {
        let city: City = serde_json::from_str(
            r#"{"cityCode":"13100","cityName":"TokyoAggregate","bigCityFlag":"2"}"#,
        )
        .expect("valid city");
        assert_eq!(city.city_name, "TokyoAggregate");
        assert!(city.is_big_city_aggregate());
    }

    #[test]
    fn test_record_serializes_as_array() {
        let record = CityRecord::new("13101", "千代田区", "東京都", "関東地方");
        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(json, r#"["13101","千代田区","東京都","関東地方"]"#);
    }
}
