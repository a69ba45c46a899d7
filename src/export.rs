//! Writing collected cities to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::ValueEnum;
use itertools::Itertools;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::config::DEFAULT_OUTPUT_STEM;
use crate::error::Result;
use crate::schema::CityRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// JSON array of `[city_code, city_name, prefecture_name, region_name]`.
    #[default]
    Json,
    /// Parquet file with one Utf8 column per field.
    Parquet,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Parquet => "parquet",
        }
    }
}

/// Write `records` to `path` in `format`, replacing any existing file.
pub fn export(records: &[CityRecord], path: &Path, format: Format) -> Result<()> {
    match format {
        Format::Json => write_json(records, path),
        Format::Parquet => write_parquet(records, path),
    }
}

/// Write `records` as a UTF-8 JSON array of arrays. Non-ASCII text is not escaped.
pub fn write_json(records: &[CityRecord], path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

pub fn write_parquet(records: &[CityRecord], path: &Path) -> Result<()> {
    let column = |field: fn(&CityRecord) -> &str| {
        Arc::new(StringArray::from(records.iter().map(field).collect_vec())) as ArrayRef
    };
    let columns = vec![
        column(CityRecord::city_code),
        column(CityRecord::city_name),
        column(CityRecord::prefecture_name),
        column(CityRecord::region_name),
    ];

    let batch_cities = RecordBatch::try_new(
        Arc::new(Schema::new(vec![
            Field::new("city_code", DataType::Utf8, false),
            Field::new("city_name", DataType::Utf8, false),
            Field::new("prefecture_name", DataType::Utf8, false),
            Field::new("region_name", DataType::Utf8, false),
        ])),
        columns,
    )?;

    let file = File::create(path)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, batch_cities.schema(), Some(props))?;
    writer.write(&batch_cities)?;
    writer.close()?;
    Ok(())
}

/// Where partial results of a failed run go: `jp_cities.json` becomes `jp_cities.partial.json`.
pub fn partial_output_path(output: &Path, format: Format) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_OUTPUT_STEM.to_string());
    output.with_file_name(format!("{stem}.partial.{}", format.extension()))
}
