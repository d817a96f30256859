use anyhow::Result;
use httpmock::prelude::*;
use std::fmt::Write as _;
use tempfile::TempDir;
use trip_etl::utils::validation::Validate;
use trip_etl::{CsvRowSource, FieldMapping, HttpUploader, TripLoader};

const HEADER: &str = "pickup,dropoff,start_block,start_tract,start_county,end_block,end_tract,end_county,start_lat,start_lon,end_lat,end_lon";

fn trip_line(block: usize) -> String {
    format!(
        "2021-01-01T08:00:00,2021-01-01T08:20:00,{},200,300,110,210,310,40.1,-73.9,40.2,-74.0",
        block
    )
}

fn write_config(dir: &TempDir, endpoint: &str, input: &str) -> Result<String> {
    let config = serde_json::json!({
        "elk-address": endpoint,
        "input-address": input,
        "time-format": "RFC3339",
        "start-time": 0,
        "end-time": 1,
        "start-block": 2,
        "start-tract": 3,
        "start-county": 4,
        "end-block": 5,
        "end-tract": 6,
        "end-county": 7,
        "start-lat": 8,
        "start-long": 9,
        "end-lat": 10,
        "end-long": 11
    });
    let path = dir.path().join("config.json");
    std::fs::write(&path, serde_json::to_string_pretty(&config)?)?;
    Ok(path.to_string_lossy().into_owned())
}

fn write_input(dir: &TempDir, body: &str) -> Result<String> {
    let path = dir.path().join("trips.csv");
    std::fs::write(&path, format!("{}\n{}", HEADER, body))?;
    Ok(path.to_string_lossy().into_owned())
}

async fn load(config_path: &str) -> Result<trip_etl::RunSummary> {
    let mapping = FieldMapping::from_file(config_path)?;
    mapping.validate()?;
    let rows = CsvRowSource::open(&mapping.input_path, mapping.delimiter_byte()?)?;
    let loader = TripLoader::new(&mapping, HttpUploader::new(mapping.endpoint.clone()));
    Ok(loader.run(rows).await?)
}

#[tokio::test]
async fn test_end_to_end_single_batch() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let expected_body = concat!(
        "{\"index\":{}}\n",
        "{\"dropoff-time\":\"2021-01-01T08:20:00Z\",\"pickup-time\":\"2021-01-01T08:00:00Z\",",
        "\"start-block\":\"100\",\"start-tract\":\"200\",\"start-county\":\"300\",",
        "\"end-block\":\"110\",\"end-tract\":\"210\",\"end-county\":\"310\",",
        "\"start-coords\":{\"lat\":40.1,\"lon\":-73.9},\"end-coords\":{\"lat\":40.2,\"lon\":-74.0}}\n",
    );
    let bulk_mock = server.mock(|when, then| {
        when.method(PUT).path("/trips/_bulk").body(expected_body);
        then.status(200)
            .header("Content-Type", "application/json")
            .body(r#"{"took":1,"errors":false}"#);
    });

    let input = write_input(&temp_dir, &format!("{}\n", trip_line(100)))?;
    let config = write_config(&temp_dir, &server.url("/trips/_bulk"), &input)?;

    let summary = load(&config).await?;

    bulk_mock.assert();
    assert_eq!(summary.rows_read, 1);
    assert_eq!(summary.documents_encoded, 1);
    assert_eq!(summary.batches_uploaded, 1);
    Ok(())
}

#[tokio::test]
async fn test_large_input_is_split_into_bulks_of_1000() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let bulk_mock = server.mock(|when, then| {
        when.method(PUT).path("/_bulk");
        then.status(200).body("{}");
    });

    let mut body = String::new();
    for i in 0..2001 {
        writeln!(body, "{}", trip_line(i))?;
    }
    let input = write_input(&temp_dir, &body)?;
    let config = write_config(&temp_dir, &server.url("/_bulk"), &input)?;

    let summary = load(&config).await?;

    bulk_mock.assert_hits(3);
    assert_eq!(summary.batches, 3);
    assert_eq!(summary.rows_read, 2001);
    assert_eq!(summary.documents_encoded, 2001);
    assert_eq!(summary.batches_uploaded, 3);
    Ok(())
}

#[tokio::test]
async fn test_bad_rows_are_skipped() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let bulk_mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/_bulk")
            .body_contains("\"start-block\":\"1\"")
            .body_contains("\"start-block\":\"4\"");
        then.status(200).body("{}");
    });

    let body = [
        trip_line(1),
        trip_line(2).replace("40.1", "north"),
        trip_line(3).replace("2021-01-01T08:20:00", "tomorrow"),
        "2021-01-01T08:00:00,short".to_string(),
        trip_line(4),
    ]
    .join("\n");
    let input = write_input(&temp_dir, &body)?;
    let config = write_config(&temp_dir, &server.url("/_bulk"), &input)?;

    let summary = load(&config).await?;

    bulk_mock.assert();
    assert_eq!(summary.rows_read, 5);
    assert_eq!(summary.failed_rows, 3);
    assert_eq!(summary.documents_encoded, 2);
    Ok(())
}

#[tokio::test]
async fn test_rejected_bulk_does_not_abort() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let bulk_mock = server.mock(|when, then| {
        when.method(PUT).path("/_bulk");
        then.status(503).body("cluster unavailable");
    });

    let mut body = String::new();
    for i in 0..1500 {
        writeln!(body, "{}", trip_line(i))?;
    }
    let input = write_input(&temp_dir, &body)?;
    let config = write_config(&temp_dir, &server.url("/_bulk"), &input)?;

    let summary = load(&config).await?;

    bulk_mock.assert_hits(2);
    assert_eq!(summary.batches_rejected, 2);
    assert_eq!(summary.batches_uploaded, 0);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_endpoint_does_not_abort() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_input(&temp_dir, &format!("{}\n", trip_line(1)))?;
    let config = write_config(&temp_dir, "http://127.0.0.1:1/_bulk", &input)?;

    let summary = load(&config).await?;

    assert_eq!(summary.batches_failed, 1);
    assert_eq!(summary.documents_encoded, 1);
    Ok(())
}

#[tokio::test]
async fn test_header_only_input_sends_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let bulk_mock = server.mock(|when, then| {
        when.method(PUT).path("/_bulk");
        then.status(200);
    });

    let input = write_input(&temp_dir, "")?;
    let config = write_config(&temp_dir, &server.url("/_bulk"), &input)?;

    let summary = load(&config).await?;

    bulk_mock.assert_hits(0);
    assert_eq!(summary.batches, 0);
    Ok(())
}

#[tokio::test]
async fn test_missing_input_file_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let missing = temp_dir.path().join("absent.csv");
    let config = write_config(
        &temp_dir,
        "http://localhost:9200/_bulk",
        &missing.to_string_lossy(),
    )?;

    let mapping = FieldMapping::from_file(&config)?;
    let err = CsvRowSource::open(&mapping.input_path, mapping.delimiter_byte()?)
        .err()
        .expect("opening a missing file must fail");
    assert!(matches!(err, trip_etl::EtlError::InputOpenError { .. }));
    Ok(())
}
