use std::io::Read;
use std::path::Path;

use bytes::Bytes;
use csv::{ReaderBuilder, StringRecord};
use reqwest::{
    Method, Url,
    header::{HeaderName, HeaderValue},
};

use crate::error::RequestFileError;

use super::data::{PreloadedRequests, RequestDescriptor};

const METHOD_FIELD: usize = 0;
const URL_FIELD: usize = 1;
const BODY_FIELD: usize = 2;
const FIRST_HEADER_FIELD: usize = 3;

/// Reads and parses a request-list file.
///
/// # Errors
///
/// Returns an error when the file cannot be read, a row is malformed, or the
/// file holds no requests at all.
pub fn load_request_file(path: &Path) -> Result<PreloadedRequests, RequestFileError> {
    let content = std::fs::read(path).map_err(|source| RequestFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let requests = parse_request_list(content.as_slice())?;
    PreloadedRequests::new(requests).ok_or(RequestFileError::Empty)
}

/// Parses CSV rows of `method,url[,body[,headers...]]`.
///
/// Header columns hold newline separated `Name:Value` pairs split on the
/// first colon; lines without a colon are skipped.
///
/// # Errors
///
/// Returns an error for malformed CSV, rows with fewer than two fields, or
/// values that do not form a valid request.
pub fn parse_request_list<R: Read>(reader: R) -> Result<Vec<RequestDescriptor>, RequestFileError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut requests = Vec::new();
    let mut row: u64 = 0;
    for record in csv_reader.records() {
        let record = record.map_err(|source| RequestFileError::Csv { source })?;
        row = row.saturating_add(1);
        requests.push(parse_row(row, &record)?);
    }
    Ok(requests)
}

fn parse_row(row: u64, record: &StringRecord) -> Result<RequestDescriptor, RequestFileError> {
    let (Some(method_raw), Some(url_raw)) = (record.get(METHOD_FIELD), record.get(URL_FIELD))
    else {
        return Err(RequestFileError::TooFewFields {
            row,
            found: record.len(),
        });
    };

    let method_raw = method_raw.trim();
    let method = Method::from_bytes(method_raw.to_ascii_uppercase().as_bytes())
        .ok()
        .ok_or_else(|| RequestFileError::InvalidMethod {
            row,
            value: method_raw.to_owned(),
        })?;

    let url_raw = url_raw.trim();
    let url = Url::parse(url_raw).map_err(|source| RequestFileError::InvalidUrl {
        row,
        value: url_raw.to_owned(),
        source,
    })?;

    let body = record
        .get(BODY_FIELD)
        .map(|body| Bytes::copy_from_slice(body.as_bytes()))
        .unwrap_or_default();

    let mut headers = Vec::new();
    for column in record.iter().skip(FIRST_HEADER_FIELD) {
        for line in column.lines() {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            headers.push(parse_header_pair(row, name, value)?);
        }
    }

    Ok(RequestDescriptor::new(method, url, body, headers))
}

fn parse_header_pair(
    row: u64,
    name: &str,
    value: &str,
) -> Result<(HeaderName, HeaderValue), RequestFileError> {
    let name = name.trim();
    let invalid = || RequestFileError::InvalidHeader {
        row,
        name: name.to_owned(),
    };
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .ok()
        .ok_or_else(invalid)?;
    let header_value = HeaderValue::from_str(value.trim())
        .ok()
        .ok_or_else(invalid)?;
    Ok((header_name, header_value))
}
