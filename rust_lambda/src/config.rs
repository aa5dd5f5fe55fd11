//! Process-wide configuration, read from the environment once at cold start.
//!
//! Environment variables:
//! - AMPLIFY_STORAGE_BUCKET_NAME: bucket holding originals and thumbnails
//! - THUMB_MAX_DIMENSION: longest side of a thumbnail in pixels (default: 600)
//! - THUMB_QUALITY: JPEG quality 1-100 (default: 95)
//! - THUMB_CACHE_CONTROL: Cache-Control header for thumbnails (default: "max-age=31536000")

use crate::error::HandlerError;
use crate::transform::ThumbnailSpec;

pub(crate) const BUCKET_ENV: &str = "AMPLIFY_STORAGE_BUCKET_NAME";
const MAX_DIMENSION_ENV: &str = "THUMB_MAX_DIMENSION";
const QUALITY_ENV: &str = "THUMB_QUALITY";
const CACHE_CONTROL_ENV: &str = "THUMB_CACHE_CONTROL";

const DEFAULT_MAX_DIMENSION: u32 = 600;
const DEFAULT_QUALITY: u8 = 95;
const DEFAULT_CACHE_CONTROL: &str = "max-age=31536000";

#[derive(Clone, Debug)]
pub(crate) struct Config {
    /// Missing is only fatal for invocations whose event does not name a bucket.
    pub(crate) bucket_name: Option<String>,
    pub(crate) thumbnail: ThumbnailSpec,
    pub(crate) cache_control: String,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self, HandlerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HandlerError> {
        let bucket_name = lookup(BUCKET_ENV).filter(|b| !b.trim().is_empty());

        let max_dimension = parse_or(&lookup, MAX_DIMENSION_ENV, DEFAULT_MAX_DIMENSION)?;
        let quality = parse_or(&lookup, QUALITY_ENV, DEFAULT_QUALITY)?;
        let thumbnail = ThumbnailSpec::new(max_dimension, quality)?;

        let cache_control =
            lookup(CACHE_CONTROL_ENV).unwrap_or_else(|| DEFAULT_CACHE_CONTROL.to_string());

        Ok(Self {
            bucket_name,
            thumbnail,
            cache_control,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, HandlerError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| HandlerError::InvalidConfig(format!("{name} has invalid value {raw:?}"))),
    }
}
