//! Anchor provider
//!
//! Fetches today's sahur (Fajr/imsak) and iftar (Maghrib) times for the
//! configured city from the AlAdhan `timingsByCity` endpoint. One
//! request/response round trip per call, no caching; the retry cadence
//! belongs to the engine.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::countdown::AnchorSet;

/// Provider failure taxonomy. Both variants collapse to a reason
/// string at the fetch-state boundary; the engine never branches on
/// the variant.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("prayer times request failed: {0}")]
    Transport(String),
    #[error("invalid data received from API")]
    MalformedResponse,
}

/// AlAdhan payload, modeled with Options so a missing field maps to
/// MalformedResponse instead of a hard deserialization failure.
#[derive(Debug, Deserialize)]
struct TimingsResponse {
    data: Option<TimingsData>,
}

#[derive(Debug, Deserialize)]
struct TimingsData {
    timings: Option<Timings>,
}

#[derive(Debug, Deserialize)]
struct Timings {
    #[serde(rename = "Fajr")]
    fajr: Option<String>,
    #[serde(rename = "Maghrib")]
    maghrib: Option<String>,
}

pub struct AnchorProvider {
    client: reqwest::Client,
    base_url: String,
    city: String,
    country: String,
    calc_method: u8,
}

impl AnchorProvider {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            city: config.city.clone(),
            country: config.country.clone(),
            calc_method: config.calc_method,
        })
    }

    /// Fetch the anchor pair for the given calendar date. Stateless
    /// and safely callable repeatedly.
    pub async fn fetch_today(&self, today: NaiveDate) -> Result<AnchorSet, FetchError> {
        let url = format!(
            "{}/v1/timingsByCity/{}",
            self.base_url,
            today.format("%d.%m.%Y")
        );
        debug!("Fetching prayer times from {}", url);

        let method = self.calc_method.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("city", self.city.as_str()),
                ("country", self.country.as_str()),
                ("method", method.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Transport(format!("HTTP {}", response.status())));
        }

        let payload: TimingsResponse = response
            .json()
            .await
            .map_err(|_| FetchError::MalformedResponse)?;

        anchors_from_payload(&payload)
    }
}

/// Parse a raw AlAdhan response body into an anchor pair. Split out of
/// the network path so payload handling is testable offline.
pub fn parse_payload(body: &str) -> Result<AnchorSet, FetchError> {
    let payload: TimingsResponse =
        serde_json::from_str(body).map_err(|_| FetchError::MalformedResponse)?;
    anchors_from_payload(&payload)
}

fn anchors_from_payload(payload: &TimingsResponse) -> Result<AnchorSet, FetchError> {
    let timings = payload
        .data
        .as_ref()
        .and_then(|d| d.timings.as_ref())
        .ok_or(FetchError::MalformedResponse)?;

    let fajr = timings.fajr.as_deref().ok_or(FetchError::MalformedResponse)?;
    let maghrib = timings
        .maghrib
        .as_deref()
        .ok_or(FetchError::MalformedResponse)?;

    Ok(AnchorSet {
        sahur: parse_anchor_time(fajr)?,
        iftar: parse_anchor_time(maghrib)?,
    })
}

/// AlAdhan emits "HH:MM", occasionally with a timezone annotation such
/// as "04:38 (+03)". Anything after the first whitespace is dropped;
/// "HH:MM:SS" is accepted as well.
pub fn parse_anchor_time(raw: &str) -> Result<NaiveTime, FetchError> {
    let cleaned = raw
        .split_whitespace()
        .next()
        .ok_or(FetchError::MalformedResponse)?;

    NaiveTime::parse_from_str(cleaned, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(cleaned, "%H:%M"))
        .map_err(|_| FetchError::MalformedResponse)
}
