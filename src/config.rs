// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use crate::models::Coordinates;
use crate::services::DEFAULT_ZOOM;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Directory holding the workout snapshot
    pub data_dir: PathBuf,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Initial map center. `None` when no location could be obtained.
    pub map_center: Option<Coordinates>,
    /// Map zoom level for the initial view and record focus
    pub map_zoom: u8,
}

impl Config {
    /// Config for tests: fixed location, default paths.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            data_dir: PathBuf::from("data"),
            frontend_url: "http://localhost:5173".to_string(),
            map_center: Some(Coordinates::new(18.211778, 76.455029)),
            map_zoom: DEFAULT_ZOOM,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `MAP_CENTER` is optional here; the binary refuses to start without it.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let map_center = match env::var("MAP_CENTER") {
            Ok(raw) => Some(parse_coordinates(&raw).ok_or(ConfigError::Invalid("MAP_CENTER"))?),
            Err(_) => None,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            map_center,
            map_zoom: match env::var("MAP_ZOOM") {
                Ok(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("MAP_ZOOM"))?,
                Err(_) => DEFAULT_ZOOM,
            },
        })
    }
}

/// Parse "lat,lng".
fn parse_coordinates(raw: &str) -> Option<Coordinates> {
    let (lat, lng) = raw.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    let in_range = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng);
    in_range.then(|| Coordinates::new(lat, lng))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
