//! Data access layer for the analytics service

mod client;

pub use client::{decode_envelope, AnalyticsApi, ApiClient};
