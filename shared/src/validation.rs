//! Validation utilities for the stock dashboard.
//!
//! Pure checks shared by the controller and the browser adapter; callers
//! decide whether a rejection is logged, surfaced, or fatal.

use crate::models::{ForecastRequest, FORECAST_PERIOD_CHOICES};

// ============================================================================
// Forecast Validations
// ============================================================================

/// Validate a forecast horizon against the accepted set of day counts
pub fn validate_forecast_periods(periods: u32) -> Result<(), &'static str> {
    if !FORECAST_PERIOD_CHOICES.contains(&periods) {
        return Err("Forecast periods must be one of 7, 14, 30, 60, or 90 days");
    }
    Ok(())
}

/// Validate a full forecast request before it goes on the wire
pub fn validate_forecast_request(request: &ForecastRequest) -> Result<(), &'static str> {
    validate_forecast_periods(request.periods)?;
    if let Some(product_id) = &request.product_id {
        if product_id.trim().is_empty() {
            return Err("Product selection cannot be blank; omit it to forecast all products");
        }
    }
    Ok(())
}

// ============================================================================
// Configuration Validations
// ============================================================================

/// Validate the narrative cost-of-goods ratio override
pub fn validate_cogs_ratio(ratio: f64) -> Result<(), &'static str> {
    if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
        return Err("Cost-of-goods ratio must be greater than 0 and at most 1");
    }
    Ok(())
}

/// Validate the periodic refresh interval
pub fn validate_refresh_interval(seconds: u64) -> Result<(), &'static str> {
    if seconds == 0 {
        return Err("Refresh interval must be at least 1 second");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ForecastModel;

    // ========================================================================
    // Forecast Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_forecast_periods_valid() {
        for periods in FORECAST_PERIOD_CHOICES {
            assert!(validate_forecast_periods(periods).is_ok());
        }
    }

    #[test]
    fn test_validate_forecast_periods_invalid() {
        assert!(validate_forecast_periods(0).is_err());
        assert!(validate_forecast_periods(15).is_err());
        assert!(validate_forecast_periods(365).is_err());
    }

    #[test]
    fn test_validate_forecast_request_valid() {
        let request = ForecastRequest {
            product_id: Some("SKU-001".to_string()),
            periods: 30,
            model: ForecastModel::Auto,
        };
        assert!(validate_forecast_request(&request).is_ok());
    }

    #[test]
    fn test_validate_forecast_request_all_products() {
        let request = ForecastRequest {
            product_id: None,
            periods: 7,
            model: ForecastModel::Xgboost,
        };
        assert!(validate_forecast_request(&request).is_ok());
    }

    #[test]
    fn test_validate_forecast_request_blank_product() {
        let request = ForecastRequest {
            product_id: Some("   ".to_string()),
            periods: 30,
            model: ForecastModel::Auto,
        };
        assert!(validate_forecast_request(&request).is_err());
    }

    // ========================================================================
    // Configuration Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_cogs_ratio_valid() {
        assert!(validate_cogs_ratio(0.6).is_ok());
        assert!(validate_cogs_ratio(1.0).is_ok());
        assert!(validate_cogs_ratio(0.01).is_ok());
    }

    #[test]
    fn test_validate_cogs_ratio_invalid() {
        assert!(validate_cogs_ratio(0.0).is_err());
        assert!(validate_cogs_ratio(-0.5).is_err());
        assert!(validate_cogs_ratio(1.5).is_err());
        assert!(validate_cogs_ratio(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_refresh_interval() {
        assert!(validate_refresh_interval(60).is_ok());
        assert!(validate_refresh_interval(0).is_err());
    }
}
