//! Maintenance advisory derived from the input record.
//!
//! Plain arithmetic on what the user entered, not a model output: service
//! interval of 180 days, oil change every 10,000 km.

use serde::{Deserialize, Serialize};

use super::record::VehicleRecord;

const SERVICE_INTERVAL_DAYS: f64 = 180.0;
const OIL_CHANGE_INTERVAL_KM: f64 = 10_000.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisory {
    /// Days until the next recommended workshop visit (0 = overdue)
    pub next_service_in_days: u32,
    /// Kilometres until the next oil change (0 = overdue)
    pub next_oil_change_km: u32,
}

impl Advisory {
    pub fn for_record(record: &VehicleRecord) -> Self {
        let next_service = (SERVICE_INTERVAL_DAYS - record.days_since_service).max(0.0);
        let into_interval = record.total_mileage_km.rem_euclid(OIL_CHANGE_INTERVAL_KM);
        let next_oil_change = (OIL_CHANGE_INTERVAL_KM - into_interval).max(0.0);

        Self {
            next_service_in_days: next_service.round() as u32,
            next_oil_change_km: next_oil_change.round() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(mileage: f64, days: f64) -> VehicleRecord {
        VehicleRecord {
            total_mileage_km: mileage,
            avg_daily_km: 50.0,
            oil_change_count: 5.0,
            brake_change_count: 1.0,
            days_since_service: days,
            avg_temperature_c: 25.0,
            vehicle_type: "car".to_string(),
            road_type: "city".to_string(),
            engine_noise: "normal".to_string(),
            vibration: "low".to_string(),
            warning_light: "off".to_string(),
        }
    }

    #[test]
    fn test_advisory_countdowns() {
        let advisory = Advisory::for_record(&record(52_500.0, 100.0));
        assert_eq!(advisory.next_service_in_days, 80);
        assert_eq!(advisory.next_oil_change_km, 7_500);
    }

    #[test]
    fn test_advisory_clamps_overdue_service_at_zero() {
        let advisory = Advisory::for_record(&record(52_500.0, 900.0));
        assert_eq!(advisory.next_service_in_days, 0);
    }
}
