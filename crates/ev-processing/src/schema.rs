//! Column-name constants for charging-session tables.
//!
//! Single source of truth for the source CSV headers, the internal names they
//! are renamed to, and the derived columns added by the pipeline.

// ── Internal column names ───────────────────────────────────────────────────
pub const USER_ID: &str = "UserId";
pub const VEHICLE_MODEL: &str = "VehicleModel";
pub const BATTERY_CAPACITY_KWH: &str = "BatteryCapacityKWh";
pub const CHARGING_STATION_ID: &str = "ChargingStationId";
pub const CHARGING_STATION_LOCATION: &str = "ChargingStationLocation";
pub const CHARGING_START_TIME: &str = "ChargingStartTime";
pub const CHARGING_END_TIME: &str = "ChargingEndTime";
pub const ENERGY_CONSUMED_KWH: &str = "EnergyConsumedKwh";
pub const CHARGING_DURATION_HOURS: &str = "ChargingDurationHours";
pub const CHARGING_RATE_KW: &str = "ChargingRateKW";
pub const CHARGING_COST_USD: &str = "ChargingCostUSD";
pub const TIME_OF_DAY: &str = "TimeOfDay";
pub const DAY_OF_WEEK: &str = "DayOfWeek";
pub const STATE_OF_CHARGE_START: &str = "StateOfChargeStart%";
pub const STATE_OF_CHARGE_END: &str = "StateOfChargeEnd%";
pub const DISTANCE_DRIVEN_KM: &str = "DistanceDrivenKm";
pub const TEMPERATURE_C: &str = "TemperatureC";
pub const VEHICLE_AGE_YEARS: &str = "VehicleAgeYears";
pub const CHARGER_TYPE: &str = "ChargerType";
pub const USER_TYPE: &str = "UserType";

// ── Split and derived columns ───────────────────────────────────────────────
pub mod derived {
    pub const CHARGING_START_DATE: &str = "ChargingStartDate";
    pub const CHARGING_END_DATE: &str = "ChargingEndDate";
    /// Time-of-day half of the split start instant (reuses the source name).
    pub const CHARGING_START_CLOCK: &str = super::CHARGING_START_TIME;
    /// Time-of-day half of the split end instant (reuses the source name).
    pub const CHARGING_END_CLOCK: &str = super::CHARGING_END_TIME;
    pub const CHARGE_DIFFERENCE: &str = "ChargeDifference%";
    pub const CHARGING_DURATION_MINUTES: &str = "ChargingDurationMinutes";
}

/// Source header → internal name. Applied verbatim; not configurable.
pub const RENAME_MAP: [(&str, &str); 20] = [
    ("user id", USER_ID),
    ("VehicleModel", VEHICLE_MODEL),
    ("BatteryCapacitykWh", BATTERY_CAPACITY_KWH),
    ("Charging_StationID", CHARGING_STATION_ID),
    ("Charging StationLocation", CHARGING_STATION_LOCATION),
    ("Charging StartTime", CHARGING_START_TIME),
    ("Charging EndTime", CHARGING_END_TIME),
    ("Energy ConsumedKWh", ENERGY_CONSUMED_KWH),
    ("ChargingDuration_hours", CHARGING_DURATION_HOURS),
    ("ChargingRateKW", CHARGING_RATE_KW),
    ("ChargingCostUSD", CHARGING_COST_USD),
    ("TimeofDay", TIME_OF_DAY),
    ("DayofWeek", DAY_OF_WEEK),
    ("State_of_Charge_Start%", STATE_OF_CHARGE_START),
    ("State_of_Charge_End%", STATE_OF_CHARGE_END),
    ("Distance_Driven_km", DISTANCE_DRIVEN_KM),
    ("TemperatureC", TEMPERATURE_C),
    ("VehicleAge_years", VEHICLE_AGE_YEARS),
    ("ChargerType", CHARGER_TYPE),
    ("UserType", USER_TYPE),
];

/// Categorical columns in cleaning order.
pub const CATEGORICAL_COLUMNS: [&str; 6] = [
    VEHICLE_MODEL,
    CHARGING_STATION_LOCATION,
    TIME_OF_DAY,
    DAY_OF_WEEK,
    CHARGER_TYPE,
    USER_TYPE,
];

/// Columns whose simultaneous absence marks a row as wholly unusable.
pub const KEY_COLUMNS: [&str; 8] = [
    VEHICLE_MODEL,
    CHARGER_TYPE,
    CHARGING_STATION_LOCATION,
    TIME_OF_DAY,
    DAY_OF_WEEK,
    USER_TYPE,
    CHARGING_START_TIME,
    CHARGING_END_TIME,
];

/// Plain measurement columns, coerced to Float64.
pub const MEASURE_COLUMNS: [&str; 7] = [
    BATTERY_CAPACITY_KWH,
    ENERGY_CONSUMED_KWH,
    CHARGING_DURATION_HOURS,
    CHARGING_RATE_KW,
    DISTANCE_DRIVEN_KM,
    TEMPERATURE_C,
    VEHICLE_AGE_YEARS,
];

/// Columns dropped after renaming unless configured otherwise.
pub const DEFAULT_DROPPED_COLUMNS: [&str; 1] = [USER_ID];

/// Canonical weekday order used by charts.
pub const ORDERED_DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Canonical time-of-day order used by charts.
pub const ORDERED_TIMES: [&str; 4] = ["Morning", "Afternoon", "Evening", "Night"];

/// Look up the internal name for a source header.
pub fn internal_name(source: &str) -> Option<&'static str> {
    RENAME_MAP
        .iter()
        .find(|(from, _)| *from == source)
        .map(|(_, to)| *to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rename_targets_are_unique() {
        let targets: HashSet<&str> = RENAME_MAP.iter().map(|(_, to)| *to).collect();
        assert_eq!(targets.len(), RENAME_MAP.len());
    }

    #[test]
    fn test_internal_name_lookup() {
        assert_eq!(internal_name("Charging_StationID"), Some(CHARGING_STATION_ID));
        assert_eq!(internal_name("user id"), Some(USER_ID));
        assert_eq!(internal_name("NotAColumn"), None);
    }

    #[test]
    fn test_key_columns_cover_categoricals() {
        for col in CATEGORICAL_COLUMNS {
            assert!(KEY_COLUMNS.contains(&col), "{col} missing from key columns");
        }
    }
}
