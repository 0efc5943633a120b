//! Rule-based normalization of the free-text category columns.
//!
//! Every categorical column goes through the same chain:
//!
//! 1. **Normalize**: trim, lowercase, strip a trailing run of `#`, collapse
//!    internal whitespace.
//! 2. **Alias**: exact-match replacement of known truncations and typos with
//!    the corrected normalized text (`"audi e-tro"` → `"audi e-tron"`).
//! 3. **Canonicalize**: exact-match mapping of the corrected text to the final
//!    display label (`"audi e-tron"` → `"Audi e-Tron"`).
//!
//! Missing cells are never touched by the chain, and a value that normalizes
//! to `unknown` is treated as missing. Blank text (spaces or `#` only)
//! normalizes to `""` and is kept as an unrecognized value. Values with no canonical entry pass
//! through in their normalized (lowercase) form so they stay visible in the
//! unique-value listings.

use crate::error::Result;
use crate::schema::{
    CHARGER_TYPE, CHARGING_STATION_LOCATION, DAY_OF_WEEK, TIME_OF_DAY, USER_TYPE, VEHICLE_MODEL,
};
use crate::types::{CategoricalCleaningStats, UniqueValueListing};
use crate::utils::{require_series, series_to_strings};
use once_cell::sync::Lazy;
use polars::prelude::*;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info, warn};

/// Normalized text that stands for a missing value.
pub const MISSING_SENTINEL: &str = "unknown";

static TRAILING_HASHES: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r"#+$").expect("Invalid regex: trailing hashes"));

static WHITESPACE_RUN: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r"\s+").expect("Invalid regex: whitespace run"));

/// Normalize one raw category value.
///
/// Returns `None` for the text form of a float NaN (`"nan"`, any case).
///
/// ```rust,ignore
/// assert_eq!(normalize_text("  Seattle## "), Some("seattle".to_string()));
/// assert_eq!(normalize_text("Long-Distance   Traveler"), Some("long-distance traveler".to_string()));
/// ```
pub fn normalize_text(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_lowercase();
    if lowered == "nan" {
        return None;
    }

    let stripped = TRAILING_HASHES.replace(&lowered, "");
    let collapsed = WHITESPACE_RUN.replace_all(stripped.trim(), " ");
    Some(collapsed.into_owned())
}

/// Alias and canonical tables for one categorical column.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRules {
    /// Column the rules apply to.
    pub column: &'static str,
    /// Normalized typo → corrected normalized text.
    pub aliases: &'static [(&'static str, &'static str)],
    /// Corrected normalized text → display label.
    pub canonical: &'static [(&'static str, &'static str)],
}

impl CategoryRules {
    /// Corrected form of a normalized value, if it is a known alias.
    pub fn alias(&self, normalized: &str) -> Option<&'static str> {
        lookup(self.aliases, normalized)
    }

    /// Display label for a corrected value, if it has one.
    pub fn canonical_label(&self, corrected: &str) -> Option<&'static str> {
        lookup(self.canonical, corrected)
    }

    /// All display labels of this column.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.canonical.iter().map(|(_, label)| *label)
    }

    /// Whether `value` is one of this column's display labels.
    pub fn is_canonical(&self, value: &str) -> bool {
        self.labels().any(|label| label == value)
    }

    /// Run one cell through normalize → alias → canonical.
    pub fn clean_value(&self, raw: Option<&str>) -> Option<String> {
        let normalized = normalize_text(raw?)?;
        if normalized == MISSING_SENTINEL {
            return None;
        }

        let corrected = self.alias(&normalized).unwrap_or(normalized.as_str());
        let label = match self.canonical_label(corrected) {
            Some(label) => label,
            None => corrected,
        };

        if label.eq_ignore_ascii_case(MISSING_SENTINEL) {
            None
        } else {
            Some(label.to_string())
        }
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(from, _)| *from == key).map(|(_, to)| *to)
}

// ── Rule tables ─────────────────────────────────────────────────────────────

pub const VEHICLE_RULES: CategoryRules = CategoryRules {
    column: VEHICLE_MODEL,
    aliases: &[
        ("audi e-tro", "audi e-tron"),
        ("tesla model", "tesla model 3"),
        ("chevy bol", "chevy bolt"),
        ("nissan lea", "nissan leaf"),
        ("hyundai kon", "hyundai kona"),
    ],
    canonical: &[
        ("tesla model 3", "Tesla Model 3"),
        ("chevy bolt", "Chevy Bolt"),
        ("nissan leaf", "Nissan Leaf"),
        ("hyundai kona", "Hyundai Kona"),
        ("audi e-tron", "Audi e-Tron"),
    ],
};

pub const LOCATION_RULES: CategoryRules = CategoryRules {
    column: CHARGING_STATION_LOCATION,
    aliases: &[
        ("los angele", "los angeles"),
        ("new yor", "new york"),
        ("san francisc", "san francisco"),
        ("chicag", "chicago"),
        ("seattl", "seattle"),
    ],
    canonical: &[
        ("los angeles", "Los Angeles"),
        ("new york", "New York"),
        ("san francisco", "San Francisco"),
        ("chicago", "Chicago"),
        ("seattle", "Seattle"),
    ],
};

pub const TIME_OF_DAY_RULES: CategoryRules = CategoryRules {
    column: TIME_OF_DAY,
    aliases: &[
        ("mornin", "morning"),
        ("afternoo", "afternoon"),
        ("evenin", "evening"),
        ("nigh", "night"),
    ],
    canonical: &[
        ("morning", "Morning"),
        ("afternoon", "Afternoon"),
        ("evening", "Evening"),
        ("night", "Night"),
    ],
};

pub const DAY_OF_WEEK_RULES: CategoryRules = CategoryRules {
    column: DAY_OF_WEEK,
    aliases: &[
        ("monda", "monday"),
        ("tuesda", "tuesday"),
        ("wednesda", "wednesday"),
        ("thursda", "thursday"),
        ("frida", "friday"),
        ("saturda", "saturday"),
        ("sunda", "sunday"),
    ],
    canonical: &[
        ("monday", "Monday"),
        ("tuesday", "Tuesday"),
        ("wednesday", "Wednesday"),
        ("thursday", "Thursday"),
        ("friday", "Friday"),
        ("saturday", "Saturday"),
        ("sunday", "Sunday"),
    ],
};

/// `Level` stays a label of its own; the charts filter it out.
pub const CHARGER_TYPE_RULES: CategoryRules = CategoryRules {
    column: CHARGER_TYPE,
    aliases: &[("dc fast charge", "dc fast charger")],
    canonical: &[
        ("level 1", "Level 1"),
        ("level 2", "Level 2"),
        ("dc fast charger", "Dc Fast Charger"),
        ("level", "Level"),
    ],
};

pub const USER_TYPE_RULES: CategoryRules = CategoryRules {
    column: USER_TYPE,
    aliases: &[
        ("commute", "commuter"),
        ("long-distance travele", "long distance traveler"),
        ("long-distance traveler", "long distance traveler"),
    ],
    canonical: &[
        ("commuter", "Commuter"),
        ("long distance traveler", "Long Distance Traveler"),
    ],
};

/// Rule set of every categorical column, in cleaning order.
pub const CATEGORY_RULES: [CategoryRules; 6] = [
    VEHICLE_RULES,
    LOCATION_RULES,
    TIME_OF_DAY_RULES,
    DAY_OF_WEEK_RULES,
    CHARGER_TYPE_RULES,
    USER_TYPE_RULES,
];

/// Rules registered for `column`, if any.
pub fn rules_for(column: &str) -> Option<&'static CategoryRules> {
    CATEGORY_RULES.iter().find(|rules| rules.column == column)
}

// ── Column operations ───────────────────────────────────────────────────────

/// Applies [`CATEGORY_RULES`] to a table.
#[derive(Debug, Default, Clone, Copy)]
pub struct CategoricalNormalizer;

impl CategoricalNormalizer {
    /// Clean every registered categorical column in place.
    pub fn clean_all(&self, df: &mut DataFrame) -> Result<Vec<CategoricalCleaningStats>> {
        info!("Cleaning {} categorical columns...", CATEGORY_RULES.len());
        CATEGORY_RULES
            .iter()
            .map(|rules| self.clean_column(df, rules))
            .collect()
    }

    /// Clean one column in place. Non-text columns are cast to text first.
    pub fn clean_column(
        &self,
        df: &mut DataFrame,
        rules: &CategoryRules,
    ) -> Result<CategoricalCleaningStats> {
        let raw = series_to_strings(require_series(df, rules.column)?)?;

        let mut stats = CategoricalCleaningStats::new(rules.column);
        let mut unrecognized = BTreeSet::new();
        let mut cleaned = Vec::with_capacity(raw.len());

        for value in &raw {
            let result = rules.clean_value(value.as_deref());

            match (value, &result) {
                (Some(_), None) => stats.values_made_missing += 1,
                (Some(before), Some(after)) if before != after => stats.values_changed += 1,
                _ => {}
            }
            if let Some(label) = &result {
                if !rules.is_canonical(label) {
                    unrecognized.insert(label.clone());
                }
            }

            cleaned.push(result);
        }

        stats.missing_after = cleaned.iter().filter(|v| v.is_none()).count();
        stats.unrecognized = unrecognized.into_iter().collect();

        df.replace(rules.column, Series::new(rules.column.into(), cleaned))?;

        debug!(
            "Cleaned '{}': {} changed, {} made missing, {} missing total",
            rules.column, stats.values_changed, stats.values_made_missing, stats.missing_after
        );
        if !stats.unrecognized.is_empty() {
            warn!(
                "Unrecognized values left in '{}': {:?}",
                rules.column, stats.unrecognized
            );
        }

        Ok(stats)
    }
}

/// Unique values of a column in order of first appearance, missing included.
pub fn unique_values(df: &DataFrame, column: &str) -> Result<UniqueValueListing> {
    let values = series_to_strings(require_series(df, column)?)?;

    let mut seen = HashSet::new();
    let unique = values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect();

    Ok(UniqueValueListing {
        column: column.to_string(),
        values: unique,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(series: &Series) -> Vec<Option<String>> {
        series_to_strings(series).unwrap()
    }

    // ========================================================================
    // normalize_text() tests
    // ========================================================================

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize_text("  Audi E-Tro  "), Some("audi e-tro".to_string()));
    }

    #[test]
    fn test_normalize_strips_trailing_hashes() {
        assert_eq!(normalize_text("Seattle#"), Some("seattle".to_string()));
        assert_eq!(normalize_text("Seattle###"), Some("seattle".to_string()));
        assert_eq!(normalize_text("New York ##"), Some("new york".to_string()));
        // Only a trailing run is stripped
        assert_eq!(normalize_text("#1 Station"), Some("#1 station".to_string()));
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(
            normalize_text("Long-Distance \t  Traveler"),
            Some("long-distance traveler".to_string())
        );
    }

    #[test]
    fn test_normalize_nan_text_is_missing() {
        assert_eq!(normalize_text("nan"), None);
        assert_eq!(normalize_text(" NaN "), None);
    }

    // ========================================================================
    // CategoryRules::clean_value() tests
    // ========================================================================

    #[test]
    fn test_alias_then_canonical() {
        assert_eq!(
            VEHICLE_RULES.clean_value(Some("Audi E-Tro  ")),
            Some("Audi e-Tron".to_string())
        );
        assert_eq!(
            USER_TYPE_RULES.clean_value(Some("Long-Distance Travele")),
            Some("Long Distance Traveler".to_string())
        );
        assert_eq!(
            CHARGER_TYPE_RULES.clean_value(Some("DC Fast Charge#")),
            Some("Dc Fast Charger".to_string())
        );
        assert_eq!(
            LOCATION_RULES.clean_value(Some("  new   yor ##")),
            Some("New York".to_string())
        );
    }

    #[test]
    fn test_every_alias_reaches_its_canonical_label() {
        for rules in CATEGORY_RULES {
            for (typo, target) in rules.aliases {
                let expected = rules.canonical_label(target).map(str::to_string);
                assert!(expected.is_some(), "alias target {target} has no label");
                assert_eq!(rules.clean_value(Some(typo)), expected);
            }
        }
    }

    #[test]
    fn test_missing_is_preserved() {
        for rules in CATEGORY_RULES {
            assert_eq!(rules.clean_value(None), None);
        }
    }

    #[test]
    fn test_unknown_sentinel_becomes_missing() {
        assert_eq!(TIME_OF_DAY_RULES.clean_value(Some("Unknown")), None);
        assert_eq!(TIME_OF_DAY_RULES.clean_value(Some("UNKNOWN#")), None);
    }

    #[test]
    fn test_blank_text_is_kept_as_empty_category() {
        assert_eq!(CHARGER_TYPE_RULES.clean_value(Some("   ")), Some(String::new()));
        assert_eq!(DAY_OF_WEEK_RULES.clean_value(Some("###")), Some(String::new()));
    }

    #[test]
    fn test_unrecognized_value_passes_through_normalized() {
        assert_eq!(
            VEHICLE_RULES.clean_value(Some("Rivian  R1T")),
            Some("rivian r1t".to_string())
        );
    }

    #[test]
    fn test_level_label_is_kept() {
        assert_eq!(
            CHARGER_TYPE_RULES.clean_value(Some("level")),
            Some("Level".to_string())
        );
        assert_eq!(
            CHARGER_TYPE_RULES.clean_value(Some("Level 2")),
            Some("Level 2".to_string())
        );
    }

    #[test]
    fn test_canonical_labels_are_fixed_points() {
        for rules in CATEGORY_RULES {
            for label in rules.labels() {
                assert_eq!(rules.clean_value(Some(label)), Some(label.to_string()));
            }
        }
    }

    #[test]
    fn test_lowercased_labels_never_collide_with_alias_keys() {
        for rules in CATEGORY_RULES {
            for label in rules.labels() {
                let lowered = normalize_text(label).unwrap();
                assert!(
                    rules.alias(&lowered).is_none(),
                    "{label} collides with an alias key in {}",
                    rules.column
                );
            }
        }
    }

    // ========================================================================
    // CategoricalNormalizer tests
    // ========================================================================

    #[test]
    fn test_clean_column_rewrites_in_place() {
        let mut df = df![
            "VehicleModel" => [Some("Tesla Model"), None, Some("nissan lea#"), Some("Mystery Car")],
        ]
        .unwrap();

        let stats = CategoricalNormalizer
            .clean_column(&mut df, &VEHICLE_RULES)
            .unwrap();

        assert_eq!(
            strings(df.column("VehicleModel").unwrap().as_materialized_series()),
            vec![
                Some("Tesla Model 3".to_string()),
                None,
                Some("Nissan Leaf".to_string()),
                Some("mystery car".to_string()),
            ]
        );
        assert_eq!(stats.values_changed, 3);
        assert_eq!(stats.values_made_missing, 0);
        assert_eq!(stats.missing_after, 1);
        assert_eq!(stats.unrecognized, vec!["mystery car".to_string()]);
    }

    #[test]
    fn test_clean_column_keeps_blank_text_as_unrecognized() {
        let mut df = df!["ChargerType" => ["Level 1", "  #  "]].unwrap();

        let stats = CategoricalNormalizer
            .clean_column(&mut df, &CHARGER_TYPE_RULES)
            .unwrap();

        assert_eq!(stats.values_made_missing, 0);
        assert_eq!(stats.missing_after, 0);
        assert_eq!(stats.unrecognized, vec![String::new()]);
        assert_eq!(
            strings(df.column("ChargerType").unwrap().as_materialized_series()),
            vec![Some("Level 1".to_string()), Some(String::new())]
        );
    }

    #[test]
    fn test_clean_column_counts_values_made_missing() {
        let mut df = df!["UserType" => ["Commute", "unknown", "Commuter"]].unwrap();

        let stats = CategoricalNormalizer
            .clean_column(&mut df, &USER_TYPE_RULES)
            .unwrap();

        assert_eq!(stats.values_made_missing, 1);
        assert_eq!(stats.values_changed, 1);
        assert_eq!(df.column("UserType").unwrap().null_count(), 1);
    }

    #[test]
    fn test_clean_column_is_idempotent() {
        let mut df = df![
            "ChargingStationLocation" => [Some("los angele"), Some("Chicago#"), None, Some("Paris")],
        ]
        .unwrap();

        CategoricalNormalizer
            .clean_column(&mut df, &LOCATION_RULES)
            .unwrap();
        let once = strings(df.column("ChargingStationLocation").unwrap().as_materialized_series());

        let stats = CategoricalNormalizer
            .clean_column(&mut df, &LOCATION_RULES)
            .unwrap();
        let twice = strings(df.column("ChargingStationLocation").unwrap().as_materialized_series());

        assert_eq!(once, twice);
        assert_eq!(stats.values_changed, 0);
    }

    #[test]
    fn test_clean_column_missing_column() {
        let mut df = df!["Other" => ["a"]].unwrap();
        let err = CategoricalNormalizer
            .clean_column(&mut df, &VEHICLE_RULES)
            .unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_clean_all_covers_six_columns() {
        let mut df = df![
            "VehicleModel" => ["chevy bol"],
            "ChargingStationLocation" => ["SEATTL"],
            "TimeOfDay" => ["Nigh#"],
            "DayOfWeek" => ["frida"],
            "ChargerType" => ["level 1"],
            "UserType" => ["commute"],
        ]
        .unwrap();

        let stats = CategoricalNormalizer.clean_all(&mut df).unwrap();
        assert_eq!(stats.len(), 6);

        let row: Vec<Option<String>> = CATEGORY_RULES
            .iter()
            .flat_map(|rules| strings(df.column(rules.column).unwrap().as_materialized_series()))
            .collect();
        assert_eq!(
            row,
            vec![
                Some("Chevy Bolt".to_string()),
                Some("Seattle".to_string()),
                Some("Night".to_string()),
                Some("Friday".to_string()),
                Some("Level 1".to_string()),
                Some("Commuter".to_string()),
            ]
        );
    }

    #[test]
    fn test_rules_for_lookup() {
        assert_eq!(rules_for("DayOfWeek").unwrap().column, "DayOfWeek");
        assert!(rules_for("TemperatureC").is_none());
    }

    // ========================================================================
    // unique_values() tests
    // ========================================================================

    #[test]
    fn test_unique_values_first_appearance_order() {
        let df = df!["DayOfWeek" => [Some("Monday"), None, Some("Friday"), Some("Monday"), None]]
            .unwrap();
        let listing = unique_values(&df, "DayOfWeek").unwrap();
        assert_eq!(listing.column, "DayOfWeek");
        assert_eq!(
            listing.values,
            vec![Some("Monday".to_string()), None, Some("Friday".to_string())]
        );
    }
}
