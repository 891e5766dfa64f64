//! Report configuration: naming conventions and the outlet directory.
//!
//! The code-stripping rules and the outlet-code lookup table are deployment
//! data, not pipeline logic. They are plain serde types so a TOML file can
//! override any of the compiled defaults.

use serde::{Deserialize, Serialize};

/// String transforms that strip internal codes from display names.
///
/// The source exports couple display names to internal codes with a fixed
/// convention: items carry a SKU prefix before the first separator, outlets
/// carry a brand marker before the location name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Item names keep everything after the first occurrence of this separator
    pub item_separator: String,
    /// Outlet names keep everything after the first occurrence of this marker
    pub outlet_marker: String,
    /// Label the POS export prepends to outlet values, stripped for sheet names
    pub sheet_prefix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            item_separator: "-".into(),
            outlet_marker: "-KOMUGI".into(),
            sheet_prefix: "Outlet: ".into(),
        }
    }
}

impl NamingConfig {
    /// Strip the SKU code from an item name: `SKU001-Croissant` -> `Croissant`.
    ///
    /// Names without the separator are kept unchanged.
    pub fn strip_item(&self, raw: &str) -> String {
        match raw.split_once(&self.item_separator) {
            Some((_, rest)) => rest.to_string(),
            None => raw.to_string(),
        }
    }

    /// Strip everything up to and including the brand marker from an outlet
    /// name, plus one leading separator: `Outlet: X-KOMUGI-Bakery` -> `Bakery`.
    ///
    /// Values without the marker are kept unchanged.
    pub fn strip_outlet(&self, raw: &str) -> String {
        match raw.find(&self.outlet_marker) {
            Some(pos) => {
                let rest = &raw[pos + self.outlet_marker.len()..];
                rest.strip_prefix('-').unwrap_or(rest).to_string()
            }
            None => raw.to_string(),
        }
    }

    /// Workbook sheet name for an outlet: prefix stripped, at most 31 chars
    /// (the xlsx sheet name limit).
    pub fn sheet_name(&self, outlet: &str) -> String {
        let stripped = outlet.strip_prefix(&self.sheet_prefix).unwrap_or(outlet);
        stripped.chars().take(31).collect()
    }
}

/// One entry of the outlet-code lookup table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutletEntry {
    /// Short code, also the forecast workbook sheet name
    pub code: String,
    /// Display name matched (case-insensitively) against outlet values
    pub name: String,
}

impl OutletEntry {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Full report configuration with compiled defaults
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub naming: NamingConfig,
    /// Outlet-code lookup table driving forecast comparison
    pub outlets: Vec<OutletEntry>,
    /// Outlet codes whose forecast reports Mon-Thu and Fri separately;
    /// their Weekday figure is the mean of the two sub-columns
    pub split_weekday_outlets: Vec<String>,
    /// Currency prefix used by the renderer's number format
    pub currency: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            naming: NamingConfig::default(),
            outlets: default_outlets(),
            split_weekday_outlets: vec!["MV".into(), "PV".into(), "OU".into()],
            currency: "RM".into(),
        }
    }
}

impl ReportConfig {
    pub fn has_split_weekday(&self, code: &str) -> bool {
        self.split_weekday_outlets.iter().any(|c| c == code)
    }
}

/// The 14-outlet directory shipped as default configuration
fn default_outlets() -> Vec<OutletEntry> {
    vec![
        OutletEntry::new("MV", "Mid Valley"),
        OutletEntry::new("PV", "Pavilion"),
        OutletEntry::new("OU", "One Utama"),
        OutletEntry::new("SA", "Setia Alam"),
        OutletEntry::new("QM", "Queensbay Mall"),
        OutletEntry::new("MM", "Melawati Mall"),
        OutletEntry::new("KLE", "KL East Mall"),
        OutletEntry::new("KL", "KLCC"),
        OutletEntry::new("DP", "DPulze"),
        OutletEntry::new("SS2", "SS2"),
        OutletEntry::new("PD", "Paradigm"),
        OutletEntry::new("TP", "Tropicana Gardens"),
        OutletEntry::new("MP", "MyTown"),
        OutletEntry::new("SW", "Sunway Pyramid"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn item_code_stripping() {
        let naming = NamingConfig::default();
        assert_eq!(naming.strip_item("SKU001-Croissant"), "Croissant");
        assert_eq!(naming.strip_item("SKU2-Kaya-Butter Toast"), "Kaya-Butter Toast");
        assert_eq!(naming.strip_item("PlainName"), "PlainName");
    }

    #[test]
    fn outlet_marker_stripping() {
        let naming = NamingConfig::default();
        assert_eq!(naming.strip_outlet("Outlet: X-KOMUGI-Bakery"), "Bakery");
        assert_eq!(naming.strip_outlet("12-KOMUGI-Mid Valley"), "Mid Valley");
        // No marker: value kept unchanged rather than dropped.
        assert_eq!(naming.strip_outlet("Central Kitchen"), "Central Kitchen");
    }

    #[test]
    fn sheet_name_truncation() {
        let naming = NamingConfig::default();
        assert_eq!(naming.sheet_name("Outlet: Mid Valley"), "Mid Valley");
        let long = "A very long outlet display name exceeding the limit";
        assert_eq!(naming.sheet_name(long).chars().count(), 31);
    }

    #[test]
    fn default_directory_has_fourteen_outlets() {
        let config = ReportConfig::default();
        assert_eq!(config.outlets.len(), 14);
        assert!(config.has_split_weekday("MV"));
        assert!(!config.has_split_weekday("KL"));
    }
}
