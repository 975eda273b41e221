//! Configuration for column names, the header marker and report layout

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Main pivot configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl PivotConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: PivotConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Reject configurations that could never match a sheet or produce a
    /// valid workbook
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("input.marker", &self.input.marker),
            ("input.address_column", &self.input.address_column),
            ("input.description_column", &self.input.description_column),
            ("input.barcode_column", &self.input.barcode_column),
            ("input.stock_column", &self.input.stock_column),
            ("input.network_column", &self.input.network_column),
            ("output.category_header", &self.output.category_header),
            ("output.codes_header", &self.output.codes_header),
            ("output.file_name", &self.output.file_name),
        ];
        for (key, value) in named {
            if value.trim().is_empty() {
                anyhow::bail!("Configuration error: '{}' must not be blank", key);
            }
            if value.trim() != value.as_str() && key != "input.marker" {
                anyhow::bail!(
                    "Configuration error: '{}' has leading or trailing whitespace; header names are trimmed before matching",
                    key
                );
            }
        }

        let mut seen = HashSet::new();
        for column in self.input.required_columns() {
            if !seen.insert(column) {
                anyhow::bail!(
                    "Configuration error: required column '{}' is listed more than once",
                    column
                );
            }
        }

        let sheet_name = &self.output.sheet_name;
        if sheet_name.is_empty() || sheet_name.chars().count() > 31 {
            anyhow::bail!(
                "Configuration error: output.sheet_name must be 1 to 31 characters long, got '{}'",
                sheet_name
            );
        }
        if let Some(c) = sheet_name
            .chars()
            .find(|c| matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        {
            anyhow::bail!(
                "Configuration error: output.sheet_name contains forbidden character '{}'",
                c
            );
        }

        Ok(())
    }
}

/// Where to find things in an input sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Exact text of the first-column cell that marks the header row
    pub marker: String,
    pub address_column: String,
    pub description_column: String,
    pub barcode_column: String,
    pub stock_column: String,
    /// Column holding the network name in data rows
    pub network_column: String,
    /// Network name used when the network column is missing or blank
    pub unknown_network: String,
}

impl InputConfig {
    /// Required column names, in the order they are checked
    pub fn required_columns(&self) -> [&str; 4] {
        [
            self.address_column.as_str(),
            self.description_column.as_str(),
            self.barcode_column.as_str(),
            self.stock_column.as_str(),
        ]
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            marker: "Сеть".to_string(),
            address_column: "Адрес торгового объекта".to_string(),
            description_column: "Описание номенклатуры".to_string(),
            barcode_column: "Штрих_код".to_string(),
            stock_column: "Остаток".to_string(),
            network_column: "Сеть".to_string(),
            unknown_network: "Неизвестно".to_string(),
        }
    }
}

/// Report layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub sheet_name: String,
    pub file_name: String,
    pub category_header: String,
    pub codes_header: String,
    /// Group and report by network (multi-network consolidation)
    pub include_network: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Сводная по сетям".to_string(),
            file_name: "Сводная_по_всем_сетям.xlsx".to_string(),
            category_header: "Категория".to_string(),
            codes_header: "СКЮ КОДЫ".to_string(),
            include_network: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PivotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.input.marker, "Сеть");
        assert_eq!(
            config.input.required_columns(),
            [
                "Адрес торгового объекта",
                "Описание номенклатуры",
                "Штрих_код",
                "Остаток"
            ]
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: PivotConfig = toml::from_str(
            r#"
            [input]
            stock_column = "Остаток, шт"

            [output]
            include_network = false
            "#,
        )
        .unwrap();

        assert_eq!(config.input.stock_column, "Остаток, шт");
        assert_eq!(config.input.barcode_column, "Штрих_код");
        assert!(!config.output.include_network);
        assert_eq!(config.output.codes_header, "СКЮ КОДЫ");
    }

    #[test]
    fn test_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("stockpivot.toml");
        fs::write(&path, "[output]\nsheet_name = \"Итог\"\n")?;

        let config = PivotConfig::from_file(&path)?;
        assert_eq!(config.output.sheet_name, "Итог");
        assert_eq!(config.input, InputConfig::default());
        Ok(())
    }

    #[test]
    fn test_validation() {
        let config = PivotConfig::default();

        // Blank column name
        let mut bad_config = config.clone();
        bad_config.input.barcode_column = "  ".to_string();
        assert!(bad_config.validate().is_err());

        // Untrimmed column name can never match a trimmed header
        let mut bad_config = config.clone();
        bad_config.input.stock_column = "Остаток ".to_string();
        assert!(bad_config.validate().is_err());

        // Duplicate required column
        let mut bad_config = config.clone();
        bad_config.input.stock_column = bad_config.input.barcode_column.clone();
        assert!(bad_config.validate().is_err());

        // Sheet name too long
        let mut bad_config = config.clone();
        bad_config.output.sheet_name = "x".repeat(32);
        assert!(bad_config.validate().is_err());

        // Forbidden character in sheet name
        let mut bad_config = config.clone();
        bad_config.output.sheet_name = "A/B".to_string();
        assert!(bad_config.validate().is_err());
    }
}
