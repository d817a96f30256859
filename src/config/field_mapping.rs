use crate::core::timestamp::TimeFormat;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Column positions of every mapped field in a raw row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ColumnIndices {
    #[serde(rename = "start-time", alias = "pickup-time")]
    pub pickup_time: usize,
    #[serde(rename = "end-time", alias = "dropoff-time")]
    pub dropoff_time: usize,
    pub start_block: usize,
    pub start_tract: usize,
    pub start_county: usize,
    pub end_block: usize,
    pub end_tract: usize,
    pub end_county: usize,
    pub start_lat: usize,
    #[serde(rename = "start-long", alias = "start-lon")]
    pub start_lon: usize,
    pub end_lat: usize,
    #[serde(rename = "end-long", alias = "end-lon")]
    pub end_lon: usize,
}

impl ColumnIndices {
    pub fn max_index(&self) -> usize {
        [
            self.pickup_time,
            self.dropoff_time,
            self.start_block,
            self.start_tract,
            self.start_county,
            self.end_block,
            self.end_tract,
            self.end_county,
            self.start_lat,
            self.start_lon,
            self.end_lat,
            self.end_lon,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Minimum row width a translation needs. Saturates for `usize::MAX`.
    pub fn required_columns(&self) -> usize {
        self.max_index().saturating_add(1)
    }
}

/// Loaded once at startup and passed by reference to everything that needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    #[serde(rename = "elk-address", alias = "endpoint")]
    pub endpoint: String,
    #[serde(rename = "input-address", alias = "input-path")]
    pub input_path: String,
    #[serde(rename = "time-format")]
    pub time_format: TimeFormat,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(flatten)]
    pub columns: ColumnIndices,
}

fn default_delimiter() -> char {
    ','
}

impl FieldMapping {
    /// Loads a JSON document, or TOML when the file ends in `.toml`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| EtlError::ConfigReadError {
                path: path.display().to_string(),
                source,
            })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        serde_json::from_str(&processed).map_err(|e| EtlError::ConfigValidationError {
            field: "json_parsing".to_string(),
            message: format!("JSON parsing error: {}", e),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        validation::validate_delimiter("delimiter", self.delimiter)
    }
}

impl Validate for FieldMapping {
    fn validate(&self) -> Result<()> {
        validation::validate_url("elk-address", &self.endpoint)?;
        validation::validate_path("input-address", &self.input_path)?;
        validation::validate_non_empty_string("time-format", &self.time_format.to_string())?;
        if !self.time_format.has_directives() {
            return Err(EtlError::InvalidConfigValueError {
                field: "time-format".to_string(),
                value: self.time_format.to_string(),
                reason: "Pattern has no strftime directives or Go layout tokens".to_string(),
            });
        }
        self.delimiter_byte()?;
        Ok(())
    }
}

/// Replaces `${NAME}` with the value of the environment variable, leaving
/// unknown names untouched.
fn substitute_env_vars(content: &str) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
    });

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}
