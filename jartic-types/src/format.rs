use crate::UnknownVariant;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output rendering requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    /// GeoJSON `FeatureCollection`
    #[default]
    GeoJson,
    /// Flattened comma-separated properties, one row per feature
    Csv,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::GeoJson => "geojson",
            OutputFormat::Csv => "csv",
        }
    }

    /// MIME type of the rendered payload.
    pub fn media_type(&self) -> &'static str {
        match self {
            OutputFormat::GeoJson => "application/geo+json",
            OutputFormat::Csv => "text/csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "geojson" => Ok(OutputFormat::GeoJson),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(UnknownVariant {
                kind: "output format",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.as_str().to_string()
    }
}
