//! Output rendering: GeoJSON feature collection or flattened CSV.

use crate::error::{Result, TrafficError};
use geojson::{Feature, FeatureCollection};
use jartic_types::OutputFormat;
use serde_json::{Value, json};
use std::collections::BTreeSet;

/// Rendered aggregate, ready to hand back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedOutput {
    /// Features wrapped unchanged
    Geographic(FeatureCollection),
    /// CSV text. Empty when there were no features.
    Tabular(String),
}

impl RenderedOutput {
    pub fn format(&self) -> OutputFormat {
        match self {
            RenderedOutput::Geographic(_) => OutputFormat::GeoJson,
            RenderedOutput::Tabular(_) => OutputFormat::Csv,
        }
    }

    /// Structured form: the collection itself, or `{"type": "text/csv", "data": ...}`.
    pub fn to_envelope(&self) -> Result<Value> {
        match self {
            RenderedOutput::Geographic(collection) => Ok(serde_json::to_value(collection)?),
            RenderedOutput::Tabular(data) => Ok(json!({
                "type": OutputFormat::Csv.media_type(),
                "data": data,
            })),
        }
    }

    /// Text form: GeoJSON for collections, the CSV payload verbatim otherwise.
    pub fn into_text(self) -> Result<String> {
        match self {
            RenderedOutput::Geographic(collection) => Ok(serde_json::to_string(&collection)?),
            RenderedOutput::Tabular(data) => Ok(data),
        }
    }
}

/// Render an aggregate in the requested format.
pub fn render(features: Vec<Feature>, format: OutputFormat) -> Result<RenderedOutput> {
    match format {
        OutputFormat::GeoJson => Ok(RenderedOutput::Geographic(to_feature_collection(features))),
        OutputFormat::Csv => Ok(RenderedOutput::Tabular(to_csv(&features)?)),
    }
}

pub fn to_feature_collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Sorted union of property names over all features.
pub fn property_columns(features: &[Feature]) -> Vec<String> {
    let columns: BTreeSet<&str> = features
        .iter()
        .filter_map(|feature| feature.properties.as_ref())
        .flat_map(|props| props.keys().map(String::as_str))
        .collect();
    columns.into_iter().map(str::to_string).collect()
}

/// Flatten feature properties to CSV.
///
/// The header is the sorted union of property names; a feature missing a
/// column gets an empty cell. Geometry is not exported. No features means an
/// empty string, not a bare header.
///
/// With a single column an empty cell is written as `""` so the row stays
/// distinguishable from a blank line.
///
/// # Examples
///
/// ```
/// use jartic::compute::render::to_csv;
/// use geojson::Feature;
///
/// assert_eq!(to_csv(&[]).unwrap(), "");
///
/// let mut a = Feature::default();
/// a.set_property("count", 12);
/// let mut b = Feature::default();
/// b.set_property("name", "Odawara");
/// assert_eq!(to_csv(&[a, b]).unwrap(), "count,name\n12,\n,Odawara\n");
/// ```
pub fn to_csv(features: &[Feature]) -> Result<String> {
    if features.is_empty() {
        return Ok(String::new());
    }

    let columns = property_columns(features);
    if columns.is_empty() {
        // csv cannot express a zero-field record; keep one line per row.
        return Ok("\n".repeat(features.len() + 1));
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&columns)?;
    for feature in features {
        let row = columns.iter().map(|column| {
            feature
                .properties
                .as_ref()
                .and_then(|props| props.get(column))
                .map(cell)
                .unwrap_or_default()
        });
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TrafficError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        TrafficError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::{Geometry, Value as GeoValue};

    fn observation(props: Value) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoValue::Point(vec![139.2, 35.3]))),
            id: None,
            properties: props.as_object().cloned(),
            foreign_members: None,
        }
    }

    #[test]
    fn test_empty_geojson_collection() {
        let output = render(Vec::new(), OutputFormat::GeoJson).unwrap();
        assert_eq!(output.format(), OutputFormat::GeoJson);
        let text = output.into_text().unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(&text).unwrap(),
            json!({"type": "FeatureCollection", "features": []})
        );
    }

    #[test]
    fn test_empty_csv_is_empty_string() {
        let output = render(Vec::new(), OutputFormat::Csv).unwrap();
        assert_eq!(output, RenderedOutput::Tabular(String::new()));
        assert_eq!(
            output.to_envelope().unwrap(),
            json!({"type": "text/csv", "data": ""})
        );
    }

    #[test]
    fn test_geojson_wraps_features_unchanged() {
        let features = vec![
            observation(json!({"交通量": 120})),
            observation(json!({"交通量": 80})),
        ];
        let output = render(features.clone(), OutputFormat::GeoJson).unwrap();
        let RenderedOutput::Geographic(collection) = &output else {
            panic!("expected a feature collection");
        };
        assert_eq!(collection.features, features);

        let envelope = output.to_envelope().unwrap();
        assert_eq!(envelope["type"], "FeatureCollection");
        assert_eq!(envelope["features"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_csv_header_is_sorted_union() {
        let features = vec![
            observation(json!({"b": 1, "a": "x"})),
            observation(json!({"c": true})),
        ];
        let csv = to_csv(&features).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, ["a,b,c", "x,1,", ",,true"]);
    }

    #[test]
    fn test_csv_rows_match_header_width() {
        let features = vec![
            observation(json!({"常時観測点コード": "3110130", "交通量": 42})),
            observation(json!({"常時観測点コード": "3110140"})),
            observation(json!({"備考": null, "区間": {"from": 1, "to": 2}})),
        ];
        let csv = to_csv(&features).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let header = reader.headers().unwrap().clone();
        assert_eq!(header.len(), 4);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.len() == header.len()));
    }

    #[test]
    fn test_csv_cells_quote_and_flatten() {
        let features = vec![observation(
            json!({"name": "Route 1, north", "nested": [1, 2], "none": null}),
        )];
        let csv = to_csv(&features).unwrap();
        assert_eq!(csv, "name,nested,none\n\"Route 1, north\",\"[1,2]\",\n");
    }

    #[test]
    fn test_single_column_empty_cell_is_quoted() {
        let features = vec![
            observation(json!({"x": 1})),
            observation(json!({})),
            observation(json!({"x": null})),
        ];
        assert_eq!(to_csv(&features).unwrap(), "x\n1\n\"\"\n\"\"\n");
    }

    #[test]
    fn test_csv_without_properties() {
        let features = vec![Feature::default(), Feature::default()];
        assert_eq!(to_csv(&features).unwrap(), "\n\n\n");
    }
}
