//! Query arguments as supplied by a caller, and their validated form.

use crate::compute::bbox;
use crate::compute::quanta::{self, TimeQuanta};
use crate::error::{Result, TrafficError};
use chrono::NaiveDateTime;
use geo::Point;
use jartic_types::{BoundingBox, OutputFormat, RoadType};
use serde::{Deserialize, Serialize};

/// Raw argument record, deserialized from the caller's JSON arguments.
///
/// ```rust
/// use jartic::QueryArgs;
///
/// let args: QueryArgs = serde_json::from_value(serde_json::json!({
///     "roadType": "3",
///     "startTime": "2024-01-01T00:00:00",
///     "endTime": "2024-01-01T00:10:00",
///     "bbox": "139.15,35.14,139.32,35.56",
///     "outputFormat": "csv"
/// })).unwrap();
/// let request = args.validate().unwrap();
/// assert_eq!(request.quanta().unwrap().count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryArgs {
    pub road_type: RoadType,
    pub start_time: String,
    pub end_time: String,
    /// `west,south,east,north`; wins over the center form when both are given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_km: Option<f64>,
    /// Absent and empty both mean "all observation points"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_codes: Option<Vec<String>>,
    /// Absent and `null` both mean GeoJSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
}

impl QueryArgs {
    pub fn new(road_type: RoadType, start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            road_type,
            start_time: start_time.into(),
            end_time: end_time.into(),
            bbox: None,
            center_lat: None,
            center_lon: None,
            radius_km: None,
            point_codes: None,
            output_format: None,
        }
    }

    pub fn with_bbox(mut self, bbox: impl Into<String>) -> Self {
        self.bbox = Some(bbox.into());
        self
    }

    pub fn with_center(mut self, lat: f64, lon: f64, radius_km: f64) -> Self {
        self.center_lat = Some(lat);
        self.center_lon = Some(lon);
        self.radius_km = Some(radius_km);
        self
    }

    pub fn with_point_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.point_codes = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    /// Parse timestamps and pick the area representation.
    pub fn validate(&self) -> Result<QueryRequest> {
        QueryRequest::from_args(self)
    }
}

/// Where to look.
#[derive(Debug, Clone, PartialEq)]
pub enum Area {
    /// Explicit box; `text` is the caller's string, forwarded as given
    Box { bbox: BoundingBox, text: String },
    /// `center` is x = longitude, y = latitude
    Circle { center: Point, radius_km: f64 },
}

impl Area {
    /// Parse an explicit `west,south,east,north` box, keeping its text.
    pub fn explicit(text: &str) -> Result<Self> {
        let text = text.trim();
        Ok(Area::Box {
            bbox: text.parse()?,
            text: text.to_string(),
        })
    }

    /// Numeric extent of the area.
    pub fn resolve(&self) -> Result<BoundingBox> {
        match self {
            Area::Box { bbox, .. } => bbox::resolve(Some(*bbox), None, None),
            Area::Circle { center, radius_km } => {
                bbox::resolve(None, Some(*center), Some(*radius_km))
            }
        }
    }

    /// The comma-joined box sent to the service for every quantum.
    ///
    /// An explicit box goes out verbatim; a computed one uses
    /// [`BoundingBox`]'s `Display`.
    pub fn to_param(&self) -> Result<String> {
        match self {
            Area::Box { text, .. } => Ok(text.clone()),
            Area::Circle { .. } => Ok(self.resolve()?.to_string()),
        }
    }
}

/// Observation-point filter with blank entries removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointCodes(Vec<String>);

impl PointCodes {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            codes
                .into_iter()
                .map(|code| code.as_ref().trim().to_string())
                .filter(|code| !code.is_empty())
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A validated request: `start <= end` and exactly one resolvable area.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub road_type: RoadType,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub area: Area,
    pub point_codes: PointCodes,
    pub output_format: OutputFormat,
}

impl QueryRequest {
    pub fn from_args(args: &QueryArgs) -> Result<Self> {
        let start = quanta::parse_timestamp(&args.start_time)?;
        let end = quanta::parse_timestamp(&args.end_time)?;
        if start > end {
            return Err(TrafficError::InvalidTimeRange {
                start: args.start_time.clone(),
                end: args.end_time.clone(),
            });
        }

        let area = match (&args.bbox, args.center_lat, args.center_lon, args.radius_km) {
            (Some(text), ..) if !text.trim().is_empty() => Area::explicit(text)?,
            (_, Some(lat), Some(lon), Some(radius_km)) if radius_km > 0.0 => {
                validate_center(lat, lon, radius_km)?;
                Area::Circle {
                    center: Point::new(lon, lat),
                    radius_km,
                }
            }
            _ => return Err(TrafficError::MissingAreaSpecification),
        };

        Ok(Self {
            road_type: args.road_type,
            start,
            end,
            area,
            point_codes: PointCodes::new(args.point_codes.iter().flatten()),
            output_format: args.output_format.unwrap_or_default(),
        })
    }

    pub fn quanta(&self) -> Result<TimeQuanta> {
        quanta::slice(self.start, self.end)
    }

    pub fn bounding_box(&self) -> Result<BoundingBox> {
        self.area.resolve()
    }

    /// Serialized box for the `BBOX` predicate.
    pub fn bbox_param(&self) -> Result<String> {
        self.area.to_param()
    }
}

fn validate_center(lat: f64, lon: f64, radius_km: f64) -> Result<()> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(TrafficError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            lat
        )));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(TrafficError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            lon
        )));
    }
    if !radius_km.is_finite() {
        return Err(TrafficError::InvalidInput(format!(
            "Radius must be finite, got: {}",
            radius_km
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args() -> QueryArgs {
        QueryArgs::new(RoadType::NationalRoad, "2024-01-01T00:00:00", "2024-01-01T00:10:00")
    }

    #[test]
    fn test_deserialize_camel_case() {
        let args: QueryArgs = serde_json::from_value(json!({
            "roadType": "1",
            "startTime": "2024-01-01T00:00:00",
            "endTime": "2024-01-01T01:00:00",
            "centerLat": 35.68,
            "centerLon": 139.76,
            "radiusKm": 5,
            "pointCodes": ["A", "B"]
        }))
        .unwrap();
        assert_eq!(args.road_type, RoadType::Highway);
        assert_eq!(args.radius_km, Some(5.0));
        assert_eq!(args.output_format, None);
        assert_eq!(args.validate().unwrap().output_format, OutputFormat::GeoJson);
    }

    #[test]
    fn test_null_optionals_mean_absent() {
        let args: QueryArgs = serde_json::from_value(json!({
            "roadType": "3",
            "startTime": "2024-01-01T00:00:00",
            "endTime": "2024-01-01T00:10:00",
            "bbox": "139.15,35.14,139.32,35.56",
            "centerLat": null,
            "centerLon": null,
            "radiusKm": null,
            "pointCodes": null,
            "outputFormat": null
        }))
        .unwrap();
        assert_eq!(args.output_format, None);
        assert_eq!(args.point_codes, None);

        let request = args.validate().unwrap();
        assert_eq!(request.output_format, OutputFormat::GeoJson);
        assert!(request.point_codes.is_empty());
    }

    #[test]
    fn test_deserialize_rejects_unknown_road_type() {
        let result: std::result::Result<QueryArgs, _> = serde_json::from_value(json!({
            "roadType": "9",
            "startTime": "2024-01-01T00:00:00",
            "endTime": "2024-01-01T01:00:00"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_box_wins() {
        let request = args()
            .with_bbox("139.15,35.14,139.32,35.56")
            .with_center(35.0, 139.0, 5.0)
            .validate()
            .unwrap();
        assert!(matches!(request.area, Area::Box { .. }));
        assert_eq!(
            request.bounding_box().unwrap(),
            BoundingBox::new(139.15, 35.14, 139.32, 35.56)
        );
        assert_eq!(request.bbox_param().unwrap(), "139.15,35.14,139.32,35.56");
    }

    #[test]
    fn test_explicit_box_text_is_forwarded_verbatim() {
        let request = args()
            .with_bbox(" 139.150,35.140,139.320,35.560 ")
            .validate()
            .unwrap();
        assert_eq!(request.bbox_param().unwrap(), "139.150,35.140,139.320,35.560");
        assert_eq!(
            request.bounding_box().unwrap(),
            BoundingBox::new(139.15, 35.14, 139.32, 35.56)
        );
    }

    #[test]
    fn test_computed_box_param_uses_display() {
        let request = args().with_center(35.0, 139.0, 5.0).validate().unwrap();
        assert_eq!(
            request.bbox_param().unwrap(),
            request.bounding_box().unwrap().to_string()
        );
    }

    #[test]
    fn test_center_form() {
        let request = args().with_center(35.0, 139.0, 5.0).validate().unwrap();
        let bbox = request.bounding_box().unwrap();
        assert!(bbox.strictly_contains(&Point::new(139.0, 35.0)));
    }

    #[test]
    fn test_missing_area() {
        assert!(matches!(
            args().validate(),
            Err(TrafficError::MissingAreaSpecification)
        ));
        assert!(matches!(
            args().with_center(35.0, 139.0, 0.0).validate(),
            Err(TrafficError::MissingAreaSpecification)
        ));
        assert!(matches!(
            args().with_bbox("  ").validate(),
            Err(TrafficError::MissingAreaSpecification)
        ));
    }

    #[test]
    fn test_bad_bbox_text() {
        assert!(matches!(
            args().with_bbox("139.15,35.14").validate(),
            Err(TrafficError::InvalidBoundingBox(_))
        ));
    }

    #[test]
    fn test_center_out_of_range() {
        assert!(matches!(
            args().with_center(95.0, 139.0, 5.0).validate(),
            Err(TrafficError::InvalidInput(_))
        ));
        assert!(args().with_center(90.0, 0.0, 5.0).validate().is_ok());
    }

    #[test]
    fn test_time_errors() {
        let mut bad = args().with_bbox("1,2,3,4");
        bad.start_time = "not a time".to_string();
        assert!(matches!(bad.validate(), Err(TrafficError::InvalidTimeFormat(_))));

        let reversed = QueryArgs::new(RoadType::Highway, "2024-01-02", "2024-01-01").with_bbox("1,2,3,4");
        assert!(matches!(
            reversed.validate(),
            Err(TrafficError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn test_point_codes_absent_empty_and_blank() {
        let base = args().with_bbox("1,2,3,4");
        assert!(base.validate().unwrap().point_codes.is_empty());

        let empty = base.clone().with_point_codes(Vec::<String>::new());
        assert!(empty.validate().unwrap().point_codes.is_empty());

        let blank = base.with_point_codes([" ", " 3110130 "]);
        assert_eq!(blank.validate().unwrap().point_codes.as_slice(), ["3110130"]);
    }
}
