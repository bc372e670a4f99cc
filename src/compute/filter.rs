//! CQL filter construction for a single quantum.

use crate::compute::quanta::TimeQuantum;
use jartic_types::RoadType;
use std::fmt;

pub const ROAD_TYPE_FIELD: &str = "道路種別";
pub const TIME_CODE_FIELD: &str = "時間コード";
pub const GEOMETRY_FIELD: &str = "ジオメトリ";
pub const POINT_CODE_FIELD: &str = "常時観測点コード";

pub const SRS_NAME: &str = "EPSG:4326";

/// A conjunction of CQL predicates, rendered joined by ` AND `.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpression {
    predicates: Vec<String>,
}

impl FilterExpression {
    pub fn predicates(&self) -> &[String] {
        &self.predicates
    }

    pub fn to_cql(&self) -> String {
        self.predicates.join(" AND ")
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cql())
    }
}

/// Build the filter for one quantum.
///
/// The observation-point predicate is emitted only for a non-empty code set:
/// equality for one code, `IN` for several. `bbox` is the comma-joined
/// `west,south,east,north` text and is inserted as given.
///
/// # Examples
///
/// ```
/// use jartic::compute::filter::build;
/// use jartic::compute::quanta::{parse_timestamp, TimeQuantum};
/// use jartic_types::RoadType;
///
/// let quantum = TimeQuantum::new(parse_timestamp("2024-01-01T00:05").unwrap());
/// let filter = build(RoadType::NationalRoad, &quantum, "139.15,35.14,139.32,35.56", &[]);
/// assert_eq!(
///     filter.to_cql(),
///     "道路種別='3' AND 時間コード='202401010005' AND BBOX(ジオメトリ,139.15,35.14,139.32,35.56,'EPSG:4326')"
/// );
/// ```
pub fn build(
    road_type: RoadType,
    quantum: &TimeQuantum,
    bbox: &str,
    point_codes: &[String],
) -> FilterExpression {
    let mut predicates = vec![
        format!("{}={}", ROAD_TYPE_FIELD, quote(road_type.code())),
        format!("{}={}", TIME_CODE_FIELD, quote(&quantum.time_code())),
        format!("BBOX({},{},{})", GEOMETRY_FIELD, bbox, quote(SRS_NAME)),
    ];

    match point_codes {
        [] => {}
        [code] => predicates.push(format!("{}={}", POINT_CODE_FIELD, quote(code))),
        codes => {
            let members: Vec<String> = codes.iter().map(|code| quote(code)).collect();
            predicates.push(format!("{} IN ({})", POINT_CODE_FIELD, members.join(",")));
        }
    }

    FilterExpression { predicates }
}

/// CQL string literal; embedded single quotes are doubled.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
