use crate::UnknownVariant;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Road classification understood by the traffic observation layer.
///
/// Serialized as the service's numeric code (`"1"` or `"3"`). Parsing also
/// accepts the snake_case names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RoadType {
    /// Expressways (code `1`)
    Highway,
    /// General national roads (code `3`)
    NationalRoad,
}

impl RoadType {
    pub const ALL: [RoadType; 2] = [RoadType::Highway, RoadType::NationalRoad];

    /// The code used by the remote schema.
    pub fn code(&self) -> &'static str {
        match self {
            RoadType::Highway => "1",
            RoadType::NationalRoad => "3",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RoadType::Highway => "highway",
            RoadType::NationalRoad => "national_road",
        }
    }
}

impl fmt::Display for RoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RoadType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        RoadType::ALL
            .into_iter()
            .find(|road| road.code() == s || road.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant {
                kind: "road type",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for RoadType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RoadType> for String {
    fn from(road: RoadType) -> Self {
        road.code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes_and_names() {
        assert_eq!("1".parse::<RoadType>().unwrap(), RoadType::Highway);
        assert_eq!("3".parse::<RoadType>().unwrap(), RoadType::NationalRoad);
        assert_eq!(
            "National_Road".parse::<RoadType>().unwrap(),
            RoadType::NationalRoad
        );
        assert!("2".parse::<RoadType>().is_err());
    }

    #[test]
    fn test_serde_uses_code() {
        let json = serde_json::to_string(&RoadType::NationalRoad).unwrap();
        assert_eq!(json, "\"3\"");
        let road: RoadType = serde_json::from_str("\"highway\"").unwrap();
        assert_eq!(road, RoadType::Highway);
        assert!(serde_json::from_str::<RoadType>("\"7\"").is_err());
    }
}
