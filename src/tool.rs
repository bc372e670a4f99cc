//! Tool dispatch for protocol front ends.
//!
//! A front end hands over a tool name and a JSON argument object; this
//! module maps the pair onto a closed set of typed operations and always
//! answers with text, turning any error into a readable message.

use crate::client::TrafficClient;
use crate::error::{Result, TrafficError};
use crate::request::QueryArgs;
use log::{error, info};
use serde::Serialize;
use serde_json::{Value, json};

pub const GET_TRAFFIC_OBSERVATIONS: &str = "get_traffic_observations";

/// Every operation the front end may invoke, with its validated arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Tool {
    GetTrafficObservations(QueryArgs),
}

/// Name, description and argument schema advertised to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl Tool {
    /// Resolve a call by name. `null` arguments are read as an empty object.
    pub fn from_call(name: &str, arguments: Value) -> Result<Self> {
        let arguments = if arguments.is_null() {
            json!({})
        } else {
            arguments
        };

        match name {
            GET_TRAFFIC_OBSERVATIONS => {
                let args: QueryArgs = serde_json::from_value(arguments)
                    .map_err(|e| TrafficError::InvalidInput(e.to_string()))?;
                Ok(Tool::GetTrafficObservations(args))
            }
            other => Err(TrafficError::UnknownTool(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tool::GetTrafficObservations(_) => GET_TRAFFIC_OBSERVATIONS,
        }
    }

    /// Run the operation and return its textual result.
    pub async fn invoke(&self, client: &TrafficClient) -> Result<String> {
        match self {
            Tool::GetTrafficObservations(args) => client.query_args(args).await?.into_text(),
        }
    }

    pub fn definitions() -> Vec<ToolDefinition> {
        vec![ToolDefinition {
            name: GET_TRAFFIC_OBSERVATIONS,
            description: "Fetch 5-minute road traffic observations for a time window and area, \
                          as GeoJSON or CSV",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "roadType": {
                        "type": "string",
                        "enum": ["1", "3"],
                        "description": "Road type: 1 = highway, 3 = national road"
                    },
                    "startTime": {
                        "type": "string",
                        "description": "Window start, e.g. 2024-01-01T00:00:00 (5-minute aligned)"
                    },
                    "endTime": {
                        "type": "string",
                        "description": "Window end (inclusive)"
                    },
                    "bbox": {
                        "type": "string",
                        "description": "west,south,east,north in degrees; wins over the center form"
                    },
                    "centerLat": { "type": "number", "description": "Center latitude" },
                    "centerLon": { "type": "number", "description": "Center longitude" },
                    "radiusKm": { "type": "number", "description": "Radius around the center in km" },
                    "pointCodes": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Permanent observation point codes to keep"
                    },
                    "outputFormat": {
                        "type": "string",
                        "enum": ["geojson", "csv"],
                        "default": "geojson"
                    }
                },
                "required": ["roadType", "startTime", "endTime"]
            }),
        }]
    }
}

/// Resolve and run a tool call. Never fails: errors come back as text.
pub async fn dispatch(client: &TrafficClient, name: &str, arguments: Value) -> String {
    info!("Tool called: {} with arguments: {}", name, arguments);

    let outcome = match Tool::from_call(name, arguments) {
        Ok(tool) => tool.invoke(client).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(text) => {
            info!("Tool {} completed successfully", name);
            text
        }
        Err(e) => {
            error!("Error in tool {}: {}", name, e);
            format!("Error executing {}: {}", name, e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jartic_types::{OutputFormat, RoadType};

    fn offline_client() -> TrafficClient {
        TrafficClient::builder()
            .base_url("http://127.0.0.1:9/geoserver")
            .build()
            .unwrap()
    }

    #[test]
    fn test_from_call_parses_arguments() {
        let tool = Tool::from_call(
            GET_TRAFFIC_OBSERVATIONS,
            json!({
                "roadType": "3",
                "startTime": "2024-01-01T00:00:00",
                "endTime": "2024-01-01T00:10:00",
                "bbox": "139.15,35.14,139.32,35.56",
                "outputFormat": "csv"
            }),
        )
        .unwrap();

        let Tool::GetTrafficObservations(args) = &tool;
        assert_eq!(args.road_type, RoadType::NationalRoad);
        assert_eq!(args.output_format, Some(OutputFormat::Csv));
        assert_eq!(tool.name(), GET_TRAFFIC_OBSERVATIONS);
    }

    #[test]
    fn test_from_call_accepts_null_optionals() {
        let tool = Tool::from_call(
            GET_TRAFFIC_OBSERVATIONS,
            json!({
                "roadType": "1",
                "startTime": "2024-01-01T00:00:00",
                "endTime": "2024-01-01T00:00:00",
                "bbox": "139.15,35.14,139.32,35.56",
                "pointCodes": null,
                "outputFormat": null
            }),
        )
        .unwrap();

        let Tool::GetTrafficObservations(args) = &tool;
        let request = args.validate().unwrap();
        assert_eq!(request.output_format, OutputFormat::GeoJson);
        assert!(request.point_codes.is_empty());
    }

    #[test]
    fn test_from_call_unknown_tool() {
        assert!(matches!(
            Tool::from_call("get_weather", json!({})),
            Err(TrafficError::UnknownTool(name)) if name == "get_weather"
        ));
    }

    #[test]
    fn test_from_call_missing_arguments() {
        assert!(matches!(
            Tool::from_call(GET_TRAFFIC_OBSERVATIONS, Value::Null),
            Err(TrafficError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_definitions_schema() {
        let definitions = Tool::definitions();
        assert_eq!(definitions.len(), 1);
        let value = serde_json::to_value(&definitions[0]).unwrap();
        assert_eq!(value["name"], GET_TRAFFIC_OBSERVATIONS);
        assert_eq!(
            value["inputSchema"]["required"],
            json!(["roadType", "startTime", "endTime"])
        );
    }

    #[tokio::test]
    async fn test_dispatch_reports_errors_as_text() {
        let client = offline_client();

        let text = dispatch(&client, "nope", json!({})).await;
        assert_eq!(text, "Error executing nope: Unknown tool: nope");

        let text = dispatch(
            &client,
            GET_TRAFFIC_OBSERVATIONS,
            json!({
                "roadType": "3",
                "startTime": "2024/01/01 00:00",
                "endTime": "2024-01-01T00:10:00",
                "bbox": "139.15,35.14,139.32,35.56"
            }),
        )
        .await;
        assert!(text.starts_with("Error executing get_traffic_observations: Invalid time format"));

        let text = dispatch(
            &client,
            GET_TRAFFIC_OBSERVATIONS,
            json!({
                "roadType": "1",
                "startTime": "2024-01-01T00:00:00",
                "endTime": "2024-01-01T00:10:00"
            }),
        )
        .await;
        assert!(text.contains("Missing area specification"));
    }
}
