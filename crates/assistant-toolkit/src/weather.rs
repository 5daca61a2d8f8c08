//! Weather Tool
//!
//! Reports conditions for a fixed set of cities; anywhere else gets a
//! synthesized report derived from the location name, so repeated queries
//! for the same place stay consistent.

use async_trait::async_trait;
use serde_json::json;
use std::hash::{DefaultHasher, Hash, Hasher};

use assistant_core::{
    ParameterSchema, Result, Tool, ToolCall, ToolOutcome, ToolSchema,
};

/// (city, temperature, condition, humidity)
const KNOWN_CITIES: &[(&str, &str, &str, &str)] = &[
    ("london", "15°C", "Rainy", "80%"),
    ("new york", "22°C", "Partly Cloudy", "65%"),
    ("tokyo", "28°C", "Sunny", "70%"),
    ("mumbai", "32°C", "Hot", "85%"),
    ("paris", "18°C", "Cloudy", "75%"),
    ("sydney", "24°C", "Clear", "60%"),
];

const FALLBACK_CONDITIONS: &[&str] = &["Sunny", "Cloudy", "Rainy", "Partly Cloudy", "Clear"];

/// Weather information tool
pub struct WeatherTool;

#[async_trait]
impl Tool for WeatherTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "weather".into(),
            description: "Get weather information for a location".into(),
            parameters: vec![ParameterSchema::required_string(
                "location",
                "City or location name",
            )],
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolOutcome> {
        let location = call.str_arg("location").unwrap_or_default();
        if location.trim().is_empty() {
            return Ok(ToolOutcome::failure("weather", "No location provided"));
        }

        let (temperature, condition, humidity) = lookup(location);
        let description = format!(
            "Weather for {}: {} with {} temperature, {} humidity",
            location, condition, temperature, humidity
        );

        Ok(ToolOutcome::success("weather", description.clone()).with_data(json!({
            "location": location,
            "temperature": temperature,
            "condition": condition,
            "humidity": humidity,
            "description": description,
        })))
    }
}

fn lookup(location: &str) -> (String, String, String) {
    let key = location.trim().to_lowercase();

    if let Some((_, temp, condition, humidity)) =
        KNOWN_CITIES.iter().find(|(city, ..)| *city == key)
    {
        return ((*temp).into(), (*condition).into(), (*humidity).into());
    }

    // Unknown location: derive stable conditions from the name
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    let seed = hasher.finish();

    let temp = 10 + (seed % 26) as u32;
    let condition = FALLBACK_CONDITIONS[(seed / 26) as usize % FALLBACK_CONDITIONS.len()];
    let humidity = 50 + ((seed / 130) % 41) as u32;

    (
        format!("{}°C", temp),
        condition.into(),
        format!("{}%", humidity),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn call_for(location: &str) -> ToolCall {
        let mut args = HashMap::new();
        args.insert("location".into(), serde_json::json!(location));
        ToolCall::new("weather", args)
    }

    #[tokio::test]
    async fn test_known_city() {
        let outcome = WeatherTool.execute(&call_for("London")).await.unwrap();
        assert!(outcome.success);
        assert!(outcome.output.contains("Rainy"));
        assert!(outcome.output.contains("15°C"));

        let data = outcome.data.unwrap();
        assert_eq!(data["humidity"], "80%");
    }

    #[tokio::test]
    async fn test_unknown_city_is_stable() {
        let first = WeatherTool.execute(&call_for("Reykjavik")).await.unwrap();
        let second = WeatherTool.execute(&call_for("Reykjavik")).await.unwrap();
        assert_eq!(first.output, second.output);
        assert!(first.success);
    }

    #[tokio::test]
    async fn test_missing_location() {
        let outcome = WeatherTool
            .execute(&ToolCall::new("weather", HashMap::new()))
            .await
            .unwrap();
        assert!(!outcome.success);
    }
}
