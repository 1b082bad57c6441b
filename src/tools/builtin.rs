//! The three sample functions declared to every agent.
//!
//! All of them are pure and deterministic over mocked data; the remote
//! service invokes them mid-run through the declared schemas.

use chrono::format::{Item, StrftimeItems};
use chrono::Local;

use super::registry::{FunctionTool, ToolRegistry};
use super::types::ParameterSchema;

const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render the current wall-clock time with a strftime pattern.
/// Unparseable patterns fall back to the default.
pub fn current_time(format: Option<&str>) -> String {
    let pattern = format.unwrap_or(DEFAULT_TIME_FORMAT);
    let items: Vec<Item> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Local::now().format(DEFAULT_TIME_FORMAT).to_string();
    }
    Local::now().format_with_items(items.into_iter()).to_string()
}

/// Canned weather lookup for a fixed set of locations.
pub fn weather_for(location: &str) -> String {
    match location {
        "New York" => "Sunny, 25°C",
        "London" => "Cloudy, 18°C",
        "Tokyo" => "Rainy, 22°C",
        _ => "Weather data not available for this location.",
    }
    .to_string()
}

/// Fixed sample user records keyed by integer id.
pub fn user_record(user_id: i64) -> serde_json::Value {
    match user_id {
        1 => serde_json::json!({"name": "Alice", "email": "alice@example.com"}),
        2 => serde_json::json!({"name": "Bob", "email": "bob@example.com"}),
        3 => serde_json::json!({"name": "Charlie", "email": "charlie@example.com"}),
        _ => serde_json::json!({"error": "User not found."}),
    }
}

/// `fetch_current_datetime(format?) -> {current_time}`.
pub fn fetch_current_datetime_tool() -> FunctionTool {
    FunctionTool::new(
        "fetch_current_datetime",
        "Get the current time, optionally rendered with a strftime format pattern",
        ParameterSchema::object()
            .string(
                "format",
                "Optional strftime pattern; defaults to year-month-day hour:minute:second",
                false,
            )
            .build(),
        |args| {
            let format = args.get("format").and_then(|v| v.as_str());
            serde_json::json!({"current_time": current_time(format)})
        },
    )
}

/// `fetch_weather(location) -> {weather}`.
pub fn fetch_weather_tool() -> FunctionTool {
    FunctionTool::new(
        "fetch_weather",
        "Fetch the weather information for the specified location",
        ParameterSchema::object()
            .string("location", "The location to fetch weather for", true)
            .build(),
        |args| {
            let location = args.get("location").and_then(|v| v.as_str()).unwrap_or("");
            serde_json::json!({"weather": weather_for(location)})
        },
    )
}

/// `get_user_info(user_id) -> {user_info}`.
pub fn get_user_info_tool() -> FunctionTool {
    FunctionTool::new(
        "get_user_info",
        "Retrieve user information based on user ID",
        ParameterSchema::object()
            .integer("user_id", "ID of the user", true)
            .build(),
        |args| {
            let record = match args.get("user_id").and_then(|v| v.as_i64()) {
                Some(id) => user_record(id),
                None => serde_json::json!({"error": "User not found."}),
            };
            serde_json::json!({"user_info": record})
        },
    )
}

/// The full declared toolset: the three sample functions plus the
/// code-execution capability.
pub fn default_registry() -> ToolRegistry {
    ToolRegistry::new()
        .register(fetch_current_datetime_tool())
        .register(fetch_weather_tool())
        .register(get_user_info_tool())
        .with_code_interpreter()
}
