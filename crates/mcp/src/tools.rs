use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde_json::{Value, json};

use liupan_common::{ContentStore, DivinationEngine, Gender};

use crate::error::ToolError;
use crate::format::format_chart;
use crate::protocol::{ToolCallResult, ToolDefinition};

const GENDER_MESSAGE: &str =
    "Missing or invalid argument: gender (must be 0 for female or 1 for male)";

/// Returns the definitions for the two exposed tools, `deploy_html` first.
pub(crate) fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "deploy_html".to_string(),
            description: "Deploy HTML content to page hosting, return the public URL".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "value": {
                        "type": "string",
                        "description": "HTML or text content to deploy. Provide complete HTML or text content you want to publish, and the system will return a public URL where your content can be accessed."
                    }
                },
                "required": ["value"]
            }),
        },
        ToolDefinition {
            name: "calculate_liuren_pan".to_string(),
            description: "Calculate 大六壬 (Da Liu Ren) divination chart based on birth date, gender, and current time".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "birth_date": {
                        "type": "string",
                        "description": "Birth date in ISO format (e.g., '1990-05-20' or '1990-05-20T14:30:00')"
                    },
                    "gender": {
                        "type": "number",
                        "description": "Gender: 0 for female, 1 for male",
                        "enum": [0, 1]
                    },
                    "current_date": {
                        "type": "string",
                        "description": "Current date/time for divination (optional), defaults to current time",
                        "format": "date-time"
                    }
                },
                "required": ["birth_date", "gender"]
            }),
        },
    ]
}

/// `deploy_html`: publish the `value` argument and answer with the URL it
/// is served at. Failures come back as an error-flagged tool result.
pub(crate) async fn deploy_html(
    store: &dyn ContentStore,
    arguments: Option<&Value>,
    base_url: &str,
) -> ToolCallResult {
    match try_deploy(store, arguments, base_url).await {
        Ok(url) => ToolCallResult::text(url),
        Err(error) => error.normalize(),
    }
}

async fn try_deploy(
    store: &dyn ContentStore,
    arguments: Option<&Value>,
    base_url: &str,
) -> Result<String, ToolError> {
    let content = arguments
        .and_then(|args| args.get("value"))
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty())
        .ok_or(ToolError::MissingArgument { name: "value" })?;

    Ok(store.deploy(content, base_url).await?)
}

/// `calculate_liuren_pan`: validate the querent arguments, obtain the chart
/// and year fate from the divination collaborator, and render markdown.
/// No collaborator is invoked unless validation passes.
pub(crate) fn calculate_liuren_pan(
    engine: &dyn DivinationEngine,
    arguments: Option<&Value>,
) -> ToolCallResult {
    match try_calculate(engine, arguments) {
        Ok(text) => ToolCallResult::text(text),
        Err(error) => error.normalize(),
    }
}

fn try_calculate(
    engine: &dyn DivinationEngine,
    arguments: Option<&Value>,
) -> Result<String, ToolError> {
    let birth_raw = arguments
        .and_then(|args| args.get("birth_date"))
        .and_then(Value::as_str)
        .ok_or(ToolError::MissingArgument { name: "birth_date" })?;

    let gender = arguments
        .and_then(|args| args.get("gender"))
        .and_then(Value::as_i64)
        .and_then(|wire| Gender::try_from(wire).ok())
        .ok_or_else(|| ToolError::InvalidArgument {
            message: GENDER_MESSAGE.to_string(),
        })?;

    let birth = parse_datetime(birth_raw).ok_or_else(|| invalid_date_format("birth_date"))?;

    let moment = match arguments
        .and_then(|args| args.get("current_date"))
        .and_then(Value::as_str)
    {
        Some(raw) => parse_datetime(raw).ok_or_else(|| invalid_date_format("current_date"))?,
        None => Local::now().naive_local(),
    };

    let chart = engine.chart(moment)?;
    let fate = engine.year_fate(birth, gender)?;
    Ok(format_chart(birth, gender, &chart, &fate))
}

fn invalid_date_format(field: &str) -> ToolError {
    ToolError::InvalidArgument {
        message: format!(
            "Invalid {field} format. Must be a valid date string (e.g., '1990-05-20' or '1990-05-20T14:30:00')"
        ),
    }
}

/// Accepts ISO dates with or without a time component. RFC 3339 offsets are
/// reduced to the wall-clock time they carry.
fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.naive_local());
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(at);
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(at);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
}
