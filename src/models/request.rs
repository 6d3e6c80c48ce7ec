// ============================================================================
// Request JSON Parsing
// ============================================================================
//
// String-based parsing for synthesis requests arriving from the orchestrator
// as JSON payloads. The top-level shape is checked first so malformed
// payloads fail with a descriptive message instead of a serde trace.

use anyhow::{Context, Result};

use crate::api::SynthesisRequest;

fn validate_input_request(request_json: &str) -> Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(request_json).context("Invalid request JSON")?;
    let object = value
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("Request JSON must be an object"))?;
    if object.get("destinations").is_none() {
        anyhow::bail!("Missing required 'destinations' field");
    }
    if object.get("trip_days").is_none() {
        anyhow::bail!("Missing required 'trip_days' field");
    }
    Ok(())
}

/// Parse a synthesis request from a JSON string.
///
/// # Arguments
///
/// * `request_json` - Request payload (snake_case format matching the schema)
///
/// # Returns
///
/// A deserialized `SynthesisRequest`. Semantic validation (non-empty
/// destinations, positive trip length, coordinate ranges) is a separate step
/// via [`SynthesisRequest::validate`].
pub fn parse_request_json_str(request_json: &str) -> Result<SynthesisRequest> {
    validate_input_request(request_json)?;

    let request: SynthesisRequest = serde_json::from_str(request_json)
        .context("Failed to deserialize synthesis request JSON using Serde")?;

    Ok(request)
}
