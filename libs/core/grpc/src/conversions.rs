//! Conversions between proto field values and domain values.
//!
//! Proto3 strings carry no presence, so an empty string means "not set".

use tonic::Status;
use uuid::Uuid;

/// Parse a required UUID field. Empty or malformed values are `InvalidArgument`.
pub fn parse_uuid(field: &str, value: &str) -> Result<Uuid, Status> {
  let value = value.trim();
  if value.is_empty() {
    return Err(Status::invalid_argument(format!("{field} is required")));
  }
  Uuid::parse_str(value)
    .map_err(|e| Status::invalid_argument(format!("{field} is not a valid UUID: {e}")))
}

/// Parse an optional UUID field. Empty means `None`.
pub fn parse_optional_uuid(field: &str, value: &str) -> Result<Option<Uuid>, Status> {
  if value.trim().is_empty() {
    Ok(None)
  } else {
    parse_uuid(field, value).map(Some)
  }
}

/// Proto string to optional domain text.
pub fn optional_text(value: String) -> Option<String> {
  if value.is_empty() { None } else { Some(value) }
}

/// Optional domain text to proto string.
pub fn text_or_empty(value: Option<String>) -> String {
  value.unwrap_or_default()
}
