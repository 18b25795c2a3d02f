//! Extension traits for turning plain errors into `tonic::Status`.

/// Extension trait for Result types to convert errors to tonic::Status
///
/// # Example
/// ```ignore
/// use grpc_helpers::error::ToTonicResult;
///
/// let limit = u32::try_from(request.limit).to_tonic()?;
/// ```
pub trait ToTonicResult<T> {
  /// Convert the error in this Result to a tonic::Status with INVALID_ARGUMENT code
  fn to_tonic(self) -> Result<T, tonic::Status>;

  /// Convert the error to a tonic::Status with a custom code
  fn to_tonic_with_code(self, code: tonic::Code) -> Result<T, tonic::Status>;
}

impl<T, E: std::fmt::Display> ToTonicResult<T> for Result<T, E> {
  fn to_tonic(self) -> Result<T, tonic::Status> {
    self.map_err(|e| tonic::Status::invalid_argument(e.to_string()))
  }

  fn to_tonic_with_code(self, code: tonic::Code) -> Result<T, tonic::Status> {
    self.map_err(|e| tonic::Status::new(code, e.to_string()))
  }
}

/// Extension trait for Option types to convert None to tonic::Status errors
///
/// # Example
/// ```ignore
/// use grpc_helpers::error::ToTonicOption;
///
/// let customer = repository.get_customer(id).await?.ok_or_not_found("customer not found")?;
/// ```
pub trait ToTonicOption<T> {
  /// Convert None to a tonic::Status with NOT_FOUND code
  fn ok_or_not_found(self, message: impl Into<String>) -> Result<T, tonic::Status>;

  /// Convert None to a tonic::Status with INVALID_ARGUMENT code
  fn ok_or_invalid(self, message: impl Into<String>) -> Result<T, tonic::Status>;
}

impl<T> ToTonicOption<T> for Option<T> {
  fn ok_or_not_found(self, message: impl Into<String>) -> Result<T, tonic::Status> {
    self.ok_or_else(|| tonic::Status::not_found(message.into()))
  }

  fn ok_or_invalid(self, message: impl Into<String>) -> Result<T, tonic::Status> {
    self.ok_or_else(|| tonic::Status::invalid_argument(message.into()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tonic::Code;

  #[test]
  fn test_result_to_tonic_defaults_to_invalid_argument() {
    let result: Result<(), String> = Err("limit must be positive".to_string());
    let status = result.to_tonic().unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(status.message(), "limit must be positive");
  }

  #[test]
  fn test_result_to_tonic_with_code() {
    let result: Result<(), &str> = Err("db down");
    let status = result.to_tonic_with_code(Code::Unavailable).unwrap_err();
    assert_eq!(status.code(), Code::Unavailable);
  }

  #[test]
  fn test_option_to_tonic() {
    let missing: Option<u8> = None;
    assert_eq!(missing.ok_or_not_found("gone").unwrap_err().code(), Code::NotFound);
    assert_eq!(None::<u8>.ok_or_invalid("bad").unwrap_err().code(), Code::InvalidArgument);
    assert_eq!(Some(1).ok_or_not_found("gone").unwrap(), 1);
  }
}
