//! Result type alias using [`GeoError`] as the error type.

use super::errors::GeoError;

/// Result type alias for fallible operations
///
/// # Examples
///
/// ```
/// use cepgeo::domain::result::Result;
/// use cepgeo::domain::errors::GeoError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(GeoError::Input("missing cep column".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, GeoError>;
