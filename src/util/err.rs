/// Folds a module error into the matching [`crate::Error`] variant, so `?`
/// works across module boundaries.
///
/// ```rust
/// use routeplanner::{ClientConfig, ConfigError};
///
/// fn endpoint() -> routeplanner::Result<String> {
///     let config = ClientConfig::from_source(|_| None)?;
///     Ok(config.endpoint)
/// }
///
/// assert!(matches!(
///     endpoint(),
///     Err(routeplanner::Error::Config(ConfigError::MissingEnvironment(_)))
/// ));
/// ```
pub mod err_macro {
    #[macro_export]
    macro_rules! impl_err {
        ($from:ty, $variant:ident) => {
            impl From<$from> for $crate::Error {
                fn from(value: $from) -> Self {
                    $crate::Error::$variant(value)
                }
            }
        };
    }

    pub use impl_err;
}
