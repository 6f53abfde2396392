//! Configuration management for boot-native
//!
//! Settings are read from the build environment with defaults; command-line flags then
//! override individual fields through the `with_*` builders.
//!
//! # Environment Variables
//!
//! - `BP_BOOT_NATIVE_IMAGE_BUILD_ARGUMENTS`: extra `native-image` arguments, shell-quoted - default: none
//! - `CNB_STACK_ID`: stack the image is built for - default: `io.buildpacks.stacks.bionic`
//! - `BOOT_NATIVE_TIMEOUT`: compilation timeout in seconds, `0` disables it - default: `0`
//! - `BOOT_NATIVE_LAYER_NAME`: name of the layer the compiler writes into - default: `native-image`
//! - `BOOT_NATIVE_LOG_LEVEL`: logging level - default: `info`

use crate::native::invocation::tokenize_arguments;
use crate::stack::StackId;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const BUILD_ARGUMENTS_ENV: &str = "BP_BOOT_NATIVE_IMAGE_BUILD_ARGUMENTS";
pub const STACK_ID_ENV: &str = "CNB_STACK_ID";
pub const TIMEOUT_ENV: &str = "BOOT_NATIVE_TIMEOUT";
pub const LAYER_NAME_ENV: &str = "BOOT_NATIVE_LAYER_NAME";
pub use crate::util::logging::LOG_LEVEL_ENV;

const DEFAULT_LAYER_NAME: &str = "native-image";
const DEFAULT_LOG_LEVEL: &str = "info";
const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Build step configuration
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Caller-supplied compiler arguments, not yet tokenized
    pub arguments: String,

    pub stack: StackId,

    /// Compilation timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,

    pub layer_name: String,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for BuildConfig {
    /// Loads the configuration from the environment, falling back to defaults.
    ///
    /// Unparseable values fall back too; use [`BuildConfig::from_env`] to reject them.
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|_| Self::builtin())
    }
}

impl BuildConfig {
    fn builtin() -> Self {
        Self {
            arguments: String::new(),
            stack: StackId::default(),
            timeout: None,
            layer_name: DEFAULT_LAYER_NAME.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    /// Loads the configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::builtin();

        let arguments = env::var(BUILD_ARGUMENTS_ENV).unwrap_or_default();

        let stack = env::var(STACK_ID_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| StackId::from_id(s.trim()))
            .unwrap_or(defaults.stack);

        let timeout = match env::var(TIMEOUT_ENV) {
            Ok(value) => parse_timeout(&value)?,
            Err(_) => defaults.timeout,
        };

        let layer_name = env::var(LAYER_NAME_ENV).unwrap_or(defaults.layer_name);

        let log_level = env::var(LOG_LEVEL_ENV)
            .unwrap_or(defaults.log_level)
            .to_lowercase();

        Ok(Self {
            arguments,
            stack,
            timeout,
            layer_name,
            log_level,
        })
    }

    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = arguments.into();
        self
    }

    pub fn with_stack(mut self, stack: StackId) -> Self {
        self.stack = stack;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_layer_name(mut self, layer_name: impl Into<String>) -> Self {
        self.layer_name = layer_name.into();
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(timeout) = self.timeout {
            if timeout.as_secs() > MAX_TIMEOUT_SECS {
                return Err(ConfigError::ValidationFailed(
                    "Timeout cannot exceed 24 hours".to_string(),
                ));
            }
        }

        if self.layer_name.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Layer name must not be empty".to_string(),
            ));
        }
        if self.layer_name.contains(['/', '\\']) || self.layer_name == ".." {
            return Err(ConfigError::ValidationFailed(format!(
                "Layer name must not contain path separators: {}",
                self.layer_name
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        tokenize_arguments(&self.arguments).map_err(|e| ConfigError::ParseError {
            field: BUILD_ARGUMENTS_ENV.to_string(),
            error: e.to_string(),
        })?;

        Ok(())
    }
}

/// Parses a timeout in whole seconds; `0` means no timeout
pub fn parse_timeout(value: &str) -> Result<Option<Duration>, ConfigError> {
    let secs = value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::ParseError {
            field: TIMEOUT_ENV.to_string(),
            error: e.to_string(),
        })?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Native Image Build Configuration:")?;
        writeln!(f, "  Arguments: {}", self.arguments)?;
        writeln!(f, "  Stack: {}", self.stack)?;
        match self.timeout {
            Some(timeout) => writeln!(f, "  Timeout: {}s", timeout.as_secs())?,
            None => writeln!(f, "  Timeout: none")?,
        }
        writeln!(f, "  Layer: {}", self.layer_name)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::unset(BUILD_ARGUMENTS_ENV),
            EnvGuard::unset(STACK_ID_ENV),
            EnvGuard::unset(TIMEOUT_ENV),
            EnvGuard::unset(LAYER_NAME_ENV),
            EnvGuard::unset(LOG_LEVEL_ENV),
        ];

        let config = BuildConfig::default();

        assert_eq!(config.arguments, "");
        assert_eq!(config.stack, StackId::Bionic);
        assert_eq!(config.timeout, None);
        assert_eq!(config.layer_name, DEFAULT_LAYER_NAME);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set(BUILD_ARGUMENTS_ENV, "--no-fallback -H:+ReportExceptionStackTraces"),
            EnvGuard::set(STACK_ID_ENV, "io.paketo.stacks.tiny"),
            EnvGuard::set(TIMEOUT_ENV, "1800"),
            EnvGuard::set(LAYER_NAME_ENV, "native"),
            EnvGuard::set(LOG_LEVEL_ENV, "DEBUG"),
        ];

        let config = BuildConfig::from_env().unwrap();

        assert_eq!(
            config.arguments,
            "--no-fallback -H:+ReportExceptionStackTraces"
        );
        assert_eq!(config.stack, StackId::Tiny);
        assert_eq!(config.timeout, Some(Duration::from_secs(1800)));
        assert_eq!(config.layer_name, "native");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_rejected_by_from_env() {
        let _guard = EnvGuard::set(TIMEOUT_ENV, "soon");

        assert!(matches!(
            BuildConfig::from_env(),
            Err(ConfigError::ParseError { .. })
        ));
        assert_eq!(BuildConfig::default().timeout, None);
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("0").unwrap(), None);
        assert_eq!(
            parse_timeout(" 60 ").unwrap(),
            Some(Duration::from_secs(60))
        );
        assert!(parse_timeout("-1").is_err());
    }

    #[test]
    fn test_builders_override() {
        let config = BuildConfig::builtin()
            .with_arguments("-J-Xmx4g")
            .with_stack(StackId::Tiny)
            .with_timeout(Some(Duration::from_secs(5)))
            .with_layer_name("aot");

        assert_eq!(config.arguments, "-J-Xmx4g");
        assert_eq!(config.stack, StackId::Tiny);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.layer_name, "aot");
    }

    #[test]
    fn test_validation_failures() {
        let too_long = BuildConfig::builtin().with_timeout(Some(Duration::from_secs(MAX_TIMEOUT_SECS + 1)));
        assert!(too_long.validate().is_err());

        let bad_layer = BuildConfig::builtin().with_layer_name("../escape");
        assert!(bad_layer.validate().is_err());

        let empty_layer = BuildConfig::builtin().with_layer_name(" ");
        assert!(empty_layer.validate().is_err());

        let mut bad_level = BuildConfig::builtin();
        bad_level.log_level = "loud".to_string();
        assert!(bad_level.validate().is_err());

        let bad_args = BuildConfig::builtin().with_arguments("\"unterminated");
        assert!(matches!(
            bad_args.validate(),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_config_display() {
        let display = BuildConfig::builtin().to_string();
        assert!(display.contains("Native Image Build Configuration:"));
        assert!(display.contains("Timeout: none"));
    }
}
