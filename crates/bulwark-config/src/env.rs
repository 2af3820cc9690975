//! Environment inputs and the typed loader.
//!
//! Resolution per input (later wins):
//! 1. Built-in default
//! 2. Environment variable, if set and non-empty
//!
//! Nothing here can fail. A missing or odd value falls back to the default
//! and, where it looks like a mistake, leaves a warning on [`LoadedConfig`].

use crate::ServerConfig;

/// Overrides `cors.origin`.
pub const FRONTEND_URL_ENV: &str = "FRONTEND_URL";

/// Deployment environment name.
pub const NODE_ENV_ENV: &str = "NODE_ENV";

/// CORS origin used when `FRONTEND_URL` is unset.
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3003";

/// `NODE_ENV` value that turns on secure cookies.
pub const PRODUCTION: &str = "production";

/// Raw values of the environment variables the bundle depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvInputs {
    /// Value of `FRONTEND_URL`, if set.
    pub frontend_url: Option<String>,
    /// Value of `NODE_ENV`, if set.
    pub node_env: Option<String>,
}

impl EnvInputs {
    /// Capture inputs from the process environment.
    ///
    /// Non-UTF-8 values are kept, with invalid bytes replaced by U+FFFD.
    pub fn from_process() -> Self {
        Self::from_lookup(read_var)
    }

    /// Capture inputs through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            frontend_url: lookup(FRONTEND_URL_ENV),
            node_env: lookup(NODE_ENV_ENV),
        }
    }

    /// The effective CORS origin.
    pub fn cors_origin(&self) -> &str {
        match self.frontend_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => DEFAULT_FRONTEND_URL,
        }
    }

    /// Where the CORS origin came from.
    pub fn origin_source(&self) -> InputSource {
        match self.frontend_url.as_deref() {
            Some(url) if !url.is_empty() => InputSource::EnvVar(FRONTEND_URL_ENV.to_string()),
            _ => InputSource::Default,
        }
    }

    /// Exact, case-sensitive match on `NODE_ENV=production`.
    pub fn is_production(&self) -> bool {
        self.node_env.as_deref() == Some(PRODUCTION)
    }

    /// Where the cookie `secure` flag came from.
    pub fn secure_source(&self) -> InputSource {
        if self.is_production() {
            InputSource::EnvVar(NODE_ENV_ENV.to_string())
        } else {
            InputSource::Default
        }
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.frontend_url.as_deref() == Some("") {
            warnings.push(format!(
                "{} is set but empty, using default origin {}",
                FRONTEND_URL_ENV, DEFAULT_FRONTEND_URL
            ));
        }

        if let Some(node_env) = self.node_env.as_deref() {
            if node_env != PRODUCTION && node_env.trim().eq_ignore_ascii_case(PRODUCTION) {
                warnings.push(format!(
                    "{}='{}' is not exactly '{}', cookies will not be marked secure",
                    NODE_ENV_ENV, node_env, PRODUCTION
                ));
            }
        }

        warnings
    }
}

fn read_var(name: &str) -> Option<String> {
    let value = std::env::var_os(name)?;
    match value.into_string() {
        Ok(value) => Some(value),
        Err(raw) => {
            tracing::warn!("{} is not valid UTF-8, invalid bytes replaced", name);
            Some(raw.to_string_lossy().into_owned())
        }
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Built-in default.
    Default,
    /// Environment variable.
    EnvVar(String),
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::Default => write!(f, "default"),
            InputSource::EnvVar(var) => write!(f, "env var {}", var),
        }
    }
}

/// A resolved bundle plus diagnostics about how it was resolved.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The resolved settings bundle.
    pub config: ServerConfig,
    /// The inputs it was resolved from.
    pub inputs: EnvInputs,
    /// Source of `cors.origin`.
    pub origin_source: InputSource,
    /// Source of the cookie `secure` flags.
    pub secure_source: InputSource,
    /// Suspicious input values that were silently defaulted.
    pub warnings: Vec<String>,
}

/// Resolve the bundle from captured inputs, keeping provenance.
pub fn load(inputs: EnvInputs) -> LoadedConfig {
    let config = ServerConfig::resolve(&inputs);

    tracing::debug!(
        origin = %config.cors.origin,
        production = inputs.is_production(),
        "Resolved server config"
    );

    let warnings = inputs.warnings();
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    LoadedConfig {
        config,
        origin_source: inputs.origin_source(),
        secure_source: inputs.secure_source(),
        warnings,
        inputs,
    }
}

/// Resolve the bundle from the process environment, keeping provenance.
pub fn load_from_env() -> LoadedConfig {
    load(EnvInputs::from_process())
}
