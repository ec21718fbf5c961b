use std::env;

/// AppConfig
///
/// Holds the application's entire configuration state. This struct is designed to be
/// immutable once loaded, ensuring consistency across all components (Session Store,
/// router assembly). It is pulled into the application state via FromRef as part of
/// the Unified State Pattern.
#[derive(Clone)]
pub struct AppConfig {
    // Address the HTTP listener binds to, e.g. "0.0.0.0:3000".
    pub bind_addr: String,
    // Path of the file backing the persisted session fields (token/username/userRole).
    pub session_path: String,
    // Runtime environment marker. Controls log format and configuration strictness.
    pub env: Env,
}

/// Env
///
/// Defines the runtime context, used to switch between development conveniences
/// (pretty logs, defaulted paths) and production behavior (JSON logs, mandatory
/// configuration).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for test setup.
    /// This allows tests to assemble an application state without setting any
    /// environment variables.
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            session_path: "./target/test-session.json".to_string(),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the application configuration at startup.
    /// It reads all parameters from environment variables and fails fast on anything
    /// missing that the current environment requires.
    ///
    /// # Panics
    /// Panics if a critical environment variable required for the current runtime
    /// environment (especially Production) is not found. This prevents the gate from
    /// starting with an incomplete configuration.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        // Session storage path resolution.
        // The production path is mandatory and must be explicitly set; locally we fall
        // back to a file next to the working directory.
        let session_path = match env {
            Env::Production => env::var("SESSION_STORE_PATH")
                .expect("FATAL: SESSION_STORE_PATH must be set in production."),
            _ => env::var("SESSION_STORE_PATH")
                .unwrap_or_else(|_| "./console-session.json".to_string()),
        };

        Self {
            bind_addr,
            session_path,
            env,
        }
    }
}
