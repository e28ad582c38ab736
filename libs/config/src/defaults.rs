//! Default configuration values
//!
//! Used when a setting is absent from every configuration layer.

/// Base configuration file, relative to the working directory
pub const CONFIG_FILE: &str = "config/recorder.toml";

/// Directory holding `<environment>.toml` overrides
pub const ENVIRONMENTS_DIR: &str = "config/environments";

/// Prefix of environment variable overrides, e.g. `TELEINFO_READER__DEVICE`
pub const ENV_PREFIX: &str = "TELEINFO";

/// Separator between nested keys in environment variable names
pub const ENV_SEPARATOR: &str = "__";

/// Serial reader defaults
pub mod reader {
    /// Serial device the meter output is wired to
    pub const DEVICE: &str = "/dev/ttyAMA0";

    /// Pause between two read cycles (milliseconds)
    pub const POLL_INTERVAL_MS: u64 = 60_000;
}

/// Counter defaults
pub mod counter {
    pub const NAME: &str = "main";
}

/// Logging defaults
pub mod logging {
    pub const LEVEL: &str = "info";
}

/// Cost processor defaults
pub mod cost {
    /// Record key the cost estimate is stored under
    pub const RESULT_KEY: &str = "COST";

    /// Index the cost is derived from
    pub const INDEX_KEY: &str = "BASE";
}
