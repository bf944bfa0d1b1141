//! Shared constants and invariants

pub const DEFAULT_CONFIG_PATH: &str = "token-guard.yaml";
pub const DEFAULT_AUTH_HEADER: &str = "X-Demo-Auth";
pub const DEFAULT_HEALTH_PATH: &str = "/health";
pub const DEFAULT_HEALTH_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

pub const AUTH_VERIFY_PATH: &str = "/auth/verify";
pub const AUTH_REFRESH_PATH: &str = "/auth/refresh";

pub const REDACTED: &str = "<redacted>";
