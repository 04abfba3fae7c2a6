//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for carepoint-server.
///
/// Every field has a default so the server starts without any environment
/// variables set. Missing API keys are not a startup error: the endpoints that
/// need them answer with an error instead.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// sqlx SQLite URL (default: `"sqlite://carepoint.db"`).
    pub database_url: String,

    /// Upper bound on pooled database connections.
    pub db_max_connections: u32,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Directory for daily-rolling log files; stdout only when unset.
    pub log_dir: Option<String>,

    /// Comma-separated list of allowed CORS origins; wildcard when unset.
    pub cors_allowed_origins: Option<String>,

    /// Serve the OpenAPI document at `/api-docs/openapi.json`.
    pub enable_docs: bool,

    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,

    /// Ask the model for a JSON reply matching the assessment schema.
    pub structured_replies: bool,

    pub maps_api_key: Option<String>,
    pub maps_base_url: String,

    /// Place-search radius in metres.
    pub search_radius_m: u32,

    pub fda_base_url: String,

    /// HS256 signing secret for issued tokens.
    pub jwt_secret: Option<String>,

    /// Token lifetime in seconds.
    pub token_ttl_secs: i64,

    pub bcrypt_cost: u32,

    /// Require a bearer token on the symptom, hospital and history routes.
    pub require_auth: bool,

    /// Store each interaction under its specialty name instead of the shared
    /// `health-data` collection.
    pub partition_by_category: bool,

    /// Number of past interactions offered to the model as context.
    pub history_context: u32,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());
        let flag = |key: &str, default: bool| {
            lookup(key)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(default)
        };
        let secret = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            bind_address: get("CAREPOINT_BIND", "0.0.0.0:3000"),
            database_url: get("CAREPOINT_DATABASE_URL", "sqlite://carepoint.db"),
            db_max_connections: parse_or(lookup("CAREPOINT_DB_MAX_CONNECTIONS"), 5),
            log_level: get("CAREPOINT_LOG", "info"),
            log_json: flag("CAREPOINT_LOG_JSON", false),
            log_dir: lookup("CAREPOINT_LOG_DIR"),
            cors_allowed_origins: lookup("CAREPOINT_CORS_ORIGINS"),
            enable_docs: flag("CAREPOINT_ENABLE_DOCS", true),
            gemini_api_key: secret("GEMINI_API_KEY"),
            gemini_model: get("CAREPOINT_GEMINI_MODEL", "gemini-2.0-flash"),
            gemini_base_url: get(
                "CAREPOINT_GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com",
            ),
            structured_replies: flag("CAREPOINT_STRUCTURED_REPLIES", true),
            maps_api_key: secret("GOOGLE_MAPS_API_KEY"),
            maps_base_url: get("CAREPOINT_MAPS_BASE_URL", "https://maps.googleapis.com"),
            search_radius_m: parse_or(lookup("CAREPOINT_SEARCH_RADIUS_M"), 5000),
            fda_base_url: get("CAREPOINT_FDA_BASE_URL", "https://api.fda.gov"),
            jwt_secret: secret("JWT_SECRET"),
            token_ttl_secs: parse_or(lookup("CAREPOINT_TOKEN_TTL_SECS"), 3600),
            bcrypt_cost: parse_or(lookup("CAREPOINT_BCRYPT_COST"), 10),
            require_auth: flag("CAREPOINT_REQUIRE_AUTH", false),
            partition_by_category: flag("CAREPOINT_PARTITION_BY_CATEGORY", false),
            history_context: parse_or(lookup("CAREPOINT_HISTORY_CONTEXT"), 3),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
