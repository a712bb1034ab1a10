//! Server configuration read from the environment.

use safety_score_models::EnvironmentalFlags;

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
/// Default port.
pub const DEFAULT_PORT: u16 = 8080;

/// Where the HTTP server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to bind (`PORT`).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR` and `PORT`, falling back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self { bind_addr, port }
    }
}

/// Environmental flags the service assumes for requests that cannot
/// describe their surroundings.
///
/// This is caller policy: the engine itself never assumes any flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringDefaults {
    /// Flags attached to every request.
    pub environment: EnvironmentalFlags,
}

impl Default for ScoringDefaults {
    fn default() -> Self {
        Self {
            environment: EnvironmentalFlags {
                is_crowded: true,
                has_streetlights: true,
                is_near_police: false,
                is_public_transport: true,
            },
        }
    }
}

/// Environment variables that override [`ScoringDefaults`].
pub const SCORING_DEFAULT_VARS: [&str; 4] = [
    "SAFETY_DEFAULT_CROWDED",
    "SAFETY_DEFAULT_STREETLIGHTS",
    "SAFETY_DEFAULT_NEAR_POLICE",
    "SAFETY_DEFAULT_PUBLIC_TRANSPORT",
];

impl ScoringDefaults {
    /// Reads `SAFETY_DEFAULT_*` overrides on top of [`Self::default`].
    ///
    /// Unparseable values are ignored with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        let mut defaults = Self::default();
        let env = &mut defaults.environment;

        env.is_crowded = bool_var("SAFETY_DEFAULT_CROWDED").unwrap_or(env.is_crowded);
        env.has_streetlights =
            bool_var("SAFETY_DEFAULT_STREETLIGHTS").unwrap_or(env.has_streetlights);
        env.is_near_police = bool_var("SAFETY_DEFAULT_NEAR_POLICE").unwrap_or(env.is_near_police);
        env.is_public_transport =
            bool_var("SAFETY_DEFAULT_PUBLIC_TRANSPORT").unwrap_or(env.is_public_transport);

        defaults
    }

    /// Names of the `SAFETY_DEFAULT_*` variables set in the environment.
    #[must_use]
    pub fn overrides_in_env() -> Vec<&'static str> {
        SCORING_DEFAULT_VARS
            .into_iter()
            .filter(|name| std::env::var_os(name).is_some())
            .collect()
    }
}

fn bool_var(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    let parsed = parse_bool(&value);
    if parsed.is_none() {
        log::warn!("Ignoring {name}={value}: expected true/false");
    }
    parsed
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
