//! Environment-driven settings for both entry points.
//!
//! Parsing goes through a lookup closure so tests can pass a map
//! instead of mutating the process environment. Empty values count
//! as unset. Every missing required name is reported in one error.

use crate::{
    error::{ImaraError, ImaraResult, InvalidVar},
    generator::GenerationPlan,
};
use std::{collections::BTreeMap, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// SQLite database path (`DB_NAME`).
    pub database: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub store: StoreSettings,
    pub plan: GenerationPlan,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextServiceSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl TextServiceSettings {
    /// Defaults for the public OpenAI endpoint with the given key.
    pub fn with_key(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-3.5-turbo".into(),
            max_tokens: 150,
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    pub store: StoreSettings,
    /// `None` when `SMTP_USER` is unset: alerts go to the console only.
    pub mail: Option<MailSettings>,
    pub recipient: String,
    pub text_service: TextServiceSettings,
}

/// Read access to `NAME=value` pairs. Empty values are treated as unset.
struct Env<F> {
    lookup: F,
    missing: Vec<String>,
    invalid: Vec<InvalidVar>,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn new(lookup: F) -> Self {
        Self {
            lookup,
            missing: Vec::new(),
            invalid: Vec::new(),
        }
    }

    fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Records the name as missing and yields an empty string, so the
    /// caller can keep collecting before `finish` reports all of them.
    fn required(&mut self, name: &str) -> String {
        self.optional(name).unwrap_or_else(|| {
            self.missing.push(name.to_string());
            String::new()
        })
    }

    /// Parses the value, falling back to `default` when unset. An
    /// unparseable value is recorded and also yields `default`.
    fn parsed<T: FromStr>(&mut self, name: &str, default: T) -> T {
        match self.optional(name) {
            None => default,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                self.reject(name, raw);
                default
            }),
        }
    }

    fn reject(&mut self, name: &str, value: String) {
        self.invalid.push(InvalidVar {
            name: name.to_string(),
            value,
        });
    }

    fn finish(self) -> ImaraResult<()> {
        if self.missing.is_empty() && self.invalid.is_empty() {
            Ok(())
        } else {
            Err(ImaraError::Settings {
                missing: self.missing,
                invalid: self.invalid,
            })
        }
    }
}

/// Network connection names a server-backed store would need. The
/// embedded store reads only `DB_NAME`.
const UNUSED_CONNECTION_VARS: [&str; 4] = ["DB_HOST", "DB_PORT", "DB_USER", "DB_PASS"];

fn store_settings<F: Fn(&str) -> Option<String>>(env: &mut Env<F>) -> StoreSettings {
    for name in UNUSED_CONNECTION_VARS {
        if env.optional(name).is_some() {
            log::debug!("settings: {name} is set but unused by the SQLite store");
        }
    }
    StoreSettings {
        database: env.required("DB_NAME"),
    }
}

impl GeneratorSettings {
    pub fn from_env() -> ImaraResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> ImaraResult<Self> {
        let mut env = Env::new(lookup);
        let store = store_settings(&mut env);
        let defaults = GenerationPlan::default();
        let daily_new_clients: u32 = env.parsed("DAILY_NEW_CLIENTS", defaults.daily_new_clients);
        if daily_new_clients == 0 {
            env.reject("DAILY_NEW_CLIENTS", "0".into());
        }
        let max_policies_per_client: u32 =
            env.parsed("MAX_POLICIES_PER_CLIENT", defaults.max_policies_per_client);
        let seed = env.parsed("GENERATOR_SEED", 42u64);
        env.finish()?;

        Ok(Self {
            store,
            plan: GenerationPlan {
                daily_new_clients,
                max_policies_per_client,
            },
            seed,
        })
    }
}

impl MonitorSettings {
    pub fn from_env() -> ImaraResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> ImaraResult<Self> {
        let mut env = Env::new(lookup);
        let store = store_settings(&mut env);
        let recipient = env.required("CEO_EMAIL");
        let api_key = env.required("OPENAI_API_KEY");

        let mail = match env.optional("SMTP_USER") {
            Some(user) => Some(MailSettings {
                password: env.required("SMTP_PASS"),
                host: env.optional("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".into()),
                port: env.parsed("SMTP_PORT", 465u16),
                timeout_secs: env.parsed("SMTP_TIMEOUT_SECS", 30u64),
                user,
            }),
            None => None,
        };

        let defaults = TextServiceSettings::with_key(&api_key);
        let text_service = TextServiceSettings {
            base_url: env.optional("OPENAI_BASE_URL").unwrap_or(defaults.base_url.clone()),
            model: env.optional("OPENAI_MODEL").unwrap_or(defaults.model.clone()),
            max_tokens: env.parsed("OPENAI_MAX_TOKENS", defaults.max_tokens),
            timeout_secs: env.parsed("OPENAI_TIMEOUT_SECS", defaults.timeout_secs),
            ..defaults
        };

        env.finish()?;

        Ok(Self {
            store,
            mail,
            recipient,
            text_service,
        })
    }
}

/// Lookup over a fixed map; handy for tests and dry runs.
pub fn map_lookup<'a>(
    vars: &'a BTreeMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Option<String> + 'a {
    move |name| vars.get(name).map(|v| v.to_string())
}
