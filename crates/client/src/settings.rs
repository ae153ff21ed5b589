//! Settings, read from an INI file and `UNITY_*` environment variables.

use crate::{Environment, Error, Result};
use config::{Config, File, FileFormat, Value};
use std::{collections::HashMap, fmt::Display, path::Path};

const ENV_PREFIX: &str = "UNITY";
const ENV_SEPARATOR: &str = "__";

/// Settings for every environment, grouped by section.
///
/// The INI file has one section per [Environment] (`[TEST]`, `[DEV]`,
/// `[OPS]`) plus any service sections:
///
/// ```ini
/// [TEST]
/// client_id = 40c2s0ulbhp9i0fmaph3su9jch
/// auth_endpoint = https://cognito-idp.us-west-2.amazonaws.com
/// unity_href = https://d3vc8w9zcq658.cloudfront.net/
/// ```
///
/// Environment variables override the file, with `__` between the section and
/// the key, e.g. `UNITY_TEST__UNITY_HREF`. Section names are
/// case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    sections: HashMap<String, HashMap<String, String>>,
}

/// The settings needed to open a session in one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSettings {
    /// The Cognito app client id.
    pub client_id: String,

    /// The Cognito endpoint.
    pub auth_endpoint: String,

    /// The root url of the Unity services.
    pub unity_href: String,
}

impl Settings {
    /// Loads settings from an optional INI file and the process environment.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds_client::{Environment, Settings};
    ///
    /// let settings = Settings::new(Some("data/environments.ini")).unwrap();
    /// let test = settings.environment(Environment::Test).unwrap();
    /// assert_eq!(test.unity_href, "https://unity.test/");
    /// ```
    pub fn new(path: Option<impl AsRef<Path>>) -> Result<Settings> {
        Settings::load(path, environment_source())
    }

    /// Parses settings from the contents of an INI file.
    ///
    /// The process environment is not consulted.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds_client::Settings;
    ///
    /// let settings = Settings::from_ini("[DEV]\nunity_href = https://unity.dev/\n").unwrap();
    /// assert_eq!(settings.get("dev", "unity_href"), Some("https://unity.dev/"));
    /// ```
    pub fn from_ini(contents: &str) -> Result<Settings> {
        let mut settings = Settings::default();
        settings.merge(
            Config::builder()
                .add_source(File::from_str(contents, FileFormat::Ini))
                .build()?,
        )?;
        Ok(settings)
    }

    fn load(path: Option<impl AsRef<Path>>, environment: config::Environment) -> Result<Settings> {
        let mut settings = Settings::default();
        if let Some(path) = path {
            let path = path.as_ref();
            tracing::debug!("reading settings from {}", path.display());
            settings.merge(
                Config::builder()
                    .add_source(File::from(path).format(FileFormat::Ini))
                    .build()?,
            )?;
        }
        settings.merge(Config::builder().add_source(environment).build()?)?;
        Ok(settings)
    }

    /// Overlays the values of `config` onto these settings.
    fn merge(&mut self, config: Config) -> Result<()> {
        let values: HashMap<String, Value> = config.try_deserialize()?;
        for (name, value) in values {
            // Top-level values, like UNITY_USER, aren't sections.
            let Ok(table) = value.into_table() else {
                continue;
            };
            let section = self.sections.entry(name.to_ascii_uppercase()).or_default();
            for (key, value) in table {
                if let Ok(value) = value.into_string() {
                    let _ = section.insert(key.to_ascii_lowercase(), value);
                }
            }
        }
        Ok(())
    }

    /// Returns a setting.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&section.to_ascii_uppercase())
            .and_then(|section| section.get(&key.to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// Returns the settings for an environment.
    ///
    /// Returns [Error::MissingEnvironment] if there's no section for it.
    pub fn environment(&self, environment: Environment) -> Result<EnvironmentSettings> {
        let section = environment.section();
        if !self.sections.contains_key(section) {
            return Err(Error::MissingEnvironment(environment));
        }
        let get = |key: &'static str| {
            self.get(section, key)
                .map(String::from)
                .ok_or_else(|| Error::MissingSetting {
                    section: section.to_string(),
                    key,
                })
        };
        Ok(EnvironmentSettings {
            client_id: get("client_id")?,
            auth_endpoint: get("auth_endpoint")?,
            unity_href: get("unity_href")?,
        })
    }
}

impl Display for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.sections.keys().collect();
        names.sort();
        for name in names {
            writeln!(f, "[{name}]")?;
            let section = &self.sections[name];
            let mut keys: Vec<_> = section.keys().collect();
            keys.sort();
            for key in keys {
                writeln!(f, "{key}: {}", section[key])?;
            }
        }
        Ok(())
    }
}

fn environment_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator(ENV_SEPARATOR)
}
