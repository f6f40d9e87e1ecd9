//! PostgreSQL credential record, read from a JSON file.

use crate::error::LoaderError;
use serde::Deserialize;
use serde::Deserializer;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Clone, Deserialize, PartialEq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
    pub host: String,
    pub database: String,
    /// Accepted as a JSON number or a numeric string
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
}

impl Credentials {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, LoaderError> {
        Ok(serde_json::from_str(content)?)
    }

    /// libpq keyword/value connection string.
    pub fn connection_string(&self) -> String {
        let port = self.port.to_string();
        [
            ("host", self.host.as_str()),
            ("port", port.as_str()),
            ("dbname", self.database.as_str()),
            ("user", self.user.as_str()),
            ("password", self.password.as_str()),
        ]
        .iter()
        .map(|(key, value)| format!("{key}={}", quote_connection_value(value)))
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// `postgresql://` URL with the password masked, for log output.
    pub fn redacted_url(&self) -> String {
        format!("postgresql://{}:****@{}/{}?port={}", self.user, self.host, self.database, self.port)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"****")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("port", &self.port)
            .finish()
    }
}

/// Single-quotes a libpq value when it is empty or holds spaces, quotes or backslashes.
fn quote_connection_value(value: &str) -> String {
    if !value.is_empty() && !value.contains(|character: char| character.is_whitespace() || character == '\'' || character == '\\') {
        value.to_owned()
    } else {
        format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(port) => Ok(port),
        Port::Text(port) => port.trim().parse().map_err(serde::de::Error::custom),
    }
}
