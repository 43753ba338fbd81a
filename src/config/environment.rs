//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno del servidor.

use std::env;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}'")]
    InvalidVar { var: &'static str, value: String },
}

/// Configuración del entorno
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    /// Sin DATABASE_URL se usa el repositorio en memoria
    pub database_url: Option<String>,
    pub cors_origins: Vec<String>,
    pub log_level: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            database_url: None,
            cors_origins: Vec::new(),
            log_level: "info".to_string(),
        }
    }
}

impl EnvironmentConfig {
    /// Cargar la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Igual que `from_env`, con una fuente de variables inyectable
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidVar { var: "PORT", value })?,
            None => defaults.port,
        };

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            port,
            host: lookup("HOST").unwrap_or(defaults.host),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, EnvironmentConfig::default());
        assert!(config.is_development());
        assert_eq!(config.server_url(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "production"),
            ("PORT", "8081"),
            ("DATABASE_URL", "postgresql://localhost/cars"),
            ("CORS_ORIGINS", "http://localhost:5173, https://loja.example"),
        ]))
        .unwrap();

        assert!(!config.is_development());
        assert_eq!(config.environment, "production");
        assert_eq!(config.port, 8081);
        assert_eq!(config.database_url.as_deref(), Some("postgresql://localhost/cars"));
        assert_eq!(config.cors_origins.len(), 2);
    }

    #[test]
    fn test_empty_database_url_means_in_memory() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[("DATABASE_URL", " ")])).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn test_invalid_port() {
        let err = EnvironmentConfig::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidVar { var: "PORT", value: "http".to_string() }
        );
    }
}
