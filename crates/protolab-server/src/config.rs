use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    database: DatabaseSection,
    #[serde(default)]
    auth: AuthSection,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DatabaseSection {
    #[serde(default = "default_db_path")]
    path: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthSection {
    #[serde(default)]
    jwt_secret: Option<String>,
    #[serde(default = "default_token_ttl_hours")]
    token_ttl_hours: i64,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> String {
    "protolab.redb".to_string()
}

fn default_token_ttl_hours() -> i64 {
    24
}

impl ServerConfig {
    pub fn load() -> anyhow::Result<Self> {
        if let Some(file_config) = load_from_file()? {
            let jwt_secret = file_config
                .auth
                .jwt_secret
                .or_else(|| env::var("PROTOLAB_JWT_SECRET").ok())
                .ok_or_else(|| anyhow::anyhow!("No JWT secret configured"))?;

            return Ok(Self {
                host: file_config.server.host,
                port: file_config.server.port,
                db_path: file_config.database.path,
                jwt_secret,
                token_ttl_hours: file_config.auth.token_ttl_hours,
            });
        }

        Self::from_env()
    }

    fn from_env() -> anyhow::Result<Self> {
        let host = env::var("PROTOLAB_SERVER_HOST").unwrap_or_else(|_| default_host());
        let port = env::var("PROTOLAB_SERVER_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or_else(default_port);
        let db_path = env::var("PROTOLAB_DB_PATH").unwrap_or_else(|_| default_db_path());
        let jwt_secret = env::var("PROTOLAB_JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("PROTOLAB_JWT_SECRET is not set"))?;
        let token_ttl_hours = env::var("PROTOLAB_TOKEN_TTL_HOURS")
            .ok()
            .and_then(|value| value.parse::<i64>().ok())
            .unwrap_or_else(default_token_ttl_hours);

        Ok(Self {
            host,
            port,
            db_path,
            jwt_secret,
            token_ttl_hours,
        })
    }
}

fn load_from_file() -> anyhow::Result<Option<FileConfig>> {
    let config_path = env::var("PROTOLAB_SERVER_CONFIG").ok();
    let path = if let Some(path) = config_path {
        Some(path)
    } else if Path::new("server.toml").exists() {
        Some("server.toml".to_string())
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(None);
    };

    let contents = fs::read_to_string(&path)
        .map_err(|err| anyhow::anyhow!("Failed to read config {}: {}", path, err))?;
    let parsed: FileConfig = toml::from_str(&contents)
        .map_err(|err| anyhow::anyhow!("Failed to parse config {}: {}", path, err))?;
    Ok(Some(parsed))
}
