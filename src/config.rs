use dotenv::dotenv;
use std::env;

/// AppConfig gathers everything the process reads from the environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Full Postgres connection string.
    pub database_url: String,
    pub port: u16,
    /// Secret used to sign and verify bearer tokens.
    pub jwt_secret: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv().ok(); // Load .env file if present
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            port: env::var("PORT")?.parse()?,
            jwt_secret: env::var("JWT_SECRET")?,
        })
    }
}
