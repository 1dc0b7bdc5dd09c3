use crate::error::{Result, VidlensError};

/// Environment variable holding the analysis server base address.
pub const SERVER_ENV_VAR: &str = "VIDLENS_SERVER";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    base_url: String,
}

impl ServerConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Resolve the server address from the environment.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(SERVER_ENV_VAR).map_err(|_| VidlensError::MissingServer {
            env_var: SERVER_ENV_VAR.to_string(),
        })?;
        Ok(Self::new(base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn upload_chunk_url(&self) -> String {
        format!("{}/api/upload-chunk/", self.base_url)
    }

    pub fn generate_analysis_url(&self) -> String {
        format!("{}/api/generate-analysis/", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalized() {
        let config = ServerConfig::new("http://localhost:8000/");
        assert_eq!(
            config.upload_chunk_url(),
            "http://localhost:8000/api/upload-chunk/"
        );
        assert_eq!(
            config.generate_analysis_url(),
            "http://localhost:8000/api/generate-analysis/"
        );
    }
}
