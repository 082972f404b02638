use crate::core::calendar::CalendarView;
use crate::core::ConfigProvider;
use crate::utils::error::{DeskError, Result};
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_SESSION_DIR: &str = ".booking-desk";

/// A named desk profile, e.g. `~/.config/booking-desk/salon.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub api: ApiConfig,
    pub tenant: Option<TenantConfig>,
    pub session: Option<SessionConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub calendar_view: Option<String>,
    pub upcoming_minutes: Option<usize>,
    pub top_customers_limit: Option<u32>,
}

impl ProfileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DeskError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DeskError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DeskError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;

        if let Some(timeout) = self.api.timeout_seconds {
            validate_range("api.timeout_seconds", timeout, 1, 300)?;
        }

        if let Some(dir) = self.session.as_ref().and_then(|s| s.dir.as_deref()) {
            validate_path("session.dir", dir)?;
        }

        if let Some(slug) = self.tenant.as_ref().and_then(|t| t.slug.as_deref()) {
            if slug.is_empty() || !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
                return Err(DeskError::InvalidConfigValueError {
                    field: "tenant.slug".to_string(),
                    value: slug.to_string(),
                    reason: "Slugs use lowercase letters, digits and dashes".to_string(),
                });
            }
        }

        let display = self.display();
        if let Some(minutes) = display.upcoming_minutes {
            validate_range(
                "display.upcoming_minutes",
                minutes,
                1,
                crate::core::filters::MAX_UPCOMING_MINUTES as usize,
            )?;
        }
        if let Some(limit) = display.top_customers_limit {
            validate_range("display.top_customers_limit", limit, 1, 100)?;
        }
        if let Some(view) = &display.calendar_view {
            view.parse::<CalendarView>().map_err(|reason| DeskError::InvalidConfigValueError {
                field: "display.calendar_view".to_string(),
                value: view.clone(),
                reason,
            })?;
        }

        Ok(())
    }

    pub fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn business_slug(&self) -> Option<&str> {
        self.tenant.as_ref().and_then(|t| t.slug.as_deref())
    }

    pub fn session_dir(&self) -> &str {
        self.session
            .as_ref()
            .and_then(|s| s.dir.as_deref())
            .unwrap_or(DEFAULT_SESSION_DIR)
    }

    pub fn display(&self) -> DisplayConfig {
        self.display.clone().unwrap_or_default()
    }
}

impl ConfigProvider for ProfileConfig {
    fn api_base_url(&self) -> &str {
        self.api_base_url()
    }

    fn business_slug(&self) -> Option<&str> {
        self.business_slug()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds()
    }

    fn session_dir(&self) -> &str {
        self.session_dir()
    }
}

impl Validate for ProfileConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
