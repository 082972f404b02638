pub mod cli;
pub mod toml_config;

use crate::core::calendar::CalendarView;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_url, Validate};
use toml_config::{ProfileConfig, DEFAULT_API_URL, DEFAULT_SESSION_DIR, DEFAULT_TIMEOUT_SECONDS};

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

pub const API_URL_ENV: &str = "BOOKING_DESK_API_URL";
pub const PROFILE_ENV: &str = "BOOKING_DESK_PROFILE";
pub const PASSWORD_ENV: &str = "BOOKING_DESK_PASSWORD";

/// Effective settings after profile, environment and flags are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct DeskConfig {
    pub api_base_url: String,
    pub business_slug: Option<String>,
    pub timeout_seconds: u64,
    pub session_dir: String,
    pub calendar_view: CalendarView,
    pub upcoming_minutes: i64,
    pub top_customers_limit: u32,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            business_slug: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            session_dir: DEFAULT_SESSION_DIR.to_string(),
            calendar_view: CalendarView::default(),
            upcoming_minutes: crate::app::views::UPCOMING_MINUTES,
            top_customers_limit: crate::app::views::TOP_CUSTOMERS_LIMIT,
        }
    }
}

impl DeskConfig {
    /// Profile values over built-in defaults. Display values that fail to
    /// parse fall back to the defaults; `ProfileConfig::validate` reports them.
    pub fn from_profile(profile: &ProfileConfig) -> Self {
        let defaults = Self::default();
        let display = profile.display();
        Self {
            api_base_url: profile.api_base_url().to_string(),
            business_slug: profile.business_slug().map(str::to_string),
            timeout_seconds: profile.timeout_seconds(),
            session_dir: profile.session_dir().to_string(),
            calendar_view: display
                .calendar_view
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.calendar_view),
            upcoming_minutes: display
                .upcoming_minutes
                .map(|m| m as i64)
                .unwrap_or(defaults.upcoming_minutes),
            top_customers_limit: display
                .top_customers_limit
                .unwrap_or(defaults.top_customers_limit),
        }
    }
}

impl ConfigProvider for DeskConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn business_slug(&self) -> Option<&str> {
        self.business_slug.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn session_dir(&self) -> &str {
        &self.session_dir
    }
}

impl Validate for DeskConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_url", &self.api_base_url)?;
        validate_path("session_dir", &self.session_dir)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "booking-desk")]
#[command(about = "Front desk for restaurants, salons and clinics on the booking API")]
pub struct CliConfig {
    /// Profile TOML with API, tenant and display settings
    #[arg(long, global = true)]
    pub profile: Option<String>,

    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Tenant slug sent as `x-business-slug`
    #[arg(long, global = true)]
    pub business: Option<String>,

    #[arg(long, global = true)]
    pub session_dir: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in and keep the session for later commands
    Login {
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
    Logout,
    Whoami,
    Dashboard,
    /// Today's bookings, optionally for one status
    Today {
        #[arg(long)]
        status: Option<String>,
    },
    Reservations {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        status: Option<String>,
    },
    Customers {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        vip: bool,
        /// Show one customer card
        #[arg(long)]
        id: Option<String>,
        #[command(subcommand)]
        action: Option<CustomerAction>,
    },
    Waitlist {
        #[command(subcommand)]
        action: Option<WaitlistAction>,
    },
    Analytics {
        #[arg(long)]
        limit: Option<u32>,
    },
    Calendar {
        /// Any day inside the period to show (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        view: Option<String>,
        /// Periods to move from the date, e.g. -1 for the previous week
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i32,
    },
    /// New table reservation
    Book {
        /// Existing customer to book for (name, phone or email, 2+ characters)
        #[arg(long)]
        customer: Option<String>,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        party: Option<u32>,
        #[arg(long, default_value = "")]
        occasion: String,
        #[arg(long, default_value = "")]
        requests: String,
    },
    /// New appointment for salons and clinics
    Appointment {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
        /// Service id or name from `GET /api/services`
        #[arg(long)]
        service: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Change the status of a booking or waitlist entry
    Status {
        id: String,
        status: String,
        #[arg(long)]
        waitlist: bool,
    },
    /// Delete an appointment
    Delete { id: String },
    Admin {
        #[command(subcommand)]
        action: Option<AdminCommand>,
    },
    /// Write bookings, customers and waitlist to a ZIP of CSV files
    Export {
        #[arg(long, default_value = crate::core::export::REPORT_FILE)]
        output: String,
        /// Directory for the report, defaults to the current one
        #[arg(long, default_value = ".")]
        dir: String,
    },
    BusinessTypes,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum CustomerAction {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        vip: bool,
        #[arg(long)]
        notes: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        vip: Option<bool>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum WaitlistAction {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        party: u32,
        #[arg(long, default_value_t = 15)]
        wait: u32,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum AdminCommand {
    /// Create a business with its first admin account
    Create {
        #[arg(long = "type", default_value = "restaurant")]
        business_type: String,
        #[arg(long)]
        name: String,
        /// Defaults to one generated from the name
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        admin_name: String,
        #[arg(long)]
        admin_email: String,
        #[arg(long)]
        admin_password: String,
    },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Flags beat environment, environment beats the profile.
    pub fn resolve(&self) -> Result<DeskConfig> {
        let profile_path = self
            .profile
            .clone()
            .or_else(|| std::env::var(PROFILE_ENV).ok());

        let mut config = match profile_path {
            Some(path) => {
                tracing::debug!("Loading profile {}", path);
                let profile = ProfileConfig::from_file(&path)?;
                profile.validate()?;
                DeskConfig::from_profile(&profile)
            }
            None => DeskConfig::default(),
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.api_base_url = url;
        }
        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(slug) = &self.business {
            config.business_slug = Some(slug.clone());
        }
        if let Some(dir) = &self.session_dir {
            config.session_dir = dir.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_overrides_defaults() {
        let profile = ProfileConfig::from_toml_str(
            r#"
[api]
base_url = "https://reservas.example.com"

[tenant]
slug = "buen-sabor"

[display]
calendar_view = "dia"
upcoming_minutes = 45
"#,
        )
        .unwrap();

        let config = DeskConfig::from_profile(&profile);
        assert_eq!(config.api_base_url, "https://reservas.example.com");
        assert_eq!(config.business_slug.as_deref(), Some("buen-sabor"));
        assert_eq!(config.calendar_view, CalendarView::Day);
        assert_eq!(config.upcoming_minutes, 45);
        assert_eq!(config.top_customers_limit, 10);
        assert_eq!(config.session_dir, DEFAULT_SESSION_DIR);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(DeskConfig::default().validate().is_ok());

        let broken = DeskConfig {
            api_base_url: "localhost".to_string(),
            ..DeskConfig::default()
        };
        assert!(broken.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_flags_win() {
        let cli = CliConfig::parse_from([
            "booking-desk",
            "--api-url",
            "https://api.flag.es",
            "--business",
            "salon-laura",
            "today",
            "--status",
            "pending",
        ]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.api_base_url, "https://api.flag.es");
        assert_eq!(config.business_slug.as_deref(), Some("salon-laura"));
        assert!(matches!(cli.command, Command::Today { status: Some(ref s) } if s == "pending"));
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_calendar_offset_accepts_negative() {
        let cli = CliConfig::parse_from(["booking-desk", "calendar", "--offset", "-1", "--view", "week"]);
        assert!(matches!(cli.command, Command::Calendar { offset: -1, .. }));
    }
}
