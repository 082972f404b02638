//! Form drafts collected by the CLI prompts and their conversion into API
//! payloads. Every check reports `DeskError::ValidationError`.

use crate::core::adapter::{reservation_draft_to_appointment, ReservationDraft};
use crate::core::filters::StatusFilter;
use crate::domain::business_types::BusinessType;
use crate::domain::model::{
    BookingSource, NewAppointment, NewBusiness, NewReservation, NewWaitlistEntry, ReservationStatus,
    Service, WaitlistStatus,
};
use crate::utils::error::{DeskError, Result};
use crate::utils::validation::{parse_date, parse_time, require_non_empty, Validate};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_RESERVATION_TIME: &str = "20:00";
pub const DEFAULT_APPOINTMENT_TIME: &str = "10:00";
pub const DEFAULT_PARTY_SIZE: u32 = 2;
pub const MIN_SEARCH_CHARS: usize = 2;
pub const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<()> {
        require_non_empty("email", &self.email, "El email es obligatorio")?;
        require_non_empty("password", &self.password, "La contraseña es obligatoria")?;
        if !self.email.contains('@') {
            return Err(DeskError::validation("email", "El email no es válido"));
        }
        Ok(())
    }
}

impl ReservationDraft {
    pub fn for_reservation(today: NaiveDate) -> Self {
        Self {
            reservation_date: today.format("%Y-%m-%d").to_string(),
            reservation_time: DEFAULT_RESERVATION_TIME.to_string(),
            party_size: DEFAULT_PARTY_SIZE,
            ..Self::default()
        }
    }

    pub fn for_appointment(today: NaiveDate) -> Self {
        Self {
            reservation_date: today.format("%Y-%m-%d").to_string(),
            reservation_time: DEFAULT_APPOINTMENT_TIME.to_string(),
            party_size: 1,
            ..Self::default()
        }
    }

    /// Copies the picked service's name, id and duration into the draft.
    pub fn choose_service(&mut self, service: &Service) {
        self.service_id = Some(service.id.clone());
        self.service_name = Some(service.name.clone());
        self.duration_minutes = service.duration_minutes;
    }

    fn validate_common(&self, name_field: &str, phone_field: &str) -> Result<()> {
        require_non_empty(name_field, &self.customer_name, "El nombre es obligatorio")?;
        require_non_empty(phone_field, &self.customer_phone, "El teléfono es obligatorio")?;
        parse_date("date", &self.reservation_date)?;
        parse_time("time", &self.reservation_time)?;
        Ok(())
    }

    pub fn to_new_reservation(&self) -> Result<NewReservation> {
        self.validate_common("customer_name", "customer_phone")?;
        if self.party_size == 0 {
            return Err(DeskError::validation(
                "party_size",
                "El número de personas debe ser mayor que 0",
            ));
        }
        Ok(NewReservation {
            customer_id: self.customer_id.clone(),
            customer_name: self.customer_name.trim().to_string(),
            customer_phone: self.customer_phone.trim().to_string(),
            customer_email: self.customer_email.trim().to_string(),
            reservation_date: self.reservation_date.trim().to_string(),
            reservation_time: self.reservation_time.trim().to_string(),
            party_size: self.party_size,
            special_occasion: self.special_occasion.clone(),
            special_requests: self.special_requests.clone(),
            source: BookingSource::Manual,
        })
    }

    pub fn to_new_appointment(&self) -> Result<NewAppointment> {
        self.validate_common("client_name", "client_phone")?;
        Ok(reservation_draft_to_appointment(self))
    }
}

pub fn parse_status(raw: &str) -> Result<ReservationStatus> {
    raw.parse().map_err(|e: String| DeskError::validation("status", e))
}

pub fn parse_waitlist_status(raw: &str) -> Result<WaitlistStatus> {
    raw.parse().map_err(|e: String| DeskError::validation("status", e))
}

/// `all` (or nothing) disables the filter.
pub fn parse_status_filter(raw: Option<&str>) -> Result<StatusFilter> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("todas") => Ok(None),
        Some(s) => parse_status(s).map(Some),
    }
}

/// Typing a single character in the customer picker does not hit the API.
pub fn should_search_customers(term: &str) -> bool {
    term.trim().chars().count() >= MIN_SEARCH_CHARS
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaitlistDraft {
    pub customer_name: String,
    pub phone: String,
    pub party_size: u32,
    pub estimated_wait: u32,
    pub notes: Option<String>,
}

impl WaitlistDraft {
    pub fn to_payload(&self) -> Result<NewWaitlistEntry> {
        require_non_empty("customer_name", &self.customer_name, "El nombre es obligatorio")?;
        require_non_empty("phone", &self.phone, "El teléfono es obligatorio")?;
        if self.party_size == 0 {
            return Err(DeskError::validation(
                "party_size",
                "El número de personas debe ser mayor que 0",
            ));
        }
        Ok(NewWaitlistEntry {
            customer_name: self.customer_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            party_size: self.party_size,
            estimated_wait: self.estimated_wait,
            notes: self.notes.clone().filter(|n| !n.trim().is_empty()),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusinessDraft {
    pub business_type: BusinessType,
    pub name: String,
    pub slug: String,
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl BusinessDraft {
    /// Starts a draft whose slug follows the name.
    pub fn named(business_type: BusinessType, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            business_type,
            slug: slugify(&name),
            name,
            admin_name: String::new(),
            admin_email: String::new(),
            admin_password: String::new(),
        }
    }

    pub fn to_payload(&self) -> Result<NewBusiness> {
        require_non_empty("name", &self.name, "El nombre del negocio es obligatorio")?;
        require_non_empty("slug", &self.slug, "El slug es obligatorio")?;
        require_non_empty("admin_name", &self.admin_name, "El nombre del administrador es obligatorio")?;
        require_non_empty("admin_email", &self.admin_email, "El email es obligatorio")?;
        if !self.admin_email.contains('@') {
            return Err(DeskError::validation("admin_email", "El email no es válido"));
        }
        if self.admin_password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(DeskError::validation(
                "admin_password",
                format!("La contraseña debe tener al menos {} caracteres", MIN_PASSWORD_CHARS),
            ));
        }
        Ok(NewBusiness {
            business_type: self.business_type.key().to_string(),
            name: self.name.trim().to_string(),
            slug: self.slug.clone(),
            admin_email: self.admin_email.trim().to_string(),
            admin_password: self.admin_password.clone(),
            admin_name: self.admin_name.trim().to_string(),
        })
    }
}

/// Folds a lowercase Latin letter to ASCII. Letters outside Latin-1 and
/// Latin Extended-A pass through and end up as separators.
fn push_folded(out: &mut String, c: char) {
    let folded = match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' | 'ð' => 'd',
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' | 'ħ' => 'h',
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' | 'ŧ' => 't',
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        'ß' => return out.push_str("ss"),
        'æ' => return out.push_str("ae"),
        'œ' => return out.push_str("oe"),
        'þ' => return out.push_str("th"),
        other => other,
    };
    out.push(folded);
}

fn non_alphanumeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static slug pattern"))
}

/// `"Café Olé 2"` becomes `"cafe-ole-2"`.
pub fn slugify(name: &str) -> String {
    let mut folded = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        push_folded(&mut folded, c);
    }
    non_alphanumeric()
        .replace_all(&folded, "-")
        .trim_matches('-')
        .to_string()
}
