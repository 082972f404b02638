//! Per-vertical presentation config: vocabulary, feature switches and theme.
//!
//! Unknown business types fall back to the restaurant profile.

use crate::domain::model::Terminology;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    Restaurant,
    BeautySalon,
    AestheticClinic,
    DentalClinic,
    Barbershop,
}

impl BusinessType {
    pub const ALL: [BusinessType; 5] = [
        BusinessType::Restaurant,
        BusinessType::BeautySalon,
        BusinessType::AestheticClinic,
        BusinessType::DentalClinic,
        BusinessType::Barbershop,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            BusinessType::Restaurant => "restaurant",
            BusinessType::BeautySalon => "beauty_salon",
            BusinessType::AestheticClinic => "aesthetic_clinic",
            BusinessType::DentalClinic => "dental_clinic",
            BusinessType::Barbershop => "barbershop",
        }
    }

    /// Lenient lookup used for API payloads.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    pub fn config(&self) -> BusinessTypeConfig {
        match self {
            BusinessType::Restaurant => BusinessTypeConfig {
                kind: *self,
                name: "Restaurante",
                icon: "UtensilsCrossed",
                color: "blue",
                terminology: terms(
                    ("Reserva", "Reservas"),
                    ("Cliente", "Clientes"),
                    ("Mesa", "Mesas"),
                    "Mesero",
                    "Comensales",
                    ("Servicio", "Servicios"),
                ),
                features: Features {
                    waitlist: true,
                    tables: true,
                    menu_management: true,
                    medical_history: false,
                },
                theme: Theme {
                    primary: "#2563eb",
                    secondary: "#dbeafe",
                    accent: "#1e40af",
                    icon: "🍽️",
                },
            },
            BusinessType::BeautySalon => BusinessTypeConfig {
                kind: *self,
                name: "Salón de Belleza",
                icon: "Scissors",
                color: "pink",
                terminology: terms(
                    ("Cita", "Citas"),
                    ("Cliente", "Clientes"),
                    ("Silla", "Sillas"),
                    "Estilista",
                    "Personas",
                    ("Servicio", "Servicios"),
                ),
                features: Features {
                    waitlist: false,
                    tables: false,
                    menu_management: true,
                    medical_history: false,
                },
                theme: Theme {
                    primary: "#ec4899",
                    secondary: "#fce7f3",
                    accent: "#db2777",
                    icon: "💅",
                },
            },
            BusinessType::AestheticClinic => BusinessTypeConfig {
                kind: *self,
                name: "Clínica Estética",
                icon: "Sparkles",
                color: "purple",
                terminology: terms(
                    ("Cita", "Citas"),
                    ("Paciente", "Pacientes"),
                    ("Sala", "Salas"),
                    "Especialista",
                    "Pacientes",
                    ("Tratamiento", "Tratamientos"),
                ),
                features: Features {
                    waitlist: true,
                    tables: false,
                    menu_management: true,
                    medical_history: true,
                },
                theme: Theme {
                    primary: "#a855f7",
                    secondary: "#f3e8ff",
                    accent: "#9333ea",
                    icon: "✨",
                },
            },
            BusinessType::DentalClinic => BusinessTypeConfig {
                kind: *self,
                name: "Clínica Dental",
                icon: "Activity",
                color: "teal",
                terminology: terms(
                    ("Cita", "Citas"),
                    ("Paciente", "Pacientes"),
                    ("Consultorio", "Consultorios"),
                    "Odontólogo",
                    "Pacientes",
                    ("Procedimiento", "Procedimientos"),
                ),
                features: Features {
                    waitlist: true,
                    tables: false,
                    menu_management: true,
                    medical_history: true,
                },
                theme: Theme {
                    primary: "#14b8a6",
                    secondary: "#ccfbf1",
                    accent: "#0d9488",
                    icon: "🦷",
                },
            },
            BusinessType::Barbershop => BusinessTypeConfig {
                kind: *self,
                name: "Barbería",
                icon: "Scissors",
                color: "amber",
                terminology: terms(
                    ("Cita", "Citas"),
                    ("Cliente", "Clientes"),
                    ("Silla", "Sillas"),
                    "Barbero",
                    "Personas",
                    ("Servicio", "Servicios"),
                ),
                features: Features {
                    waitlist: true,
                    tables: false,
                    menu_management: true,
                    medical_history: false,
                },
                theme: Theme {
                    primary: "#f59e0b",
                    secondary: "#fef3c7",
                    accent: "#d97706",
                    icon: "💈",
                },
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    pub waitlist: bool,
    pub tables: bool,
    pub menu_management: bool,
    pub medical_history: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusinessTypeConfig {
    pub kind: BusinessType,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub terminology: Terminology,
    pub features: Features,
    pub theme: Theme,
}

/// Config for a raw type key; anything unrecognised gets the restaurant profile.
pub fn config_for(business_type: &str) -> BusinessTypeConfig {
    BusinessType::from_key(business_type)
        .unwrap_or(BusinessType::Restaurant)
        .config()
}

fn terms(
    booking: (&str, &str),
    customer: (&str, &str),
    resource: (&str, &str),
    staff: &str,
    capacity: &str,
    service: (&str, &str),
) -> Terminology {
    Terminology {
        booking: booking.0.to_string(),
        bookings: booking.1.to_string(),
        customer: customer.0.to_string(),
        customers: customer.1.to_string(),
        resource: resource.0.to_string(),
        resources: resource.1.to_string(),
        staff: staff.to_string(),
        capacity: capacity.to_string(),
        service: service.0.to_string(),
        services: service.1.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_falls_back_to_restaurant() {
        let config = config_for("car_wash");
        assert_eq!(config.kind, BusinessType::Restaurant);
        assert_eq!(config.terminology.booking, "Reserva");
    }

    #[test]
    fn test_clinic_vocabulary() {
        let config = config_for("dental_clinic");
        assert_eq!(config.terminology.customer, "Paciente");
        assert_eq!(config.terminology.services, "Procedimientos");
        assert!(config.features.medical_history);
        assert_eq!(config.theme.primary, "#14b8a6");
    }

    #[test]
    fn test_only_salon_lacks_waitlist() {
        let without: Vec<_> = BusinessType::ALL
            .iter()
            .filter(|t| !t.config().features.waitlist)
            .collect();
        assert_eq!(without, vec![&BusinessType::BeautySalon]);
    }

    #[test]
    fn test_keys_round_trip() {
        for kind in BusinessType::ALL {
            assert_eq!(BusinessType::from_key(kind.key()), Some(kind));
        }
    }
}
