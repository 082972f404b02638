pub mod adapter;
pub mod analytics;
pub mod calendar;
pub mod client;
pub mod export;
pub mod filters;
pub mod forms;
pub mod session;

pub use crate::domain::ports::{BookingApi, ConfigProvider, Storage};
pub use crate::utils::error::Result;
