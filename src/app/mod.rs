pub mod render;
pub mod views;

pub use views::DeskViews;
