pub mod alert;
pub mod price_point;

pub use alert::Alert;
pub use price_point::PricePoint;
