pub mod environmental_data;
pub mod health;
pub mod impact_limits;
pub mod params;
