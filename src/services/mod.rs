pub mod alerts;
pub mod products;
