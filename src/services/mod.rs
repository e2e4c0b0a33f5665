pub mod billing;
pub mod clients;
pub mod rates;
pub mod shipments;
pub mod vendors;
pub mod zones;
