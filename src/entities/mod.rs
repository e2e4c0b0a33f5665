pub mod bill;
pub mod client;
pub mod client_rate;
pub mod client_zone_rate;
pub mod shipment;
pub mod shipment_box;
pub mod vendor;
pub mod vendor_pincode;
pub mod zone;
