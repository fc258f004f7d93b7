pub mod advisory;
pub mod forecast;
pub mod geoip;
