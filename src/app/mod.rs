pub mod aggregate;
pub mod enrich_use_case;
pub mod ports;
