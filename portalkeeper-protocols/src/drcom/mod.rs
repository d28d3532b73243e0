//! Dr.COM direct-GET portal family
//!
//! The dorm zone portal has no challenge or cipher stage; credentials
//! travel as clear query parameters, a property of the portal itself.

pub mod strategy;

pub use strategy::DrcomStrategy;
