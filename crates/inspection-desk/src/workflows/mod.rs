pub mod inspection;
pub mod vendor;
