pub mod embed;
pub mod sdk;
