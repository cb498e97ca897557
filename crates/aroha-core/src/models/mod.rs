pub mod assessment;
pub mod consent;
pub mod locale;
pub mod severity;
