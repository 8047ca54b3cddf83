pub mod drafts;
pub mod manual;
pub mod session;
pub mod upload;
pub mod validation;
