pub mod agenda;
pub mod calendar;
pub mod form;
pub mod mapper;
