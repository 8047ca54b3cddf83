pub mod models;
pub mod services;

pub use models::{AppointmentRecord, AppointmentStatus, CalendarError, CalendarEvent, Modality};
pub use services::agenda::{AgendaService, AppointmentGateway};
pub use services::calendar::{CalendarState, CalendarView};
pub use services::form::EventForm;
