pub mod calendar_events;
pub mod cesantias;
pub mod documents;
pub mod pqrsf;
pub mod solicitudes;
pub mod users;
