pub mod availability;
pub mod booking_request;
pub mod calendar;
pub mod calendar_widget;
pub mod reports;
pub mod retry;
pub mod status_editor;
pub mod store;
