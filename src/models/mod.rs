pub mod booking;
pub mod catalog;
pub mod registration;

pub use booking::{Booking, BookingStatus, NewBooking};
pub use catalog::{EventCategory, PastEvent, Testimonial};
pub use registration::{CampRegistration, PaymentStatus, StallRegistration, StallSize};
