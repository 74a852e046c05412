pub mod appointment;
pub mod contact;
pub mod gallery;
pub mod service;

pub use appointment::{Appointment, AppointmentStatus};
pub use contact::ContactInfo;
pub use gallery::GalleryImage;
pub use service::Service;
