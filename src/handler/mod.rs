pub mod advertisements;
pub mod home;
pub mod properties;
