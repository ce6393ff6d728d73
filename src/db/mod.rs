pub mod addb;
pub mod db;
pub mod propertydb;
