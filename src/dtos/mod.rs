pub mod addtos;
pub mod propertydtos;
