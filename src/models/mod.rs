pub mod admodel;
pub mod propertymodel;
