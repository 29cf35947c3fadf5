//! Services Layer
//!
//! Business logic that spans more than one repository call or touches the
//! filesystem, kept out of the HTTP handlers.

pub mod composer_picker;
pub mod concert_service;
