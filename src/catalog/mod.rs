//! Catalog Module
//! Mission: Reference data of the booking domain, readable by anyone, editable by admins

pub mod api;
pub mod city_store;

pub use city_store::{City, CityDraft, CityStore};
