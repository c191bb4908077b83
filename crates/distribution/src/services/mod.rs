pub mod inhabit_service;

pub use inhabit_service::{DynInhabitService, InhabitService, InhabitServiceTrait};
