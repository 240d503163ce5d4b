//! Domain layer: entities, value objects, ports, and services

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
