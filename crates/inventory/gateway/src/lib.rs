extern crate inventory_entity as entity;
extern crate inventory_migration as migration;

pub mod actix;
pub mod agent;
pub mod auth;
pub mod db;
pub mod error;
pub mod routes;
