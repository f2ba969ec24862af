pub mod manager;
pub mod view;
