pub mod home_controller;
pub mod prices_controller;
