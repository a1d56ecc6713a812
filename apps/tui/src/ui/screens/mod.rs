pub mod home;
pub mod hospital;
pub mod manager;
pub mod map;
pub mod overlays;
pub mod rewards;
pub mod settings;
pub mod tasks;
