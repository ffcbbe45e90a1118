pub mod forms;
pub mod inventory;
pub mod search;
pub mod uploads;
