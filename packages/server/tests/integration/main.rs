mod common;
mod search;
mod uploads;
