pub mod cars;
pub mod health;
pub mod rentals;
pub mod users;
