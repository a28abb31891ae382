pub mod company;
pub mod driver;
pub mod job_card;
pub mod truck;
pub mod user;
