//! Capa de acceso a datos: consultas SQL por entidad

pub mod company_repository;
pub mod driver_repository;
pub mod job_card_repository;
pub mod truck_repository;
pub mod user_repository;

pub use company_repository::CompanyRepository;
pub use driver_repository::DriverRepository;
pub use job_card_repository::JobCardRepository;
pub use truck_repository::TruckRepository;
pub use user_repository::UserRepository;
