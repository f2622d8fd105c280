pub mod about;
pub mod contact;
pub mod education;
pub mod experience;
pub mod gallery;
pub mod project;
pub mod skill;
pub mod sqlx_repo;
pub mod system;
