pub mod about;
pub mod contact;
pub mod education;
pub mod experience;
pub mod gallery;
pub mod projects;
pub mod skills;
