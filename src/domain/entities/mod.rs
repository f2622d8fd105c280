pub mod about;
pub mod contact;
pub mod dates;
pub mod education;
pub mod envelope;
pub mod experience;
pub mod lenient;
pub mod photo;
pub mod project;
pub mod skill;
