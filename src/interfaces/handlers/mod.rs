pub mod admin;
pub mod contact;
pub mod content;
pub mod pages;
pub mod system;
