pub mod annotation;
pub mod capture;
pub mod content;
