pub mod annotation;
pub mod approval;
pub mod document;
