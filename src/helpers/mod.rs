pub mod errors;
pub mod handler_404;
pub mod normalizer;
pub mod view_model;
