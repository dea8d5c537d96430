pub mod places_service;
