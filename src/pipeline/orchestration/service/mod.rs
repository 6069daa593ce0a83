pub mod analyzer_service;
