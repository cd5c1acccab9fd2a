pub mod capture_service;
pub mod content_service;
pub mod extract_service;
pub mod index_service;
pub mod match_service;
pub mod ocr_service;
pub mod pipeline_service;
