pub mod catalog_repository;
