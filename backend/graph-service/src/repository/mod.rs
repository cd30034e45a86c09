mod document_repository;
mod r#trait;

pub use document_repository::DocumentGraphRepository;
pub use r#trait::GraphRepositoryTrait;
