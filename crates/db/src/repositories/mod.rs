pub mod editor_state_repo;

pub use editor_state_repo::EditorStateRepo;
