pub mod editor_state;
