pub mod audio_models;
pub mod error;
pub mod merge_result;
pub mod profile;
pub mod settings;
pub mod state;
