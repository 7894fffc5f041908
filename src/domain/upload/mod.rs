//! Upload payload domain module

mod audio_file;

pub use audio_file::{human_readable_size, AudioFile, AudioMimeType};
