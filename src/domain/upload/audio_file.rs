//! Audio file value object

use std::fmt;
use std::path::Path;

use crate::domain::error::AudioFileError;

/// Recording formats the analysis service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioMimeType {
    Mp3,
    Wav,
    M4a,
    Aac,
}

impl AudioMimeType {
    pub const ALL: [AudioMimeType; 4] = [Self::Mp3, Self::Wav, Self::M4a, Self::Aac];

    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::M4a => "audio/mp4",
            Self::Aac => "audio/aac",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::M4a => "m4a",
            Self::Aac => "aac",
        }
    }

    /// Detect the type from a file name's extension
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|t| t.extension().eq_ignore_ascii_case(ext))
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recording ready to be uploaded: raw bytes, the file name the
/// service will see and the detected MIME type.
#[derive(Debug, Clone)]
pub struct AudioFile {
    file_name: String,
    data: Vec<u8>,
    mime_type: AudioMimeType,
}

impl AudioFile {
    /// Validate and wrap a recording
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Result<Self, AudioFileError> {
        let file_name = file_name.into();
        let mime_type = AudioMimeType::from_file_name(&file_name).ok_or_else(|| {
            AudioFileError::UnsupportedExtension {
                path: file_name.clone(),
            }
        })?;
        if data.is_empty() {
            return Err(AudioFileError::Empty(file_name));
        }
        Ok(Self {
            file_name,
            data,
            mime_type,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Get the raw audio data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        human_readable_size(self.size_bytes())
    }
}

/// Format a byte count as B/KB/MB
pub fn human_readable_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_accepted_extensions() {
        assert_eq!(AudioMimeType::from_file_name("a.mp3"), Some(AudioMimeType::Mp3));
        assert_eq!(AudioMimeType::from_file_name("a.WAV"), Some(AudioMimeType::Wav));
        assert_eq!(AudioMimeType::from_file_name("call.m4a"), Some(AudioMimeType::M4a));
        assert_eq!(
            AudioMimeType::from_file_name("1st_call_recording.aac"),
            Some(AudioMimeType::Aac)
        );
    }

    #[test]
    fn rejects_other_extensions() {
        assert_eq!(AudioMimeType::from_file_name("notes.txt"), None);
        assert_eq!(AudioMimeType::from_file_name("audio.ogg"), None);
        assert_eq!(AudioMimeType::from_file_name("noext"), None);
    }

    #[test]
    fn new_validates_extension() {
        let err = AudioFile::new("clip.flac", vec![1]).unwrap_err();
        assert!(matches!(err, AudioFileError::UnsupportedExtension { .. }));
    }

    #[test]
    fn new_rejects_empty_payload() {
        let err = AudioFile::new("clip.mp3", Vec::new()).unwrap_err();
        assert!(matches!(err, AudioFileError::Empty(_)));
    }

    #[test]
    fn accessors() {
        let file = AudioFile::new("call.aac", vec![0u8; 2048]).unwrap();
        assert_eq!(file.file_name(), "call.aac");
        assert_eq!(file.mime_type().as_str(), "audio/aac");
        assert_eq!(file.size_bytes(), 2048);
        assert_eq!(file.human_readable_size(), "2.0 KB");
    }

    #[test]
    fn human_readable_sizes() {
        assert_eq!(human_readable_size(500), "500 B");
        assert_eq!(human_readable_size(2 * 1024 * 1024), "2.0 MB");
    }
}
