//! Analysis backend selector

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidBackendError;

/// All available backends
pub const ALL_BACKENDS: &[BackendChoice] = &[BackendChoice::Faster, BackendChoice::Openai];

/// Transcription engine the service should run the job with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendChoice {
    /// Local faster-whisper model on the analysis host
    Faster,
    /// OpenAI hosted transcription
    #[default]
    Openai,
}

impl BackendChoice {
    /// Wire value sent in the `backend` form field
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Faster => "faster",
            Self::Openai => "openai",
        }
    }
}

impl FromStr for BackendChoice {
    type Err = InvalidBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "faster" => Ok(Self::Faster),
            "openai" => Ok(Self::Openai),
            _ => Err(InvalidBackendError { input: s.to_string() }),
        }
    }
}

impl fmt::Display for BackendChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_backends() {
        assert_eq!("faster".parse::<BackendChoice>().unwrap(), BackendChoice::Faster);
        assert_eq!("openai".parse::<BackendChoice>().unwrap(), BackendChoice::Openai);
    }

    #[test]
    fn parse_case_insensitive_and_trimmed() {
        assert_eq!("OpenAI".parse::<BackendChoice>().unwrap(), BackendChoice::Openai);
        assert_eq!("  FASTER ".parse::<BackendChoice>().unwrap(), BackendChoice::Faster);
    }

    #[test]
    fn parse_invalid() {
        let err = "whisper".parse::<BackendChoice>().unwrap_err();
        assert_eq!(err.input, "whisper");
        assert!(err.to_string().contains("faster, openai"));
        assert!("".parse::<BackendChoice>().is_err());
    }

    #[test]
    fn display_matches_wire_value() {
        for backend in ALL_BACKENDS {
            assert_eq!(backend.to_string(), backend.as_str());
        }
    }

    #[test]
    fn default_is_openai() {
        assert_eq!(BackendChoice::default(), BackendChoice::Openai);
    }
}
