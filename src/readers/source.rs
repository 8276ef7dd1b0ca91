use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Where a spreadsheet is read from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

impl Source {
    /// Anything starting with `http://` or `https://` is a URL, the rest are paths
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(trimmed.to_string())
        } else {
            Source::Path(PathBuf::from(trimmed))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Source::Url(_))
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl FromStr for Source {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Source::parse(s))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Url(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_kind() {
        assert_eq!(
            Source::parse("https://example.org/monitoreo.csv"),
            Source::Url("https://example.org/monitoreo.csv".to_string())
        );
        assert!(Source::parse("HTTP://example.org/a.csv").is_remote());
        assert_eq!(
            Source::parse(" data/13_Monitoreo_Junio_2021.csv "),
            Source::Path(PathBuf::from("data/13_Monitoreo_Junio_2021.csv"))
        );
    }

    #[test]
    fn test_display_round_trip() {
        let source: Source = "data/junio.csv".parse().unwrap();
        assert_eq!(source.to_string(), "data/junio.csv");
    }
}
