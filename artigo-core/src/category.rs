//! The closed set of category labels.
//!
//! Every chunk in the index and every classification the pipeline emits
//! carries exactly one of these areas. Directory names are validated against
//! this enum at ingestion time instead of being copied verbatim into the
//! index.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown area '{0}', expected one of: Computacao, Medicina, Quimica")]
pub struct AreaParseError(String);

/// Category assigned to every indexed chunk and forced onto every
/// classification output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Area {
    Computacao,
    Medicina,
    Quimica,
}

impl Area {
    pub const ALL: [Area; 3] = [Area::Computacao, Area::Medicina, Area::Quimica];

    pub fn as_str(&self) -> &'static str {
        match self {
            Area::Computacao => "Computacao",
            Area::Medicina => "Medicina",
            Area::Quimica => "Quimica",
        }
    }

    /// Parses a data-directory name into an area.
    ///
    /// Tolerates case differences and the accented spellings the corpus
    /// folders tend to use ("Computação", "Química").
    pub fn from_dir_name(name: &str) -> Result<Self, AreaParseError> {
        let folded: String = name
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'ç' => 'c',
                'á' | 'à' | 'â' | 'ã' => 'a',
                'é' | 'ê' => 'e',
                'í' => 'i',
                'ó' | 'ô' | 'õ' => 'o',
                'ú' => 'u',
                other => other,
            })
            .collect();

        match folded.as_str() {
            "computacao" => Ok(Area::Computacao),
            "medicina" => Ok(Area::Medicina),
            "quimica" => Ok(Area::Quimica),
            _ => Err(AreaParseError(name.to_string())),
        }
    }
}

impl FromStr for Area {
    type Err = AreaParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Area::from_dir_name(s)
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
