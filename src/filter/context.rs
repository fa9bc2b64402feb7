use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

/// Player size as emitted in `width`/`height` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Pixels(u32),
    Percent(u32),
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{}", px),
            Self::Percent(pct) => write!(f, "{}%", pct),
        }
    }
}

impl FromStr for Dimension {
    type Err = String;

    /// Parse "640", "640px" or "100%".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || format!("invalid dimension: {:?}", s);

        if let Some(pct) = s.strip_suffix('%') {
            pct.trim().parse().map(Self::Percent).map_err(|_| invalid())
        } else {
            s.strip_suffix("px")
                .unwrap_or(s)
                .trim()
                .parse()
                .map(Self::Pixels)
                .map_err(|_| invalid())
        }
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(px) => Ok(Self::Pixels(px)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// The requester on whose behalf tokens are issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub display_name: String,
    pub email: String,
}

/// Everything one filter call needs to know about the page being rendered.
#[derive(Debug, Clone)]
pub struct FilterContext {
    /// Short name of the course the content belongs to, if any.
    pub course_identifier: Option<String>,
    pub player_width: Dimension,
    pub player_height: Dimension,
    pub user: UserInfo,
}

impl FilterContext {
    pub fn new(
        course_identifier: Option<String>,
        player_width: Dimension,
        player_height: Dimension,
        user: UserInfo,
    ) -> Self {
        Self {
            course_identifier,
            player_width,
            player_height,
            user,
        }
    }
}
