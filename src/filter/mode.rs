use serde::Serialize;

/// How matched links are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Video,
    Audio,
}

/// Decides the render mode from a course identifier.
#[derive(Debug, Clone)]
pub struct ModeResolver {
    /// Upper-cased suffixes that select audio-only output.
    suffixes: Vec<String>,
}

impl ModeResolver {
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            suffixes: suffixes
                .into_iter()
                .map(|s| s.as_ref().trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Audio when the identifier ends with a configured suffix, ignoring case.
    pub fn resolve(&self, course_identifier: Option<&str>) -> RenderMode {
        let Some(identifier) = course_identifier else {
            return RenderMode::Video;
        };

        let identifier = identifier.trim_end().to_uppercase();
        if self.suffixes.iter().any(|suffix| identifier.ends_with(suffix.as_str())) {
            RenderMode::Audio
        } else {
            RenderMode::Video
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_AUDIO_SUFFIXES;

    fn resolver() -> ModeResolver {
        ModeResolver::new(DEFAULT_AUDIO_SUFFIXES)
    }

    #[test]
    fn test_absent_identifier_is_video() {
        assert_eq!(resolver().resolve(None), RenderMode::Video);
    }

    #[test]
    fn test_audio_suffix() {
        assert_eq!(resolver().resolve(Some("BIO101-HM")), RenderMode::Audio);
        assert_eq!(resolver().resolve(Some("BIO101-HS")), RenderMode::Audio);
        assert_eq!(resolver().resolve(Some("BIO101")), RenderMode::Video);
    }

    #[test]
    fn test_suffix_is_case_insensitive() {
        assert_eq!(resolver().resolve(Some("bio101-hw")), RenderMode::Audio);
    }

    #[test]
    fn test_suffix_must_be_at_end() {
        assert_eq!(resolver().resolve(Some("BIO-HM-2024")), RenderMode::Video);
        assert_eq!(resolver().resolve(Some("BIO101HM")), RenderMode::Video);
    }

    #[test]
    fn test_custom_suffix_set() {
        let resolver = ModeResolver::new(["-xa"]);
        assert_eq!(resolver.resolve(Some("CHEM-XA")), RenderMode::Audio);
        assert_eq!(resolver.resolve(Some("CHEM-HM")), RenderMode::Video);
    }

    #[test]
    fn test_empty_suffix_set_is_always_video() {
        let resolver = ModeResolver::new(Vec::<String>::new());
        assert_eq!(resolver.resolve(Some("BIO101-HM")), RenderMode::Video);
        assert_eq!(resolver.resolve(Some("")), RenderMode::Video);
    }
}
