use super::{Dimension, LinkMatch, RenderMode};

/// Builds the player markup that replaces a watch link.
#[derive(Debug, Clone)]
pub struct EmbedBuilder {
    audio_height: Dimension,
    audio_label: String,
}

impl EmbedBuilder {
    pub fn new(audio_height: Dimension, audio_label: impl Into<String>) -> Self {
        Self {
            audio_height,
            audio_label: audio_label.into(),
        }
    }

    pub fn build(
        &self,
        link: &LinkMatch,
        mode: RenderMode,
        width: Dimension,
        height: Dimension,
        token: &str,
    ) -> String {
        match mode {
            RenderMode::Video => video_embed(&link.host, &link.video_id, width, height, token),
            RenderMode::Audio => audio_embed(
                &link.host,
                &link.video_id,
                self.audio_height,
                &self.audio_label,
                token,
            ),
        }
    }
}

pub fn video_embed(
    host: &str,
    video_id: &str,
    width: Dimension,
    height: Dimension,
    token: &str,
) -> String {
    iframe(
        &format!(
            "https://{}/embed/{}?token={}",
            host,
            video_id,
            urlencoding::encode(token)
        ),
        width,
        height,
    )
}

/// Labelled full-width audio player between two rules.
pub fn audio_embed(
    host: &str,
    video_id: &str,
    height: Dimension,
    label: &str,
    token: &str,
) -> String {
    // onlyaudio must stay ahead of token; existing players parse it positionally.
    let player = iframe(
        &format!(
            "https://{}/embed-audio/{}?onlyaudio=1&token={}",
            host,
            video_id,
            urlencoding::encode(token)
        ),
        Dimension::Percent(100),
        height,
    );
    format!("<h1>{}</h1><hr>{}<hr>", escape_text(label), player)
}

fn iframe(src: &str, width: Dimension, height: Dimension) -> String {
    format!(
        r#"<iframe src="{}" width="{}" height="{}" frameborder="0" allowfullscreen></iframe>"#,
        src, width, height
    )
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
