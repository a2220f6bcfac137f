//! Boundary to external media generation services.
//!
//! Generators produce media references (URLs or data URIs) and caption
//! text that become ordinary clips through [`EditorCommand::AddClip`].
//! The timeline never waits on a generator: results are turned into
//! commands and queued like any other edit.

use async_trait::async_trait;

use cutline_common::error::{CutlineError, CutlineResult};
use cutline_project_model::MediaKind;

use crate::command::EditorCommand;

/// Image used when generation is unavailable or fails.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://picsum.photos/1280/720";

/// Caption used when generation is unavailable or fails.
pub const PLACEHOLDER_CAPTION: &str = "Video created with Cutline";

/// Caption used when the service answers with nothing.
pub const EMPTY_CAPTION_FALLBACK: &str = "Check out this amazing video!";

/// An external service that turns prompts into media.
#[async_trait]
pub trait MediaGenerator: Send + Sync {
    /// Generate one or more images for `prompt`, returned as references
    /// usable as a clip `src`.
    async fn generate_images(&self, prompt: &str) -> CutlineResult<Vec<String>>;

    /// Generate a short caption describing `prompt`.
    async fn generate_caption(&self, prompt: &str) -> CutlineResult<String>;
}

/// Offline generator that always answers with the placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderGenerator;

#[async_trait]
impl MediaGenerator for PlaceholderGenerator {
    async fn generate_images(&self, _prompt: &str) -> CutlineResult<Vec<String>> {
        Ok(vec![PLACEHOLDER_IMAGE_URL.to_string()])
    }

    async fn generate_caption(&self, _prompt: &str) -> CutlineResult<String> {
        Ok(PLACEHOLDER_CAPTION.to_string())
    }
}

/// Wraps a generator so callers always get usable media.
///
/// Failures and empty answers degrade to the placeholders with a warning.
#[derive(Debug, Clone)]
pub struct FallbackGenerator<G> {
    inner: G,
}

impl<G: MediaGenerator> FallbackGenerator<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Image references for `prompt`. Never empty.
    pub async fn images(&self, prompt: &str) -> Vec<String> {
        match self.inner.generate_images(prompt).await {
            Ok(images) if !images.is_empty() => images,
            Ok(_) => {
                tracing::warn!(prompt, "Image generation returned nothing; using placeholder");
                vec![PLACEHOLDER_IMAGE_URL.to_string()]
            }
            Err(e) => {
                tracing::warn!(prompt, error = %e, "Image generation failed; using placeholder");
                vec![PLACEHOLDER_IMAGE_URL.to_string()]
            }
        }
    }

    /// Caption for `prompt`. Never empty.
    pub async fn caption(&self, prompt: &str) -> String {
        match self.inner.generate_caption(prompt).await {
            Ok(caption) if !caption.trim().is_empty() => caption,
            Ok(_) => EMPTY_CAPTION_FALLBACK.to_string(),
            Err(e) => {
                tracing::warn!(prompt, error = %e, "Caption generation failed; using placeholder");
                PLACEHOLDER_CAPTION.to_string()
            }
        }
    }
}

/// One video clip per generated image.
pub fn image_clip_commands(images: impl IntoIterator<Item = String>) -> Vec<EditorCommand> {
    images
        .into_iter()
        .map(|src| EditorCommand::AddClip {
            kind: MediaKind::Video,
            src: Some(src),
            name: Some("Generated Image".to_string()),
        })
        .collect()
}

/// A text clip carrying `caption` as its name.
pub fn caption_clip_command(caption: impl Into<String>) -> EditorCommand {
    EditorCommand::AddClip {
        kind: MediaKind::Text,
        src: None,
        name: Some(caption.into()),
    }
}

/// Reject prompts a service would refuse outright.
pub fn validate_prompt(prompt: &str) -> CutlineResult<&str> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(CutlineError::generation("prompt is empty"));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenGenerator;

    #[async_trait]
    impl MediaGenerator for BrokenGenerator {
        async fn generate_images(&self, _prompt: &str) -> CutlineResult<Vec<String>> {
            Err(CutlineError::generation("quota exceeded"))
        }

        async fn generate_caption(&self, _prompt: &str) -> CutlineResult<String> {
            Err(CutlineError::generation("quota exceeded"))
        }
    }

    struct SilentGenerator;

    #[async_trait]
    impl MediaGenerator for SilentGenerator {
        async fn generate_images(&self, _prompt: &str) -> CutlineResult<Vec<String>> {
            Ok(Vec::new())
        }

        async fn generate_caption(&self, _prompt: &str) -> CutlineResult<String> {
            Ok("  ".to_string())
        }
    }

    #[tokio::test]
    async fn test_failures_degrade_to_placeholders() {
        let generator = FallbackGenerator::new(BrokenGenerator);
        assert_eq!(generator.images("sunset").await, vec![PLACEHOLDER_IMAGE_URL]);
        assert_eq!(generator.caption("sunset").await, PLACEHOLDER_CAPTION);
    }

    #[tokio::test]
    async fn test_empty_answers_degrade() {
        let generator = FallbackGenerator::new(SilentGenerator);
        assert_eq!(generator.images("sunset").await, vec![PLACEHOLDER_IMAGE_URL]);
        assert_eq!(generator.caption("sunset").await, EMPTY_CAPTION_FALLBACK);
    }

    #[tokio::test]
    async fn test_placeholder_generator_feeds_commands() {
        let generator = FallbackGenerator::new(PlaceholderGenerator);
        let commands = image_clip_commands(generator.images("city").await);
        assert_eq!(commands.len(), 1);
        assert!(matches!(
            &commands[0],
            EditorCommand::AddClip { kind: MediaKind::Video, src: Some(src), .. }
                if src == PLACEHOLDER_IMAGE_URL
        ));

        let caption = caption_clip_command(generator.caption("city").await);
        assert_eq!(
            caption,
            EditorCommand::AddClip {
                kind: MediaKind::Text,
                src: None,
                name: Some(PLACEHOLDER_CAPTION.to_string()),
            }
        );
    }

    #[test]
    fn test_validate_prompt() {
        assert_eq!(validate_prompt("  neon city ").unwrap(), "neon city");
        assert!(matches!(
            validate_prompt("   "),
            Err(CutlineError::Generation { .. })
        ));
    }
}
