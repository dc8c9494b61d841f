use crate::gateway::NUM_IMAGES_TO_SHOW;

use super::Markdown;

/*
 * All text here uses markdown v2 syntax
 *
*/

pub struct Text;

impl Text {
    #[must_use]
    pub fn get_help_text() -> Markdown {
        Markdown::new(format!(
            "This bot implements an image search engine that uses text queries to find images\\.

To that end, the open\\-source CLIP model is used, which extracts embeddings from both text and images\\.

That part of the pipeline runs in a HuggingFace Space\\.

To use this bot, type `/query text_prompt` and wait a few seconds for the images to appear\\.

For example `/query Cat` will return {NUM_IMAGES_TO_SHOW} images of cats\\."
        ))
    }

    #[must_use]
    pub fn search_started() -> Markdown {
        Markdown::new("Wait a few seconds for the images to appear\\.\\.\\.")
    }

    #[must_use]
    pub fn image_result(url: &str) -> Markdown {
        Markdown::escaped(url)
    }
}
