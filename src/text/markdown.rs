use std::fmt::Display;

use teloxide::utils::markdown::escape;

/// Text in telegram's markdown v2 syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markdown(String);

impl Markdown {
    pub(super) fn new<T>(content: T) -> Self
    where
        T: Into<String>,
    {
        Self(content.into())
    }

    pub fn escaped<T>(content: T) -> Self
    where
        T: Into<String>,
    {
        Self(escape(&content.into()))
    }
}

impl Display for Markdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Markdown> for String {
    fn from(value: Markdown) -> Self {
        value.0
    }
}
