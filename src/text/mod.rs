mod markdown;
mod texts;

pub use markdown::Markdown;
pub use texts::Text;
