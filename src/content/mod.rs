//! Content module - handles posts, frontmatter and markdown processing

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use error::{ContentError, ParseFailure};
pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::{ContentLoader, LoadReport};
pub use markdown::{count_words, strip_html, MarkdownRenderer};
pub use post::{HowTo, HowToStep, Post};
