pub mod articles;
pub mod traits;

pub use articles::SqliteArticleRepository;
pub use traits::{ArticleFilter, ArticleRepository, InsertOutcome};
