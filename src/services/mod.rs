pub mod posters;
pub mod recommender;

pub use posters::{Poster, PosterFetcher, PosterProvider, PosterUrls, TmdbPosterProvider};
pub use recommender::{KeywordHeadPolicy, Recommender, RecommenderOptions, ScoredMovie};
