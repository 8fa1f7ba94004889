//! Web context for Contextor: DuckDuckGo search, page fetching, and
//! readable-text extraction.

pub mod extract;
pub mod fetch;
pub mod retriever;
pub mod search;

pub use extract::extract_text;
pub use fetch::HttpPageFetcher;
pub use retriever::WebRetriever;
pub use search::DuckDuckGoSearch;
