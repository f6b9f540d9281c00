pub mod handlers;
pub mod prompts;
pub mod report;
pub mod scorer;
pub mod scraper;
