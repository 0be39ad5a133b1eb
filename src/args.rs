use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "sitemark")]
#[command(about = "Crawl a website and extract its content as formatted Markdown")]
#[command(version)]
pub struct Args {
    /// URL to scrape
    pub url: String,

    /// Output markdown file path
    #[arg(short, long, default_value = "scraped_content.md")]
    pub output: String,

    /// Maximum depth for recursive scraping (0 = single page)
    #[arg(short, long, default_value_t = 0)]
    pub depth: usize,

    /// Delay between requests in seconds
    #[arg(long, default_value_t = 1.0)]
    pub delay: f64,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Custom user agent string
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Number of concurrent fetch workers
    #[arg(short, long, default_value_t = 1)]
    pub concurrency: usize,
}
