use clap::Parser;
use sitemark::{Scrape, results};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Starting scrape of {} to depth {}", args.url, args.depth);

    let mut scrape = Scrape::new(&args.url)
        .with_max_depth(args.depth)
        .with_delay(args.delay)
        .with_timeout(args.timeout)
        .with_max_concurrency(args.concurrency);
    if let Some(user_agent) = &args.user_agent {
        scrape = scrape.with_user_agent(user_agent);
    }

    // An invalid seed URL is the one fatal condition.
    let mut rx = match scrape.generate().await {
        Ok(rx) => rx,
        Err(e) => {
            ::log::error!("Failed to start crawl: {}", e);
            std::process::exit(1);
        }
    };

    // Collect pages as they come in
    let start_time = std::time::Instant::now();
    let mut pages = Vec::new();
    while let Some(page) = rx.recv().await {
        ::log::info!("Extracted page {}: {}", pages.len() + 1, page.url);
        pages.push(page);
    }

    let duration = start_time.elapsed();
    ::log::info!(
        "Crawl complete - {} pages in {:.2} seconds",
        pages.len(),
        duration.as_secs_f64()
    );

    let output = results::assemble(&pages);
    if let Err(e) = std::fs::write(&args.output, output) {
        ::log::error!("Failed to write {}: {}", args.output, e);
        std::process::exit(1);
    }

    println!("Results saved to: {}", args.output);
}
