use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use gn_core::config::{DEFAULT_CLIENT_TIMEOUT, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SCORER};
use gn_core::{
    ArticleStorage, ClientConfig, Error, NewArticle, Result, Sentiment, ServiceConfig, StoreConfig,
};
use gn_sentiment::{create_scorer, SentimentClient};
use gn_web::AppState;
use std::time::Duration;
use tracing::info;

mod display;
mod logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Gold news articles and sentiment analysis", long_about = None)]
pub struct Cli {
    /// Article store location: sqlite:<path>, postgres://..., or memory://
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the sentiment analysis HTTP service
    Serve {
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        #[arg(long, default_value = DEFAULT_SCORER, help = "Scorer to use. Available scorers: vader (default), keyword")]
        scorer: String,
        /// Also expose the read-only article API (requires --database-url)
        #[arg(long)]
        with_articles: bool,
    },
    /// Score text locally and print the result as JSON
    Analyze {
        text: Vec<String>,
        #[arg(long, default_value = DEFAULT_SCORER)]
        scorer: String,
    },
    /// Insert an article
    Insert {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        source: Option<String>,
        /// RFC 3339 timestamp; defaults to now
        #[arg(long)]
        published_at: Option<DateTime<Utc>>,
        /// Store this label instead of asking the sentiment service
        #[arg(long, conflicts_with = "skip_analysis")]
        sentiment: Option<Sentiment>,
        /// Store the article without a sentiment label
        #[arg(long)]
        skip_analysis: bool,
        #[arg(long, default_value = "http://localhost:8001")]
        sentiment_url: String,
        /// Seconds to wait for the sentiment service
        #[arg(long, default_value_t = DEFAULT_CLIENT_TIMEOUT.as_secs())]
        timeout: u64,
    },
    /// List all articles, newest first
    List,
    /// Show a single article
    Show { id: i64 },
}

fn store_config(cli: &Cli) -> Result<StoreConfig> {
    match cli.database_url.as_deref() {
        Some(url) => StoreConfig::parse(url),
        None => Err(Error::Config(
            "DATABASE_URL is not set (use --database-url or the DATABASE_URL environment variable)".to_string(),
        )),
    }
}

struct InsertRequest {
    article: NewArticle,
    sentiment: Option<Sentiment>,
    skip_analysis: bool,
    client: Option<ClientConfig>,
}

/// Resolve the label, persist the article and read it back.
async fn insert(storage: &dyn ArticleStorage, request: InsertRequest) -> Result<gn_core::Article> {
    let InsertRequest { mut article, sentiment, skip_analysis, client } = request;
    article.validate()?;

    article.sentiment = match (sentiment, skip_analysis, client) {
        (Some(label), _, _) => Some(label),
        (None, true, _) | (None, false, None) => None,
        (None, false, Some(config)) => {
            let client = SentimentClient::new(config)?;
            Some(client.classify_or_fallback(&article.sentiment_text()).await)
        }
    };

    let id = storage.insert_article(&article).await?;
    storage
        .get_article(id)
        .await?
        .ok_or_else(|| Error::Storage(format!("Article {} was not found after insert", id)))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init_logging("info");
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { host, port, scorer, with_articles } => {
            let config = ServiceConfig {
                host: host.clone(),
                port: *port,
                scorer: scorer.clone(),
            };
            let mut state = AppState::new(create_scorer(&config.scorer)?);
            if *with_articles {
                let storage = gn_storage::create_storage(&store_config(&cli)?).await?;
                state = state.with_storage(storage);
                info!("📚 Article API enabled");
            }
            let storage = state.storage.clone();
            let served = gn_web::serve(&config, state).await;
            if let Some(storage) = storage {
                storage.close().await;
            }
            served?;
        }
        Commands::Analyze { text, scorer } => {
            let text = text.join(" ");
            if text.trim().is_empty() {
                println!("{}", serde_json::json!({ "error": "No text provided for sentiment analysis" }));
            } else {
                let scorer = create_scorer(scorer)?;
                let analysis = gn_sentiment::analyze(scorer.as_ref(), &text);
                println!("{}", serde_json::to_string(&analysis)?);
            }
        }
        Commands::Insert {
            title,
            description,
            url,
            source,
            published_at,
            sentiment,
            skip_analysis,
            sentiment_url,
            timeout,
        } => {
            let config = store_config(&cli)?;
            let client = ClientConfig::new(sentiment_url)?.with_timeout(Duration::from_secs(*timeout));
            let storage = gn_storage::create_storage(&config).await?;

            let article = NewArticle {
                title: title.clone(),
                published_at: published_at.unwrap_or_else(Utc::now),
                description: description.clone(),
                url: url.clone(),
                source: source.clone(),
                sentiment: None,
            };
            let stored = insert(
                storage.as_ref(),
                InsertRequest {
                    article,
                    sentiment: *sentiment,
                    skip_analysis: *skip_analysis,
                    client: Some(client),
                },
            )
            .await;
            storage.close().await;
            let stored = stored?;

            println!("✅ Article inserted with id {}", stored.id);
            println!("{}", display::format_verification(&stored));
        }
        Commands::List => {
            let storage = gn_storage::create_storage(&store_config(&cli)?).await?;
            let articles = storage.list_articles().await;
            storage.close().await;
            print!("{}", display::format_listing(&articles?));
        }
        Commands::Show { id } => {
            let storage = gn_storage::create_storage(&store_config(&cli)?).await?;
            let article = storage.get_article(*id).await;
            storage.close().await;
            match article? {
                Some(article) => print!("{}", display::format_article(&article)),
                None => return Err(Error::Storage(format!("Article {} not found", id))),
            }
        }
    }

    Ok(())
}
