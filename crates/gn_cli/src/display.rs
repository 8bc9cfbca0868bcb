use gn_core::Article;

pub const UNAVAILABLE: &str = "unavailable";
pub const NOT_ANALYZED: &str = "not analyzed";
const TITLE_WIDTH: usize = 50;
const RULE_WIDTH: usize = 80;
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_WIDTH {
        let head: String = title.chars().take(TITLE_WIDTH).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}

fn sentiment_label(article: &Article) -> &'static str {
    article.sentiment.map(|s| s.as_str()).unwrap_or(NOT_ANALYZED)
}

fn row(id: &str, date: &str, sentiment: &str, title: &str) -> String {
    format!("{:<5} | {:<20} | {:<12} | {}\n", id, date, sentiment, title)
}

/// Listing table, newest first as handed in.
pub fn format_listing(articles: &[Article]) -> String {
    let rule = format!("{}\n", "-".repeat(RULE_WIDTH));

    let mut out = format!("Found {} articles in the database\n\nArticles:\n", articles.len());
    out.push_str(&rule);
    out.push_str(&row("ID", "Date", "Sentiment", "Title"));
    out.push_str(&rule);

    for article in articles {
        out.push_str(&row(
            &article.id.to_string(),
            &article.published_at.format(DATE_FORMAT).to_string(),
            sentiment_label(article),
            &truncate_title(&article.title),
        ));
    }
    out
}

pub fn format_article(article: &Article) -> String {
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| UNAVAILABLE.to_string());

    [
        format!("ID:          {}", article.id),
        format!("Title:       {}", article.title),
        format!("Published:   {}", article.published_at.format(DATE_FORMAT)),
        format!("Description: {}", optional(&article.description)),
        format!("URL:         {}", optional(&article.url)),
        format!("Source:      {}", optional(&article.source)),
        format!("Sentiment:   {}", sentiment_label(article)),
    ]
    .iter()
    .map(|line| format!("{}\n", line))
    .collect()
}

/// One-line confirmation printed after an insert.
pub fn format_verification(article: &Article) -> String {
    format!(
        "id: {}, title: {}, sentiment: {}",
        article.id,
        article.title,
        sentiment_label(article)
    )
}
