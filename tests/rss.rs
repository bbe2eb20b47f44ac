use httpmock::Method::GET;
use httpmock::MockServer;
use std::time::Duration;
use stocktoons_news::api::{NewsSource, RssSource};
use stocktoons_news::config::FeedSource;
use stocktoons_news::news::Category;

fn rss_body() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Markets</title>
    <link>https://example.com</link>
    <description>Test feed</description>
    <item>
      <guid>mk-1</guid>
      <title>Oil prices slip as supply grows</title>
      <link>https://example.com/oil</link>
      <description>&lt;p&gt;Crude fell for a &lt;b&gt;third&lt;/b&gt; day.&lt;/p&gt;</description>
      <pubDate>Mon, 02 Mar 2020 10:00:00 GMT</pubDate>
    </item>
    <item>
      <guid>mk-2</guid>
      <title>Apple (AAPL) beats on iPhone sales</title>
      <link>https://example.com/apple</link>
      <description>Services revenue also climbed.</description>
      <pubDate>Tue, 03 Mar 2020 10:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#
        .to_string()
}

fn source_for(feeds: Vec<FeedSource>) -> RssSource {
    RssSource::new(
        feeds,
        vec!["AAPL".to_string(), "TSLA".to_string()],
        Duration::from_secs(6 * 3600),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn normalizes_feed_entries() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/markets.xml");
        then.status(200)
            .header("content-type", "application/rss+xml")
            .body(rss_body());
    });

    let feed = FeedSource {
        url: server.url("/markets.xml"),
        category: Category::Markets,
        publisher: Some("Test Wire".to_string()),
        featured: true,
    };
    let articles = source_for(vec![feed]).fetch().await.unwrap();
    mock.assert();

    assert_eq!(articles.len(), 2);
    let apple = &articles[0];
    assert_eq!(apple.id, "mk-2");
    assert_eq!(apple.title, "Apple (AAPL) beats on iPhone sales");
    assert_eq!(apple.source, "Test Wire");
    assert_eq!(apple.category, Category::Markets);
    assert_eq!(apple.related_stocks, vec!["AAPL"]);
    assert!(apple.is_hot, "tracked ticker mention marks hot");
    assert!(apple.is_featured, "newest entry of a featured feed");
    assert_eq!(apple.url.as_deref(), Some("https://example.com/apple"));

    let oil = &articles[1];
    assert_eq!(oil.summary, "Crude fell for a third day.");
    assert!(oil.related_stocks.is_empty());
    assert!(!oil.is_hot);
    assert!(!oil.is_featured);
}

#[tokio::test]
async fn one_failing_feed_is_skipped() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ok.xml");
        then.status(200).body(rss_body());
    });
    server.mock(|when, then| {
        when.method(GET).path("/down.xml");
        then.status(503);
    });

    let source = source_for(vec![
        FeedSource::new(&server.url("/ok.xml"), Category::Tech),
        FeedSource::new(&server.url("/down.xml"), Category::Economy),
    ]);
    let articles = source.fetch().await.unwrap();
    assert_eq!(articles.len(), 2);
    assert!(articles.iter().all(|a| a.category == Category::Tech));
    assert!(articles.iter().all(|a| !a.is_featured));
}

#[tokio::test]
async fn all_feeds_failing_is_upstream_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/garbage.xml");
        then.status(200).body("this is not a feed");
    });
    server.mock(|when, then| {
        when.method(GET).path("/down.xml");
        then.status(500);
    });

    let source = source_for(vec![
        FeedSource::new(&server.url("/garbage.xml"), Category::General),
        FeedSource::new(&server.url("/down.xml"), Category::General),
    ]);
    let err = source.fetch().await.unwrap_err();
    assert!(err.is_upstream());
    assert!(err.to_string().contains("down.xml"));
}

#[tokio::test]
async fn no_feeds_is_empty() {
    let articles = source_for(Vec::new()).fetch().await.unwrap();
    assert!(articles.is_empty());
}
