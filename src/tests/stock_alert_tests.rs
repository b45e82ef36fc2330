use super::utils::*;
use crate::notify::DedupScope;
use crate::stocks::{run_stock_alert, Article, DailyClose, StockAlertConfig};
use chrono::NaiveDate;

fn closes(latest: f64, previous: f64) -> Vec<DailyClose> {
    vec![
        DailyClose {
            date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
            close: latest,
        },
        DailyClose {
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            close: previous,
        },
    ]
}

fn articles(n: usize) -> Vec<Article> {
    (1..=n)
        .map(|i| Article {
            title: format!("Tesla story {i}"),
            description: Some(format!("Brief {i}")),
        })
        .collect()
}

#[test]
fn big_move_texts_the_first_three_headlines() {
    let quotes = FakeQuotes(closes(200.0, 180.0));
    let news = FakeNews {
        articles: articles(5),
        ..FakeNews::default()
    };
    let (mut notifier, texts, _) = recording_notifier(DedupScope::Global);

    let summary =
        run_stock_alert(&quotes, &news, &mut notifier, &StockAlertConfig::default()).unwrap();

    assert!(summary.triggered);
    assert_eq!(summary.percent, 10);
    assert_eq!(summary.sent, 3);
    assert_eq!(*news.queries.borrow(), vec!["Tesla Inc".to_string()]);

    let texts = texts.borrow();
    assert_eq!(texts.len(), 3);
    assert_eq!(texts[0].2, "TSLA: 🔺10%\nHeadline: Tesla story 1. \nBrief: Brief 1");
    assert_eq!(texts[2].2, "TSLA: 🔺10%\nHeadline: Tesla story 3. \nBrief: Brief 3");
}

#[test]
fn small_move_sends_nothing_and_skips_news() {
    let quotes = FakeQuotes(closes(100.0, 99.5));
    let news = FakeNews {
        articles: articles(3),
        ..FakeNews::default()
    };
    let (mut notifier, texts, _) = recording_notifier(DedupScope::Global);

    let summary =
        run_stock_alert(&quotes, &news, &mut notifier, &StockAlertConfig::default()).unwrap();

    assert!(!summary.triggered);
    assert_eq!(summary.sent, 0);
    assert!(news.queries.borrow().is_empty());
    assert!(texts.borrow().is_empty());
}

#[test]
fn repeated_headline_is_sent_once() {
    let quotes = FakeQuotes(closes(100.0, 110.0));
    let repeated = Article {
        title: "Tesla recall".into(),
        description: None,
    };
    let news = FakeNews {
        articles: vec![repeated.clone(), repeated],
        ..FakeNews::default()
    };
    let (mut notifier, texts, _) = recording_notifier(DedupScope::Global);

    let summary =
        run_stock_alert(&quotes, &news, &mut notifier, &StockAlertConfig::default()).unwrap();

    assert_eq!(summary.percent, -10);
    assert_eq!(summary.sent, 1);
    assert_eq!(summary.duplicates, 1);
    assert_eq!(texts.borrow()[0].2, "TSLA: 🔻-10%\nHeadline: Tesla recall. \nBrief: ");
}

#[test]
fn too_little_history_is_an_error() {
    let quotes = FakeQuotes(vec![]);
    let news = FakeNews::default();
    let (mut notifier, _, _) = recording_notifier(DedupScope::Global);

    assert!(run_stock_alert(&quotes, &news, &mut notifier, &StockAlertConfig::default()).is_err());
}
