// In-memory stand-ins for the vendor APIs.
use crate::errors::AppError;
use crate::flights::{FlightProvider, IataLookup, OfferResponse, SearchQuery};
use crate::notify::{DedupScope, MailSender, MessageSender, Notifier, PhoneNumbers, SentLog};
use crate::sheets::{CodeUpdate, Customer, Destination, DestinationStore};
use crate::stocks::{Article, DailyClose, NewsSource, QuoteSource};
use chrono::NaiveDate;
use serde_json::json;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

pub fn destination(id: u64, city: &str, code: &str, lowest_price: f64) -> Destination {
    Destination {
        id,
        city: city.into(),
        iata_code: code.into(),
        lowest_price,
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn segment(from: &str, to: &str, at: &str) -> serde_json::Value {
    json!({
        "departure": { "iataCode": from, "at": at },
        "arrival": { "iataCode": to, "at": at }
    })
}

/// Round trip LON → `dest` with `stops` connections on the way out.
pub fn offer(price: f64, dest: &str, stops: usize) -> serde_json::Value {
    let mut outbound = Vec::new();
    let mut from = "LHR".to_string();
    for i in 0..stops {
        let via = format!("VA{i}");
        outbound.push(segment(&from, &via, "2025-01-02T08:00:00"));
        from = via;
    }
    outbound.push(segment(&from, dest, "2025-01-02T12:00:00"));

    json!({
        "price": { "grandTotal": format!("{price:.2}"), "currency": "GBP" },
        "itineraries": [
            { "segments": outbound },
            { "segments": [ segment(dest, "LHR", "2025-06-30T18:00:00") ] }
        ]
    })
}

pub fn offers(list: Vec<serde_json::Value>) -> OfferResponse {
    serde_json::from_value(json!({ "data": list })).unwrap()
}

#[derive(Default)]
pub struct FakeStore {
    pub destinations: Vec<Destination>,
    pub customers: Vec<Customer>,
    pub fail_destinations: bool,
    pub fail_customers: bool,
    pub updates: RefCell<Vec<CodeUpdate>>,
}

impl DestinationStore for FakeStore {
    fn fetch_destinations(&self) -> Result<Vec<Destination>, AppError> {
        if self.fail_destinations {
            return Err(AppError::Api {
                status: 503,
                body: "sheet unavailable".into(),
            });
        }
        Ok(self.destinations.clone())
    }

    fn update_iata_codes(&self, updates: &[CodeUpdate]) -> Result<(), AppError> {
        self.updates.borrow_mut().extend(updates.iter().cloned());
        Ok(())
    }

    fn fetch_customers(&self) -> Result<Vec<Customer>, AppError> {
        if self.fail_customers {
            return Err(AppError::Network("connection reset".into()));
        }
        Ok(self.customers.clone())
    }
}

/// Answers searches from per-destination tables keyed by IATA code.
#[derive(Default)]
pub struct FakeProvider {
    pub codes: HashMap<String, IataLookup>,
    pub direct: HashMap<String, OfferResponse>,
    pub indirect: HashMap<String, OfferResponse>,
    /// Destinations whose searches fail outright.
    pub failing: HashSet<String>,
    pub lookups: RefCell<Vec<String>>,
    pub searches: RefCell<Vec<SearchQuery>>,
}

impl FlightProvider for FakeProvider {
    fn lookup_iata_code(&self, city: &str) -> Result<IataLookup, AppError> {
        self.lookups.borrow_mut().push(city.to_string());
        Ok(self.codes.get(city).cloned().unwrap_or(IataLookup::NotFound))
    }

    fn search_offers(&self, query: &SearchQuery) -> Result<Option<OfferResponse>, AppError> {
        self.searches.borrow_mut().push(query.clone());
        if self.failing.contains(&query.destination) {
            return Err(AppError::Api {
                status: 500,
                body: "internal error".into(),
            });
        }
        let table = if query.non_stop { &self.direct } else { &self.indirect };
        Ok(table.get(&query.destination).cloned())
    }
}

pub type TextLog = Rc<RefCell<Vec<(String, String, String)>>>;
pub type MailLog = Rc<RefCell<Vec<(Vec<String>, String, String)>>>;

pub struct RecordingTexts(pub TextLog);

impl MessageSender for RecordingTexts {
    fn send_message(&self, from: &str, to: &str, body: &str) -> Result<String, AppError> {
        let mut log = self.0.borrow_mut();
        log.push((from.into(), to.into(), body.into()));
        Ok(format!("SM{}", log.len()))
    }
}

pub struct RecordingMail(pub MailLog);

impl MailSender for RecordingMail {
    fn send_mail(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
    ) -> Result<Vec<String>, AppError> {
        self.0
            .borrow_mut()
            .push((recipients.to_vec(), subject.into(), body.into()));
        Ok(recipients.iter().map(|r| format!("<{r}>")).collect())
    }
}

pub struct FailingTexts;

impl MessageSender for FailingTexts {
    fn send_message(&self, _from: &str, _to: &str, _body: &str) -> Result<String, AppError> {
        Err(AppError::Api {
            status: 400,
            body: "invalid number".into(),
        })
    }
}

pub fn numbers() -> PhoneNumbers {
    PhoneNumbers {
        sms_from: "+15550001".into(),
        whatsapp_from: "+14155238886".into(),
        to: "+447700900123".into(),
    }
}

pub fn recording_notifier(scope: DedupScope) -> (Notifier, TextLog, MailLog) {
    let texts = TextLog::default();
    let mail = MailLog::default();
    let notifier = Notifier::new(
        Some(Box::new(RecordingTexts(texts.clone()))),
        Some(Box::new(RecordingMail(mail.clone()))),
        numbers(),
        "New Low Price Flight!",
        SentLog::new(scope),
    );
    (notifier, texts, mail)
}

pub struct FakeQuotes(pub Vec<DailyClose>);

impl QuoteSource for FakeQuotes {
    fn daily_closes(&self, _symbol: &str) -> Result<Vec<DailyClose>, AppError> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
pub struct FakeNews {
    pub articles: Vec<Article>,
    pub queries: RefCell<Vec<String>>,
}

impl NewsSource for FakeNews {
    fn headlines(&self, query: &str) -> Result<Vec<Article>, AppError> {
        self.queries.borrow_mut().push(query.to_string());
        Ok(self.articles.clone())
    }
}
