use super::utils::*;
use crate::config::NotifyConfig;
use crate::db::init_db;
use crate::errors::AppError;
use crate::jobs::build_notifier;
use crate::notify::{Channel, DedupScope, Delivery, Notifier, SentLog};
use crate::retry::RetryPolicy;

fn emails() -> Vec<String> {
    vec!["ada@example.com".into(), "alan@example.com".into()]
}

#[test]
fn same_body_twice_hits_the_transport_once() {
    let (mut notifier, texts, _) = recording_notifier(DedupScope::Global);

    assert_eq!(notifier.send_sms("hello").unwrap(), Delivery::Sent(vec!["SM1".into()]));
    assert_eq!(notifier.send_sms("hello").unwrap(), Delivery::Duplicate);

    assert_eq!(texts.borrow().len(), 1);
}

#[test]
fn distinct_bodies_are_both_sent() {
    let (mut notifier, texts, _) = recording_notifier(DedupScope::Global);

    notifier.send_sms("deal one").unwrap();
    notifier.send_sms("deal two").unwrap();

    assert_eq!(texts.borrow().len(), 2);
    assert_eq!(notifier.sent_log().len(), 2);
}

#[test]
fn global_scope_dedups_across_channels() {
    let (mut notifier, texts, mail) = recording_notifier(DedupScope::Global);

    assert!(matches!(notifier.send_whatsapp("deal").unwrap(), Delivery::Sent(_)));
    assert_eq!(notifier.send_sms("deal").unwrap(), Delivery::Duplicate);
    assert_eq!(notifier.send_emails(&emails(), "deal").unwrap(), Delivery::Duplicate);

    assert_eq!(texts.borrow().len(), 1);
    assert!(mail.borrow().is_empty());
}

#[test]
fn per_channel_scope_sends_once_per_channel() {
    let (mut notifier, texts, mail) = recording_notifier(DedupScope::PerChannel);

    for channel in [Channel::WhatsApp, Channel::Email, Channel::WhatsApp, Channel::Email] {
        notifier.send(channel, &emails(), "deal").unwrap();
    }

    assert_eq!(texts.borrow().len(), 1);
    assert_eq!(mail.borrow().len(), 1);
}

#[test]
fn email_reports_one_confirmation_per_recipient() {
    let (mut notifier, _, mail) = recording_notifier(DedupScope::Global);

    let delivery = notifier.send_emails(&emails(), "deal").unwrap();

    assert_eq!(
        delivery,
        Delivery::Sent(vec!["<ada@example.com>".into(), "<alan@example.com>".into()])
    );
    assert_eq!(mail.borrow()[0].1, "New Low Price Flight!");
}

#[test]
fn sms_goes_from_virtual_to_verified_number() {
    let (mut notifier, texts, _) = recording_notifier(DedupScope::Global);
    notifier.send_sms("deal").unwrap();

    let (from, to, _) = &texts.borrow()[0];
    assert_eq!(from, "+15550001");
    assert_eq!(to, "+447700900123");
}

#[test]
fn failed_send_is_not_recorded() {
    let mut notifier = Notifier::new(
        Some(Box::new(FailingTexts)),
        None,
        numbers(),
        "subject",
        SentLog::new(DedupScope::Global),
    );

    assert!(notifier.send_sms("deal").is_err());
    assert!(notifier.sent_log().is_empty());
    assert!(notifier.send_sms("deal").is_err());
}

#[test]
fn channel_without_transport_is_a_config_error() {
    let mut notifier = Notifier::new(
        None,
        None,
        numbers(),
        "subject",
        SentLog::new(DedupScope::Global),
    );

    assert!(matches!(notifier.send_whatsapp("deal"), Err(AppError::Config(_))));
    assert!(matches!(notifier.send_emails(&emails(), "deal"), Err(AppError::Config(_))));
}

#[test]
fn durable_log_suppresses_repeats_from_an_earlier_run() {
    let db = init_db(":memory:").unwrap();

    let first_texts = TextLog::default();
    let mut first = Notifier::new(
        Some(Box::new(RecordingTexts(first_texts.clone()))),
        None,
        numbers(),
        "subject",
        SentLog::new(DedupScope::Global).with_store(db.clone()),
    );
    first.send_sms("TSLA: 🔺5%").unwrap();

    let second_texts = TextLog::default();
    let mut second = Notifier::new(
        Some(Box::new(RecordingTexts(second_texts.clone()))),
        None,
        numbers(),
        "subject",
        SentLog::new(DedupScope::Global).with_store(db),
    );
    assert_eq!(second.send_sms("TSLA: 🔺5%").unwrap(), Delivery::Duplicate);
    assert!(matches!(second.send_sms("TSLA: 🔻3%").unwrap(), Delivery::Sent(_)));

    assert_eq!(first_texts.borrow().len(), 1);
    assert_eq!(second_texts.borrow().len(), 1);
}

#[test]
fn empty_recipient_list_is_not_recorded() {
    let (mut notifier, texts, mail) = recording_notifier(DedupScope::Global);

    assert_eq!(notifier.send_emails(&[], "deal").unwrap(), Delivery::NoRecipients);
    assert!(mail.borrow().is_empty());
    assert!(notifier.sent_log().is_empty());

    assert!(matches!(notifier.send_whatsapp("deal").unwrap(), Delivery::Sent(_)));
    assert_eq!(texts.borrow().len(), 1);
}

#[test]
fn dry_run_leaves_durable_log_untouched() {
    let config = NotifyConfig {
        twilio: None,
        brevo: None,
        numbers: numbers(),
        subject: "New Low Price Flight!".into(),
        dedup_scope: DedupScope::Global,
        sent_log_db: Some(":memory:".into()),
    };

    let mut dry = build_notifier(&config, &RetryPolicy::immediate(1), true).unwrap();
    assert!(matches!(dry.send_sms("real deal").unwrap(), Delivery::Sent(_)));
    assert_eq!(dry.send_sms("real deal").unwrap(), Delivery::Duplicate);

    let texts = TextLog::default();
    let mut live = Notifier::new(
        Some(Box::new(RecordingTexts(texts.clone()))),
        None,
        numbers(),
        "subject",
        SentLog::new(DedupScope::Global).with_store(init_db(":memory:").unwrap()),
    );
    assert_eq!(live.send_sms("real deal").unwrap(), Delivery::Sent(vec!["SM1".into()]));
    assert_eq!(texts.borrow().len(), 1);
}
