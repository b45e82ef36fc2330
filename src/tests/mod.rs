mod notifier_tests;
mod stock_alert_tests;
mod utils;
