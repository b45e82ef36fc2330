mod alert_email;

pub use alert_email::alert_email;
