use maud::{html, Markup, DOCTYPE};

/// HTML body for an alert email. The plain-text alert is the only content.
pub fn alert_email(subject: &str, message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (subject) }
            }
            body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;" {
                div style="max-width: 600px; margin: 0 auto; padding: 20px;" {
                    h2 { (subject) }
                    @for line in message.lines() {
                        p { (line) }
                    }
                    hr style="margin-top: 30px; border: none; border-top: 1px solid #eee;";
                    p style="font-size: 0.8em; color: #999;" {
                        "You are receiving this because you signed up for price alerts."
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_escaped() {
        let html = alert_email("Deal", "Paris <CDG> & back").into_string();
        assert!(html.contains("Paris &lt;CDG&gt; &amp; back"));
        assert!(html.contains("<title>Deal</title>"));
    }

    #[test]
    fn each_line_gets_a_paragraph() {
        let html = alert_email("TSLA", "TSLA: 🔺5%\nHeadline: x").into_string();
        assert!(html.contains("<p>TSLA: 🔺5%</p>"));
        assert!(html.contains("<p>Headline: x</p>"));
    }
}
