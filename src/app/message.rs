use crate::domain::model::Participant;
use crate::domain::ports::Notification;

pub const DEFAULT_SUBJECT: &str = "Secret Santa: Here is your lucky colleague !";
pub const DEFAULT_BUDGET: &str = "25.-CHF";

/// Fixed subject and budget shared by every message of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    pub subject: String,
    pub budget: String,
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self {
            subject: DEFAULT_SUBJECT.to_string(),
            budget: DEFAULT_BUDGET.to_string(),
        }
    }
}

impl MessageTemplate {
    pub fn new(subject: impl Into<String>, budget: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            budget: budget.into(),
        }
    }

    pub fn render(&self, gifter: &Participant, giftee: &Participant) -> Notification {
        Notification {
            to: gifter.email().to_string(),
            subject: self.subject.clone(),
            text_body: self.text_body(gifter, giftee),
            html_body: self.html_body(gifter, giftee),
        }
    }

    fn text_body(&self, gifter: &Participant, giftee: &Participant) -> String {
        let giftee_name = giftee.full_name();
        format!(
            "🎅 Hello {first_name} !\n\
             This year, you give a gift to :\n\
             \n\
             🎁➡  {giftee_name}  ⬅🎁\n\
             \n\
             Reminder : the maximum budget for the gift is {budget}\n\
             Reminder 2 : your gift goes to {giftee_name}\n\
             Reminder 3 : read reminder 2 once more\n\
             🎄🎄 See you soon 🎄🎄\n\
             \n\
             Santa\n\
             \n\
             This message was generated and sent automatically; nobody read it before you did.\n\
             To keep your colleague a secret, please do not reply to it.",
            first_name = gifter.first_name(),
            budget = self.budget,
        )
    }

    fn html_body(&self, gifter: &Participant, giftee: &Participant) -> String {
        let first_name = escape_html(gifter.first_name());
        let giftee_name = escape_html(&giftee.full_name());
        let budget = escape_html(&self.budget);
        format!(
            r#"<html>
    <head></head>
    <body>
        <p>🎅 Hello {first_name} !</p>
        <p>This year, you give a gift to :</p>
        <br/>
        <p>🎁➡  <strong>{giftee_name}</strong>  ⬅🎁</p>
        <br/>
        <p>Reminder : the maximum budget for the gift is {budget}<br/>
        Reminder 2 : your gift goes to {giftee_name}<br/>
        Reminder 3 : read reminder 2 once more</p>
        <p>🎄🎄 See you soon 🎄🎄</p>
        <p>Santa</p>
        <p><i>This message was generated and sent automatically; nobody read it before you did.<br/>
        To keep your colleague a secret, please do not reply to it.</i></p>
    </body>
</html>"#
        )
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
