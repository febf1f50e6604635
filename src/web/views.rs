use crate::commands::{ActionOutcome, TurnReport};
use crate::components::scheduling::ScheduledEvent;
use crate::utils::time::format_span;
use askama::Template;
use chrono_tz::Tz;
use rust_i18n::t;

/// The single chat page: one input, one button, one results area
#[derive(Template)]
#[template(path = "chat.html")]
pub struct ChatPage {
    /// Value of the `lang` attribute
    pub lang: String,
    pub title: String,
    pub prompt_label: String,
    pub send_label: String,
    pub message: String,
    pub notice: String,
    pub show_report: bool,
    pub report: ReportView,
}

impl ChatPage {
    pub fn new(message: &str, locale: &str) -> Self {
        Self {
            lang: locale.to_string(),
            title: t!("page_title", locale = locale).to_string(),
            prompt_label: t!("prompt_label", locale = locale).to_string(),
            send_label: t!("send_button", locale = locale).to_string(),
            message: message.to_string(),
            notice: String::new(),
            show_report: false,
            report: ReportView::default(),
        }
    }

    pub fn with_notice(mut self, notice: String) -> Self {
        self.notice = notice;
        self
    }

    pub fn with_report(mut self, report: &TurnReport, timezone: &Tz) -> Self {
        self.show_report = true;
        self.report = ReportView::from_report(report, timezone);
        self
    }
}

#[derive(Debug, Default)]
pub struct ReportView {
    pub assistant_text: String,
    pub failure: String,
    pub outcomes: Vec<OutcomeView>,
}

#[derive(Debug)]
pub struct OutcomeView {
    pub text: String,
    pub failed: bool,
    pub events: Vec<EventLine>,
    /// Pretty-printed raw collection for list results
    pub raw: String,
}

#[derive(Debug)]
pub struct EventLine {
    pub name: String,
    pub when: String,
    pub status: String,
}

impl ReportView {
    fn from_report(report: &TurnReport, timezone: &Tz) -> Self {
        Self {
            assistant_text: report.assistant_text.clone().unwrap_or_default(),
            failure: report.failure.clone().unwrap_or_default(),
            outcomes: report
                .outcomes
                .iter()
                .map(|outcome| OutcomeView::from_outcome(outcome, timezone))
                .collect(),
        }
    }
}

impl OutcomeView {
    fn from_outcome(outcome: &ActionOutcome, timezone: &Tz) -> Self {
        let (events, raw) = match outcome {
            ActionOutcome::Listed { events } => (
                events
                    .iter()
                    .filter_map(|raw| ScheduledEvent::from_json(raw.clone()).ok())
                    .map(|event| EventLine::from_event(&event, timezone))
                    .collect(),
                serde_json::to_string_pretty(events).unwrap_or_default(),
            ),
            _ => (Vec::new(), String::new()),
        };

        Self {
            text: outcome.message(),
            failed: outcome.is_failure(),
            events,
            raw,
        }
    }
}

impl EventLine {
    fn from_event(event: &ScheduledEvent, timezone: &Tz) -> Self {
        Self {
            name: event.name.clone().unwrap_or_else(|| event.identifier.clone()),
            when: format_span(
                event.start_time.as_deref(),
                event.end_time.as_deref(),
                timezone,
            )
            .unwrap_or_default(),
            status: event.status.clone().unwrap_or_default(),
        }
    }
}
