//! Bot service
//!
//! Routes each incoming chat message to the timetable port, the stop locator
//! or the settings flow and returns the replies to send back.

use std::{collections::HashSet, fmt, sync::Arc};

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use domain::{ChatId, GeoLocation, LineNumber, StopCode, StopCount};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::{
    command_parser::{BotCommand, CommandParser, ParsedInput},
    error::ApplicationError,
    messages::{IncomingMessage, MessageContent, Reply, ReplyKeyboard},
    ports::{PreferenceStore, TimetablePort},
    services::{
        renderer::{self, DisplayText},
        stop_locator::StopCatalog,
    },
};

/// Runtime settings of the bot service
#[derive(Debug, Clone)]
pub struct BotSettings {
    /// Upper bound accepted by `/stops`
    pub max_stop_count: u32,
    /// Timezone used to pick the service day for line schedules
    pub network_timezone: Tz,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            max_stop_count: 10,
            network_timezone: chrono_tz::Europe::Rome,
        }
    }
}

/// Service answering chat messages
///
/// Holds no global state: the catalog, the timetable port, the preference
/// store and the settings are injected. The only mutable state is the set of
/// chats that were asked for a stop count and have not answered yet.
pub struct BotService {
    catalog: Arc<StopCatalog>,
    timetable: Arc<dyn TimetablePort>,
    preferences: Arc<dyn PreferenceStore>,
    settings: BotSettings,
    parser: CommandParser,
    awaiting_stop_count: Mutex<HashSet<ChatId>>,
}

impl fmt::Debug for BotService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotService")
            .field("catalog_size", &self.catalog.len())
            .field("settings", &self.settings)
            .field("pending", &self.awaiting_stop_count.lock().len())
            .finish_non_exhaustive()
    }
}

impl BotService {
    /// Create a new bot service
    pub fn new(
        catalog: Arc<StopCatalog>,
        timetable: Arc<dyn TimetablePort>,
        preferences: Arc<dyn PreferenceStore>,
        settings: BotSettings,
    ) -> Self {
        Self {
            catalog,
            timetable,
            preferences,
            settings,
            parser: CommandParser::new(),
            awaiting_stop_count: Mutex::new(HashSet::new()),
        }
    }

    /// The settings this service runs with
    pub const fn settings(&self) -> &BotSettings {
        &self.settings
    }

    /// Answer one incoming message
    ///
    /// Never fails: every error is collapsed into a short reply text.
    #[instrument(skip(self, message), fields(chat_id = %message.chat_id))]
    pub async fn handle(&self, message: &IncomingMessage) -> Vec<Reply> {
        match &message.content {
            MessageContent::Text(text) => self.handle_text(message.chat_id, text).await,
            MessageContent::Location {
                latitude,
                longitude,
            } => self.handle_location(message.chat_id, *latitude, *longitude).await,
        }
    }

    async fn handle_text(&self, chat_id: ChatId, text: &str) -> Vec<Reply> {
        let parsed = self.parser.parse(text);

        if !matches!(parsed, ParsedInput::Command(_)) && self.is_awaiting(chat_id) {
            return vec![self.save_stop_count(chat_id, text).await];
        }

        let reply = match parsed {
            ParsedInput::Command(command) => self.handle_command(chat_id, command).await,
            ParsedInput::Stop(code) => Reply::text(self.stop_departures(&code).await),
            ParsedInput::Line(line) => Reply::text(self.line_schedule(&line).await),
            ParsedInput::Invalid(error) => Reply::text(report(&ApplicationError::Domain(error))),
        };
        vec![reply]
    }

    async fn handle_command(&self, chat_id: ChatId, command: BotCommand) -> Reply {
        match command {
            BotCommand::Start | BotCommand::Help => Reply::text(renderer::help()),
            BotCommand::SetStops(None) => self.ask_stop_count(chat_id),
            BotCommand::SetStops(Some(argument)) => self.save_stop_count(chat_id, &argument).await,
            BotCommand::Cancel => {
                self.awaiting_stop_count.lock().remove(&chat_id);
                Reply::text_with_keyboard(
                    DisplayText::plain(renderer::SETTINGS_NOT_SAVED),
                    ReplyKeyboard::Remove,
                )
            },
            BotCommand::Unknown(name) => {
                debug!(command = %name, "Unknown command");
                Reply::text(renderer::unknown_command(&name))
            },
        }
    }

    /// Look up the live passages at a stop
    pub async fn stop_departures(&self, code: &StopCode) -> DisplayText {
        match self.timetable.fetch_stop(code).await {
            Ok(timetable) => {
                debug!(
                    stop = %code,
                    departures = timetable.departures.len(),
                    "Fetched stop timetable"
                );
                renderer::render_stop_timetable(&timetable)
            },
            Err(e) => report(&e),
        }
    }

    /// Look up today's schedule of a line
    pub async fn line_schedule(&self, line: &LineNumber) -> DisplayText {
        match self.timetable.fetch_line(line, self.service_day()).await {
            Ok(timetable) => {
                debug!(
                    line = %line,
                    directions = timetable.directions.len(),
                    "Fetched line timetable"
                );
                renderer::render_line_timetable(&timetable)
            },
            Err(e) => report(&e),
        }
    }

    fn service_day(&self) -> NaiveDate {
        Utc::now()
            .with_timezone(&self.settings.network_timezone)
            .date_naive()
    }

    async fn handle_location(&self, chat_id: ChatId, latitude: f64, longitude: f64) -> Vec<Reply> {
        let origin = match GeoLocation::new(latitude, longitude) {
            Ok(origin) => origin,
            Err(e) => {
                return vec![Reply::text(report(&ApplicationError::Domain(e)))];
            },
        };

        let count = self.stop_count_for(chat_id).await;
        let nearest = self.catalog.find_nearest(&origin, count);

        let mut replies = vec![Reply::text(renderer::render_nearest(&nearest))];
        if let Some(closest) = nearest.first() {
            replies.push(Reply::Location(closest.stop.location));
        }
        replies
    }

    /// Stored preference, falling back to the default on a miss or a failure
    async fn stop_count_for(&self, chat_id: ChatId) -> StopCount {
        match self.preferences.get(chat_id).await {
            Ok(Some(count)) => count.clamped(self.settings.max_stop_count),
            Ok(None) => StopCount::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read stop count, using default");
                StopCount::default()
            },
        }
    }

    fn is_awaiting(&self, chat_id: ChatId) -> bool {
        self.awaiting_stop_count.lock().contains(&chat_id)
    }

    fn ask_stop_count(&self, chat_id: ChatId) -> Reply {
        self.awaiting_stop_count.lock().insert(chat_id);
        Reply::text_with_keyboard(
            DisplayText::plain(renderer::stop_count_prompt(self.settings.max_stop_count)),
            number_keyboard(),
        )
    }

    async fn save_stop_count(&self, chat_id: ChatId, text: &str) -> Reply {
        let count = match StopCount::parse(text, self.settings.max_stop_count) {
            Ok(count) => count,
            Err(e) => {
                debug!(error = %e, "Rejected stop count");
                return self.ask_stop_count(chat_id);
            },
        };

        self.awaiting_stop_count.lock().remove(&chat_id);

        match self.preferences.put(chat_id, count).await {
            Ok(()) => {
                info!(count = count.get(), "Stop count saved");
                Reply::text_with_keyboard(
                    DisplayText::plain(renderer::SETTINGS_SAVED),
                    ReplyKeyboard::Remove,
                )
            },
            Err(e) => Reply::text_with_keyboard(report(&e), ReplyKeyboard::Remove),
        }
    }
}

/// Log a failed request and render its sentinel
fn report(error: &ApplicationError) -> DisplayText {
    if error.is_user_error() {
        debug!(error = %error, "Rejected user input");
    } else {
        warn!(error = %error, "Request failed");
    }
    renderer::render_error(error)
}

fn number_keyboard() -> ReplyKeyboard {
    ReplyKeyboard::Buttons(
        [["7", "8", "9"], ["4", "5", "6"], ["1", "2", "3"]]
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use domain::{Departure, LineDirection, LineTimetable, Stop, StopTimetable};

    use super::*;
    use crate::ports::{MockPreferenceStore, MockTimetablePort};

    fn chat() -> ChatId {
        ChatId::new(42)
    }

    fn catalog() -> Arc<StopCatalog> {
        let stop = |code: &str, name: &str, lat: f64| {
            Stop::new(
                StopCode::parse(code).unwrap(),
                Some(name.to_string()),
                GeoLocation::new(lat, 8.9).unwrap(),
            )
        };
        Arc::new(
            StopCatalog::from_stops(vec![
                stop("0003", "Far", 44.45),
                stop("0001", "Near", 44.401),
                stop("0002", "Middle", 44.42),
            ])
            .unwrap(),
        )
    }

    fn service(timetable: MockTimetablePort, preferences: MockPreferenceStore) -> BotService {
        BotService::new(
            catalog(),
            Arc::new(timetable),
            Arc::new(preferences),
            BotSettings::default(),
        )
    }

    fn text_of(reply: &Reply) -> &str {
        reply.as_text().map(|t| t.text.as_str()).unwrap()
    }

    fn departure(line: &str, destination: &str) -> Departure {
        Departure {
            line: line.to_string(),
            destination: destination.to_string(),
            scheduled_time: "08:00".to_string(),
            estimated_arrival: "3 min".to_string(),
        }
    }

    #[tokio::test]
    async fn stop_code_renders_departures_in_order() {
        let mut timetable = MockTimetablePort::new();
        timetable
            .expect_fetch_stop()
            .withf(|code| code.as_str() == "1234")
            .times(1)
            .returning(|code| {
                Ok(StopTimetable {
                    code: code.clone(),
                    stop_name: "Via Roma".to_string(),
                    departures: vec![departure("12", "Centro"), departure("35", "Brignole")],
                })
            });

        let replies = service(timetable, MockPreferenceStore::new())
            .handle(&IncomingMessage::text(chat(), "1234"))
            .await;

        assert_eq!(replies.len(), 1);
        let text = text_of(&replies[0]);
        assert!(text.contains("Via Roma"));
        assert!(text.find("Centro").unwrap() < text.find("Brignole").unwrap());
        assert_eq!(
            replies[0].as_text().unwrap().mode,
            renderer::RenderMode::MonospaceBlock
        );
    }

    #[tokio::test]
    async fn empty_stop_renders_no_transit() {
        let mut timetable = MockTimetablePort::new();
        timetable.expect_fetch_stop().returning(|code| {
            Ok(StopTimetable {
                code: code.clone(),
                stop_name: "Via Roma".to_string(),
                departures: vec![],
            })
        });

        let replies = service(timetable, MockPreferenceStore::new())
            .handle(&IncomingMessage::text(chat(), "1234"))
            .await;
        assert_eq!(text_of(&replies[0]), renderer::NO_TRANSIT);
    }

    #[tokio::test]
    async fn invalid_text_makes_no_network_call() {
        let mut timetable = MockTimetablePort::new();
        timetable.expect_fetch_stop().never();
        timetable.expect_fetch_line().never();

        let replies = service(timetable, MockPreferenceStore::new())
            .handle(&IncomingMessage::text(chat(), "abc"))
            .await;
        assert_eq!(text_of(&replies[0]), renderer::INVALID_CODE);
    }

    #[tokio::test]
    async fn line_number_fetches_schedule() {
        let mut timetable = MockTimetablePort::new();
        timetable
            .expect_fetch_line()
            .withf(|line, _| line.as_str() == "18")
            .times(1)
            .returning(|line, _| {
                Ok(LineTimetable {
                    line: line.clone(),
                    title: None,
                    directions: vec![LineDirection {
                        label: "Partenze da Caricamento".to_string(),
                        times: vec!["05:30".to_string(), "06:00".to_string()],
                    }],
                })
            });

        let replies = service(timetable, MockPreferenceStore::new())
            .handle(&IncomingMessage::text(chat(), "18"))
            .await;
        assert!(text_of(&replies[0]).contains("05:30, 06:00"));
    }

    #[tokio::test]
    async fn retrieval_failure_renders_generic_message() {
        let mut timetable = MockTimetablePort::new();
        timetable
            .expect_fetch_stop()
            .returning(|_| Err(ApplicationError::Retrieval("connection refused".to_string())));

        let replies = service(timetable, MockPreferenceStore::new())
            .handle(&IncomingMessage::text(chat(), "1234"))
            .await;
        assert_eq!(text_of(&replies[0]), renderer::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn location_without_preference_returns_one_stop_and_a_pin() {
        let mut preferences = MockPreferenceStore::new();
        preferences.expect_get().times(1).returning(|_| Ok(None));

        let replies = service(MockTimetablePort::new(), preferences)
            .handle(&IncomingMessage::location(chat(), 44.4, 8.9))
            .await;

        assert_eq!(replies.len(), 2);
        let text = text_of(&replies[0]);
        assert!(text.starts_with("Nearest stop:\n"));
        assert_eq!(text.matches("Code : ").count(), 1);
        assert!(text.contains("Code : 0001"));
        assert_eq!(
            replies[1],
            Reply::Location(GeoLocation::new(44.401, 8.9).unwrap())
        );
    }

    #[tokio::test]
    async fn location_uses_stored_count() {
        let mut preferences = MockPreferenceStore::new();
        preferences
            .expect_get()
            .returning(|_| Ok(Some(StopCount::new(2, 10).unwrap())));

        let replies = service(MockTimetablePort::new(), preferences)
            .handle(&IncomingMessage::location(chat(), 44.4, 8.9))
            .await;

        let text = text_of(&replies[0]);
        assert!(text.starts_with("Nearest stops:\n"));
        assert!(text.find("Code : 0001").unwrap() < text.find("Code : 0002").unwrap());
        assert!(!text.contains("0003"));
    }

    #[tokio::test]
    async fn stored_count_above_lowered_limit_is_capped() {
        let mut preferences = MockPreferenceStore::new();
        preferences
            .expect_get()
            .returning(|_| Ok(Some(StopCount::from_stored(50))));

        let service = BotService::new(
            catalog(),
            Arc::new(MockTimetablePort::new()),
            Arc::new(preferences),
            BotSettings {
                max_stop_count: 2,
                ..BotSettings::default()
            },
        );
        let replies = service
            .handle(&IncomingMessage::location(chat(), 44.4, 8.9))
            .await;

        let text = text_of(&replies[0]);
        assert_eq!(text.matches("Code : ").count(), 2);
        assert!(!text.contains("0003"));
    }

    #[tokio::test]
    async fn failed_lookup_is_logged_as_warning() {
        let mut timetable = MockTimetablePort::new();
        timetable
            .expect_fetch_stop()
            .returning(|_| Err(ApplicationError::Retrieval("connection refused".to_string())));

        let counter = crate::test_support::EventCounter::default();
        let _guard = counter.install();
        let replies = service(timetable, MockPreferenceStore::new())
            .handle(&IncomingMessage::text(chat(), "1234"))
            .await;

        assert_eq!(text_of(&replies[0]), renderer::SERVICE_UNAVAILABLE);
        assert_eq!(counter.warnings(), 1);
    }

    #[tokio::test]
    async fn invalid_input_is_not_logged_as_warning() {
        let counter = crate::test_support::EventCounter::default();
        let _guard = counter.install();
        let replies = service(MockTimetablePort::new(), MockPreferenceStore::new())
            .handle(&IncomingMessage::text(chat(), "abc"))
            .await;

        assert_eq!(text_of(&replies[0]), renderer::INVALID_CODE);
        assert_eq!(counter.warnings(), 0);
        assert!(counter.total() >= 1);
    }

    #[tokio::test]
    async fn preference_read_failure_falls_back_to_one() {
        let mut preferences = MockPreferenceStore::new();
        preferences
            .expect_get()
            .returning(|_| Err(ApplicationError::Internal("disk I/O error".to_string())));

        let replies = service(MockTimetablePort::new(), preferences)
            .handle(&IncomingMessage::location(chat(), 44.4, 8.9))
            .await;
        assert_eq!(text_of(&replies[0]).matches("Code : ").count(), 1);
    }

    #[tokio::test]
    async fn out_of_range_location_is_rejected() {
        let mut preferences = MockPreferenceStore::new();
        preferences.expect_get().never();

        let replies = service(MockTimetablePort::new(), preferences)
            .handle(&IncomingMessage::location(chat(), 120.0, 8.9))
            .await;
        assert_eq!(replies, vec![Reply::text(DisplayText::plain(renderer::INVALID_LOCATION))]);
    }

    #[tokio::test]
    async fn stops_flow_saves_answer() {
        let mut preferences = MockPreferenceStore::new();
        preferences
            .expect_put()
            .withf(|chat_id, count| *chat_id == ChatId::new(42) && count.get() == 5)
            .times(1)
            .returning(|_, _| Ok(()));
        let service = service(MockTimetablePort::new(), preferences);

        let prompt = service.handle(&IncomingMessage::text(chat(), "/stops")).await;
        assert_eq!(
            prompt[0],
            Reply::text_with_keyboard(
                DisplayText::plain("Please send a number between 1 and 10"),
                number_keyboard()
            )
        );

        let saved = service.handle(&IncomingMessage::text(chat(), "5")).await;
        assert_eq!(
            saved,
            vec![Reply::text_with_keyboard(
                DisplayText::plain(renderer::SETTINGS_SAVED),
                ReplyKeyboard::Remove
            )]
        );
        assert!(!service.is_awaiting(chat()));
    }

    #[tokio::test]
    async fn stops_flow_rejects_bad_answer_and_keeps_waiting() {
        let mut preferences = MockPreferenceStore::new();
        preferences.expect_put().never();
        let mut timetable = MockTimetablePort::new();
        // "12" would be a line outside the flow; while waiting it is an answer
        timetable.expect_fetch_line().never();
        let service = service(timetable, preferences);

        service.handle(&IncomingMessage::text(chat(), "/stops")).await;
        let replies = service.handle(&IncomingMessage::text(chat(), "12")).await;

        assert_eq!(text_of(&replies[0]), "Please send a number between 1 and 10");
        assert!(service.is_awaiting(chat()));
    }

    #[tokio::test]
    async fn stops_with_argument_saves_directly() {
        let mut preferences = MockPreferenceStore::new();
        preferences.expect_put().times(1).returning(|_, _| Ok(()));

        let replies = service(MockTimetablePort::new(), preferences)
            .handle(&IncomingMessage::text(chat(), "/stops 3"))
            .await;
        assert_eq!(text_of(&replies[0]), renderer::SETTINGS_SAVED);
    }

    #[tokio::test]
    async fn cancel_leaves_the_flow() {
        let mut preferences = MockPreferenceStore::new();
        preferences.expect_put().never();
        let mut timetable = MockTimetablePort::new();
        timetable.expect_fetch_stop().times(1).returning(|code| {
            Ok(StopTimetable {
                code: code.clone(),
                stop_name: "Via Roma".to_string(),
                departures: vec![],
            })
        });
        let service = service(timetable, preferences);

        service.handle(&IncomingMessage::text(chat(), "/stops")).await;
        let cancelled = service.handle(&IncomingMessage::text(chat(), "/cancel")).await;
        assert_eq!(text_of(&cancelled[0]), renderer::SETTINGS_NOT_SAVED);

        // Back to normal lookups
        let lookup = service.handle(&IncomingMessage::text(chat(), "1234")).await;
        assert_eq!(text_of(&lookup[0]), renderer::NO_TRANSIT);
    }

    #[tokio::test]
    async fn storage_failure_on_save_renders_internal_error() {
        let mut preferences = MockPreferenceStore::new();
        preferences
            .expect_put()
            .returning(|_, _| Err(ApplicationError::Internal("database is locked".to_string())));

        let replies = service(MockTimetablePort::new(), preferences)
            .handle(&IncomingMessage::text(chat(), "/stops 4"))
            .await;
        assert_eq!(text_of(&replies[0]), renderer::INTERNAL_FAILURE);
    }

    #[tokio::test]
    async fn pending_state_is_per_chat() {
        let mut timetable = MockTimetablePort::new();
        timetable.expect_fetch_line().times(1).returning(|line, _| {
            Ok(LineTimetable {
                line: line.clone(),
                title: None,
                directions: vec![],
            })
        });
        let service = service(timetable, MockPreferenceStore::new());

        service.handle(&IncomingMessage::text(chat(), "/stops")).await;
        let other = service
            .handle(&IncomingMessage::text(ChatId::new(7), "5"))
            .await;
        assert_eq!(text_of(&other[0]), renderer::NO_SUCH_LINE);
    }

    #[tokio::test]
    async fn help_and_unknown_commands() {
        let service = service(MockTimetablePort::new(), MockPreferenceStore::new());

        let help = service.handle(&IncomingMessage::text(chat(), "/start")).await;
        assert!(text_of(&help[0]).contains("stop code"));

        let unknown = service.handle(&IncomingMessage::text(chat(), "/foo")).await;
        assert!(text_of(&unknown[0]).contains("/foo"));
    }

    #[test]
    fn keyboard_layout() {
        let ReplyKeyboard::Buttons(rows) = number_keyboard() else {
            panic!("expected buttons");
        };
        assert_eq!(rows[0], vec!["7", "8", "9"]);
        assert_eq!(rows[2], vec!["1", "2", "3"]);
    }
}
