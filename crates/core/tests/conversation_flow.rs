//! End-to-end coverage of the conversation state machine and the
//! notification dispatcher against in-memory test doubles.

mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::NaiveDate;
use slotbook_core::transport::MessageRef;
use slotbook_core::{
    ConversationService, InboundEvent, NotificationDispatcher, ReservationStore, SessionStep,
};
use slotbook_domain::{ChannelId, CreateOutcome, ReservationCandidate, TimeOfDay, WorkingHours};
use support::{InMemoryStore, RecordingTransport};

const OPERATOR: &str = "operator-channel";

struct Harness {
    store: Arc<InMemoryStore>,
    transport: Arc<RecordingTransport>,
    service: ConversationService,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new(WorkingHours::default()));
        let transport = Arc::new(RecordingTransport::new());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            transport.clone(),
            ChannelId::new(OPERATOR),
        ));
        let service = ConversationService::new(
            store.clone(),
            transport.clone(),
            dispatcher,
            WorkingHours::default(),
            15,
        );
        Self { store, transport, service }
    }

    async fn begin(&self, identity: &str) {
        self.service
            .handle_event(InboundEvent::Begin { identity: ChannelId::new(identity) })
            .await
            .expect("begin event should be handled");
    }

    async fn text(&self, identity: &str, text: &str) {
        self.service
            .handle_event(InboundEvent::Text {
                identity: ChannelId::new(identity),
                text: text.to_string(),
            })
            .await
            .expect("text event should be handled");
    }

    async fn tap(&self, identity: &str, payload: &str) {
        self.service
            .handle_event(InboundEvent::Selection {
                identity: ChannelId::new(identity),
                event_id: format!("ev-{payload}"),
                origin: MessageRef {
                    channel: ChannelId::new(identity),
                    message_id: "m1".to_string(),
                },
                payload: payload.to_string(),
            })
            .await
            .expect("selection event should be handled");
    }

    async fn step(&self, identity: &str) -> Option<SessionStep> {
        self.service.active_session(&ChannelId::new(identity)).await.map(|s| s.step)
    }
}

fn candidate(date: &str, start: (u16, u16), end: (u16, u16), requester: &str) -> ReservationCandidate {
    ReservationCandidate {
        name: "Seed".to_string(),
        contact: "+0".to_string(),
        date: date.parse().unwrap(),
        start: TimeOfDay::from_hm(start.0, start.1).unwrap(),
        end: TimeOfDay::from_hm(end.0, end.1).unwrap(),
        requester: ChannelId::new(requester),
    }
}

#[tokio::test]
async fn full_conversation_creates_exactly_one_reservation() {
    let h = Harness::new();
    let requester = ChannelId::new("chat-1");

    h.begin("chat-1").await;
    assert_eq!(h.step("chat-1").await, Some(SessionStep::AwaitingName));

    h.text("chat-1", "Ali").await;
    assert_eq!(h.step("chat-1").await, Some(SessionStep::AwaitingDate));
    // The greeting carries the date picker: 15 days in rows of three
    let greeting = h.transport.sent_to(&requester).last().cloned().unwrap();
    assert!(greeting.text.contains("Ali"));
    let picker = greeting.actions.expect("date picker attached");
    assert_eq!(picker.rows.iter().map(Vec::len).sum::<usize>(), 15);
    assert!(picker.rows[0][0].payload.starts_with("date_"));

    h.tap("chat-1", "date_2025.04.02").await;
    assert_eq!(h.step("chat-1").await, Some(SessionStep::AwaitingTime));
    let prompt = h.transport.last_text_to(&requester).unwrap();
    assert!(prompt.contains("none yet"));
    assert_eq!(h.transport.acks.lock().unwrap().len(), 1);

    h.text("chat-1", "10:00 - 11:00").await;
    assert_eq!(h.step("chat-1").await, Some(SessionStep::AwaitingPhone));

    h.text("chat-1", "+1234").await;

    // Exactly one reservation persisted, session destroyed
    let all = h.store.all();
    assert_eq!(all.len(), 1);
    let reservation = &all[0];
    assert_eq!(reservation.name, "Ali");
    assert_eq!(reservation.contact, "+1234");
    assert_eq!(reservation.date, NaiveDate::from_ymd_opt(2025, 4, 2).unwrap());
    assert_eq!(reservation.start.to_string(), "10:00");
    assert_eq!(reservation.end.to_string(), "11:00");
    assert_eq!(reservation.requester, requester);
    assert_eq!(h.step("chat-1").await, None);

    // Requester got a confirmation, operator an alert with a cancel action
    let confirmation = h.transport.last_text_to(&requester).unwrap();
    assert!(confirmation.contains("2025.04.02"));
    assert!(confirmation.contains("10:00 - 11:00"));

    let operator = ChannelId::new(OPERATOR);
    let alert = h.transport.sent_to(&operator).last().cloned().unwrap();
    assert!(alert.text.contains("Ali"));
    assert!(alert.text.contains("+1234"));
    assert!(alert.text.contains(&format!("ID: {}", reservation.id)));
    let keyboard = alert.actions.expect("cancel action attached");
    assert_eq!(keyboard.rows[0][0].payload, format!("cancel_{}", reservation.id));
}

#[tokio::test]
async fn messages_without_session_and_commands_are_ignored() {
    let h = Harness::new();

    h.text("stranger", "hello?").await;
    h.tap("stranger", "date_2025.04.02").await;
    assert_eq!(h.transport.total_sent(), 0);
    assert!(h.transport.acks.lock().unwrap().is_empty());

    h.begin("chat-1").await;
    let before = h.transport.total_sent();
    h.text("chat-1", "/help").await;
    assert_eq!(h.transport.total_sent(), before);
    assert_eq!(h.step("chat-1").await, Some(SessionStep::AwaitingName));
}

#[tokio::test]
async fn begin_discards_in_flight_session() {
    let h = Harness::new();
    h.begin("chat-1").await;
    h.text("chat-1", "Ali").await;
    assert_eq!(h.step("chat-1").await, Some(SessionStep::AwaitingDate));

    h.begin("chat-1").await;
    let session = h.service.active_session(&ChannelId::new("chat-1")).await.unwrap();
    assert_eq!(session.step, SessionStep::AwaitingName);
    assert!(session.name.is_none());
    assert!(session.date.is_none());
}

#[tokio::test]
async fn malformed_or_unavailable_time_reprompts_without_state_change() {
    let h = Harness::new();
    let seeded = h.store.create(candidate("2025-04-02", (10, 0), (12, 0), "other")).await;
    assert!(matches!(seeded, Ok(CreateOutcome::Created(_))));

    h.begin("chat-1").await;
    h.text("chat-1", "Ali").await;
    h.tap("chat-1", "date_2025.04.02").await;
    let prompt = h.transport.last_text_to(&ChannelId::new("chat-1")).unwrap();
    assert!(prompt.contains("10:00 - 12:00"));

    h.text("chat-1", "10 - 12").await;
    assert_eq!(h.step("chat-1").await, Some(SessionStep::AwaitingTime));
    assert!(h
        .transport
        .last_text_to(&ChannelId::new("chat-1"))
        .unwrap()
        .contains("Invalid format"));

    h.text("chat-1", "11:00 - 13:00").await;
    assert_eq!(h.step("chat-1").await, Some(SessionStep::AwaitingTime));

    h.text("chat-1", "08:00 - 09:30").await;
    assert_eq!(h.step("chat-1").await, Some(SessionStep::AwaitingTime));

    // Touching endpoint is fine
    h.text("chat-1", "12:00 - 13:00").await;
    assert_eq!(h.step("chat-1").await, Some(SessionStep::AwaitingPhone));
}

#[tokio::test]
async fn rejected_create_steps_back_to_awaiting_time() {
    let h = Harness::new();
    h.begin("chat-1").await;
    h.text("chat-1", "Ali").await;
    h.tap("chat-1", "date_2025.04.02").await;
    h.text("chat-1", "10:00 - 11:00").await;
    assert_eq!(h.step("chat-1").await, Some(SessionStep::AwaitingPhone));

    // Someone else takes the slot between the pre-check and the create
    let raced = h.store.create(candidate("2025-04-02", (10, 30), (11, 30), "rival")).await;
    assert!(matches!(raced, Ok(CreateOutcome::Created(_))));

    h.text("chat-1", "+1234").await;
    let session = h.service.active_session(&ChannelId::new("chat-1")).await.unwrap();
    assert_eq!(session.step, SessionStep::AwaitingTime);
    assert!(session.start.is_none());
    assert!(session.end.is_none());
    assert_eq!(session.name.as_deref(), Some("Ali"));
    assert!(h
        .transport
        .last_text_to(&ChannelId::new("chat-1"))
        .unwrap()
        .contains("no longer free"));
    assert_eq!(h.store.len(), 1);
}

#[tokio::test]
async fn persistence_failure_keeps_session_and_informs_requester() {
    let h = Harness::new();
    h.begin("chat-1").await;
    h.text("chat-1", "Ali").await;
    h.tap("chat-1", "date_2025.04.02").await;
    h.text("chat-1", "10:00 - 11:00").await;

    h.store.fail_writes.store(true, Ordering::SeqCst);
    let result = h
        .service
        .handle_event(InboundEvent::Text {
            identity: ChannelId::new("chat-1"),
            text: "+1234".to_string(),
        })
        .await;
    assert!(result.is_err(), "write failure must propagate");

    assert_eq!(h.step("chat-1").await, Some(SessionStep::AwaitingPhone));
    assert_eq!(h.store.len(), 0);
    assert!(h
        .transport
        .last_text_to(&ChannelId::new("chat-1"))
        .unwrap()
        .contains("could not be saved"));
}

#[tokio::test]
async fn cancel_flow_notifies_operator_and_requester() {
    let h = Harness::new();
    let created = h.store.create(candidate("2025-04-02", (10, 0), (11, 0), "chat-9")).await;
    let reservation = match created {
        Ok(CreateOutcome::Created(r)) => r,
        other => panic!("unexpected create result: {other:?}"),
    };

    h.tap(OPERATOR, &format!("cancel_{}", reservation.id)).await;

    assert_eq!(h.store.len(), 0);

    let edits = h.transport.edits.lock().unwrap().clone();
    assert_eq!(edits.len(), 1);
    assert!(edits[0].1.contains("Cancelled"));
    assert!(edits[0].1.contains(&format!("ID: {}", reservation.id)));

    let acks = h.transport.acks.lock().unwrap().clone();
    assert_eq!(acks.last().unwrap().1.as_deref(), Some("Reservation cancelled."));

    let notice = h.transport.last_text_to(&ChannelId::new("chat-9")).unwrap();
    assert!(notice.contains("2025.04.02"));
    assert!(notice.contains("has been cancelled"));
}

#[tokio::test]
async fn second_cancel_for_same_id_reports_void() {
    let h = Harness::new();
    let reservation = match h
        .store
        .create(candidate("2025-04-02", (10, 0), (11, 0), "chat-9"))
        .await
        .unwrap()
    {
        CreateOutcome::Created(r) => r,
        CreateOutcome::Rejected(reason) => panic!("seed rejected: {reason}"),
    };

    h.tap(OPERATOR, &format!("cancel_{}", reservation.id)).await;
    let sent_after_first = h.transport.total_sent();
    let edits_after_first = h.transport.edits.lock().unwrap().len();

    h.tap(OPERATOR, &format!("cancel_{}", reservation.id)).await;

    let acks = h.transport.acks.lock().unwrap().clone();
    assert_eq!(
        acks.last().unwrap().1.as_deref(),
        Some("Reservation not found or already cancelled.")
    );
    // No further notification or edit on the stale cancel
    assert_eq!(h.transport.total_sent(), sent_after_first);
    assert_eq!(h.transport.edits.lock().unwrap().len(), edits_after_first);
}
