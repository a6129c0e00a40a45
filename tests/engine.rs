//! End-to-end engine behavior against mock transport and registrar ports.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use streamvisor::{
    topics, ChannelConfig, ChatClient, DispatchError, Engine, EngineBuilder, EngineConfig,
    FeatureContext, FeatureHandler, LogLevel, Notification, Registrar, SubscriptionDescriptor,
    SubscriptionError, SubscriptionHandle, SubscriptionRequest, Topic, Transport, TransportError,
    TransportSink,
};

/// Transport double: records calls and lets tests fire callbacks by hand.
#[derive(Default)]
struct MockTransport {
    sink: Mutex<Option<TransportSink>>,
    reported_session: Mutex<Option<Arc<str>>>,
    opens: AtomicUsize,
    closes: AtomicUsize,
    reopens: AtomicUsize,
}

impl MockTransport {
    fn sink(&self) -> TransportSink {
        self.sink
            .lock()
            .unwrap()
            .clone()
            .expect("transport was never bound")
    }

    fn fire_connected(&self, session_id: &str, is_reconnect: bool) {
        self.sink().connected(session_id, is_reconnect);
    }

    fn fire_disconnected(&self) {
        self.sink().disconnected();
    }

    fn fire_notify(&self, topic: &str, payload: serde_json::Value) {
        self.sink().notify(Topic::from(topic), payload);
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn bind(&self, sink: TransportSink) {
        *self.sink.lock().unwrap() = Some(sink);
    }

    async fn open(&self) -> Result<(), TransportError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn reopen(&self) -> Result<(), TransportError> {
        self.reopens.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn session_id(&self) -> Option<Arc<str>> {
        self.reported_session.lock().unwrap().clone()
    }
}

/// Registrar double: records every create call.
#[derive(Default)]
struct MockRegistrar {
    requests: Mutex<Vec<SubscriptionRequest>>,
}

impl MockRegistrar {
    fn topics_requested(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.topic.to_string())
            .collect()
    }
}

#[async_trait]
impl Registrar for MockRegistrar {
    async fn create_subscription(
        &self,
        req: SubscriptionRequest,
    ) -> Result<SubscriptionHandle, SubscriptionError> {
        let topic = req.topic.clone();
        self.requests.lock().unwrap().push(req);
        Ok(SubscriptionHandle {
            id: "sub-1".into(),
            topic,
        })
    }
}

/// Minimal handler: one topic, records arrivals, optionally panics.
struct Probe {
    name: &'static str,
    topic: &'static str,
    seen: Arc<Mutex<Vec<String>>>,
    panic_on_delivery: bool,
}

impl Probe {
    fn new(name: &'static str, topic: &'static str, seen: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name,
            topic,
            seen,
            panic_on_delivery: false,
        }
    }
}

impl FeatureHandler for Probe {
    fn name(&self) -> &'static str {
        self.name
    }

    fn topics(&self) -> Vec<Topic> {
        vec![Topic::from(self.topic)]
    }

    fn subscriptions(&self, _session_id: &str) -> Vec<SubscriptionDescriptor> {
        vec![SubscriptionDescriptor::new(self.topic, "2", self.name)
            .with_condition("broadcaster_user_id", "100")
            .with_condition("moderator_user_id", "100")]
    }

    fn on_notification(&mut self, n: &Notification) -> Result<(), DispatchError> {
        self.seen
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, n.payload["i"]));
        if self.panic_on_delivery {
            panic!("probe asked to fail");
        }
        Ok(())
    }
}

fn engine_with(
    transport: Arc<MockTransport>,
    registrar: Arc<MockRegistrar>,
) -> Engine {
    let cfg = EngineConfig {
        channel: ChannelConfig {
            channel_id: "100".into(),
            channel_name: "testchannel".into(),
            client_id: "client".into(),
            access_token: "token".into(),
        },
        drain_batch: 64,
        log_level: LogLevel::None,
    };
    EngineBuilder::new(cfg)
        .with_transport(transport)
        .with_registrar(registrar)
        .build()
        .expect("engine should build")
}

/// Lets spawned gateway tasks run, then drains their completions.
async fn settle(engine: &mut Engine) {
    tokio::time::sleep(Duration::from_millis(25)).await;
    engine.tick();
}

#[tokio::test]
async fn test_notifications_fan_out_in_arrival_order() {
    let transport = Arc::new(MockTransport::default());
    let registrar = Arc::new(MockRegistrar::default());
    let mut engine = engine_with(Arc::clone(&transport), registrar);

    let seen = Arc::new(Mutex::new(Vec::new()));
    engine.register(Box::new(Probe::new("a", topics::CHANNEL_FOLLOW, Arc::clone(&seen))));
    engine.register(Box::new(Probe::new("b", topics::CHANNEL_FOLLOW, Arc::clone(&seen))));
    engine.register(Box::new(Probe::new("c", topics::CHANNEL_CHEER, Arc::clone(&seen))));

    transport.fire_connected("sess-1", false);
    for i in 0..3 {
        transport.fire_notify(topics::CHANNEL_FOLLOW, json!({ "i": i }));
    }
    engine.tick();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec!["a:0", "b:0", "a:1", "b:1", "a:2", "b:2"],
        "each notification reaches interested handlers in registration order"
    );
}

#[tokio::test]
async fn test_identical_declarations_collapse_to_one_create() {
    let transport = Arc::new(MockTransport::default());
    let registrar = Arc::new(MockRegistrar::default());
    let mut engine = engine_with(Arc::clone(&transport), Arc::clone(&registrar));

    let seen = Arc::new(Mutex::new(Vec::new()));
    // Same (topic, version, condition) tuple from two different owners.
    engine.register(Box::new(Probe::new("first", topics::CHANNEL_MODERATE, Arc::clone(&seen))));
    engine.register(Box::new(Probe::new("second", topics::CHANNEL_MODERATE, Arc::clone(&seen))));

    transport.fire_connected("sess-1", false);
    engine.tick();
    settle(&mut engine).await;

    assert_eq!(registrar.topics_requested(), vec![topics::CHANNEL_MODERATE]);
    {
        let requests = registrar.requests.lock().unwrap();
        assert_eq!(requests[0].version, "2");
        assert_eq!(requests[0].condition["broadcaster_user_id"], "100");
        assert_eq!(requests[0].condition["moderator_user_id"], "100");
    }

    // Both handlers still receive the shared topic.
    transport.fire_notify(topics::CHANNEL_MODERATE, json!({ "i": 0 }));
    engine.tick();
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_reconnect_skips_but_fresh_session_redeclares() {
    let transport = Arc::new(MockTransport::default());
    let registrar = Arc::new(MockRegistrar::default());
    let mut engine = engine_with(Arc::clone(&transport), Arc::clone(&registrar));

    let seen = Arc::new(Mutex::new(Vec::new()));
    engine.register(Box::new(Probe::new("follows", topics::CHANNEL_FOLLOW, seen)));

    transport.fire_connected("sess-1", false);
    engine.tick();
    settle(&mut engine).await;
    assert_eq!(registrar.requests.lock().unwrap().len(), 1);

    // Same logical session on a new physical connection: nothing re-created.
    transport.fire_connected("sess-1", true);
    engine.tick();
    settle(&mut engine).await;
    assert_eq!(registrar.requests.lock().unwrap().len(), 1);

    // Fresh session: dedupe state is gone, everything is re-declared.
    transport.fire_connected("sess-2", false);
    engine.tick();
    settle(&mut engine).await;
    assert_eq!(registrar.requests.lock().unwrap().len(), 2);
    assert_eq!(
        registrar.requests.lock().unwrap()[1].session_id.as_ref(),
        "sess-2"
    );
}

#[tokio::test]
async fn test_panicking_handler_does_not_stall_the_queue() {
    let transport = Arc::new(MockTransport::default());
    let registrar = Arc::new(MockRegistrar::default());
    let mut engine = engine_with(Arc::clone(&transport), registrar);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut bad = Probe::new("bad", topics::CHANNEL_FOLLOW, Arc::clone(&seen));
    bad.panic_on_delivery = true;
    engine.register(Box::new(bad));
    engine.register(Box::new(Probe::new("good", topics::CHANNEL_FOLLOW, Arc::clone(&seen))));

    transport.fire_connected("sess-1", false);
    transport.fire_notify(topics::CHANNEL_FOLLOW, json!({ "i": 0 }));
    transport.fire_notify(topics::CHANNEL_FOLLOW, json!({ "i": 1 }));
    engine.tick();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen, vec!["bad:0", "good:0", "bad:1", "good:1"]);
}

#[tokio::test]
async fn test_requested_disconnect_suppresses_reconnect() {
    let transport = Arc::new(MockTransport::default());
    let registrar = Arc::new(MockRegistrar::default());
    let mut engine = engine_with(Arc::clone(&transport), registrar);

    transport.fire_connected("sess-1", false);
    engine.tick();

    engine.disconnect();
    settle(&mut engine).await;
    assert_eq!(transport.closes.load(Ordering::SeqCst), 1);

    transport.fire_disconnected();
    engine.tick();
    settle(&mut engine).await;

    assert!(engine.session().is_none());
    assert_eq!(transport.reopens.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unexpected_disconnect_triggers_reconnect() {
    let transport = Arc::new(MockTransport::default());
    let registrar = Arc::new(MockRegistrar::default());
    let mut engine = engine_with(Arc::clone(&transport), registrar);

    transport.fire_connected("sess-1", false);
    engine.tick();

    transport.fire_disconnected();
    engine.tick();
    settle(&mut engine).await;

    assert_eq!(transport.reopens.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_manual_flag_clears_on_next_connect() {
    let transport = Arc::new(MockTransport::default());
    let registrar = Arc::new(MockRegistrar::default());
    let mut engine = engine_with(Arc::clone(&transport), registrar);

    transport.fire_connected("sess-1", false);
    engine.tick();
    engine.disconnect();
    transport.fire_disconnected();
    engine.tick();
    settle(&mut engine).await;
    assert_eq!(transport.reopens.load(Ordering::SeqCst), 0);

    // Connecting again clears the flag; the next drop self-heals.
    transport.fire_connected("sess-2", false);
    engine.tick();
    transport.fire_disconnected();
    engine.tick();
    settle(&mut engine).await;
    assert_eq!(transport.reopens.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_hot_registration_declares_immediately() {
    let transport = Arc::new(MockTransport::default());
    let registrar = Arc::new(MockRegistrar::default());
    let mut engine = engine_with(Arc::clone(&transport), Arc::clone(&registrar));

    transport.fire_connected("sess-1", false);
    engine.tick();

    let seen = Arc::new(Mutex::new(Vec::new()));
    engine.register(Box::new(Probe::new("late", topics::CHANNEL_CHEER, seen)));
    settle(&mut engine).await;

    assert_eq!(registrar.topics_requested(), vec![topics::CHANNEL_CHEER]);
}

#[tokio::test]
async fn test_connect_requires_channel_identity() {
    let transport = Arc::new(MockTransport::default());
    let registrar = Arc::new(MockRegistrar::default());
    let engine = EngineBuilder::new(EngineConfig::default())
        .with_transport(Arc::clone(&transport) as Arc<dyn Transport>)
        .with_registrar(registrar)
        .build()
        .expect("engine should build");

    assert!(engine.connect().is_err());
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(transport.opens.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_session_id_falls_back_to_transport() {
    let transport = Arc::new(MockTransport::default());
    let registrar = Arc::new(MockRegistrar::default());
    let mut engine = engine_with(Arc::clone(&transport), registrar);

    // Nothing recorded yet anywhere.
    assert!(engine.session_id().is_none());

    // The transport already knows its session even though no connect
    // callback has been recorded.
    *transport.reported_session.lock().unwrap() = Some(Arc::from("sess-pre"));
    assert_eq!(engine.session_id().as_deref(), Some("sess-pre"));

    // The id recorded by the connect callback wins over the fallback.
    transport.fire_connected("sess-1", false);
    assert_eq!(engine.session_id().as_deref(), Some("sess-1"));

    // The sink clears the recorded id on disconnect; the fallback shows
    // whatever the transport still reports.
    engine.tick();
    transport.fire_disconnected();
    *transport.reported_session.lock().unwrap() = None;
    assert!(engine.session_id().is_none());
}

#[tokio::test]
async fn test_connect_opens_transport() {
    let transport = Arc::new(MockTransport::default());
    let registrar = Arc::new(MockRegistrar::default());
    let mut engine = engine_with(Arc::clone(&transport), registrar);

    engine.connect().expect("identity is configured");
    settle(&mut engine).await;
    assert_eq!(transport.opens.load(Ordering::SeqCst), 1);
}

#[test]
fn test_builder_rejects_missing_ports() {
    let err = EngineBuilder::new(EngineConfig::default()).build();
    assert!(err.is_err());

    let transport = Arc::new(MockTransport::default());
    let err = EngineBuilder::new(EngineConfig::default())
        .with_transport(transport)
        .build();
    assert!(err.is_err());
}

#[tokio::test]
async fn test_chat_ready_reaches_handlers_at_registration() {
    struct Chat;
    impl ChatClient for Chat {
        fn send_message(&self, _channel: &str, _text: &str) {}
    }

    struct ChatProbe {
        ready: Arc<Mutex<bool>>,
    }
    impl FeatureHandler for ChatProbe {
        fn name(&self) -> &'static str {
            "chat_probe"
        }
        fn topics(&self) -> Vec<Topic> {
            vec![]
        }
        fn on_init(&mut self, _ctx: &FeatureContext) {}
        fn on_chat_ready(&mut self, _chat: &Arc<dyn ChatClient>) {
            *self.ready.lock().unwrap() = true;
        }
        fn on_notification(&mut self, _n: &Notification) -> Result<(), DispatchError> {
            Ok(())
        }
    }

    let transport = Arc::new(MockTransport::default());
    let registrar = Arc::new(MockRegistrar::default());
    let cfg = EngineConfig {
        channel: ChannelConfig {
            channel_id: "100".into(),
            ..ChannelConfig::default()
        },
        drain_batch: 64,
        log_level: LogLevel::None,
    };
    let mut engine = EngineBuilder::new(cfg)
        .with_transport(transport)
        .with_registrar(registrar)
        .with_chat(Arc::new(Chat))
        .build()
        .expect("engine should build");

    let ready = Arc::new(Mutex::new(false));
    engine.register(Box::new(ChatProbe {
        ready: Arc::clone(&ready),
    }));
    assert!(*ready.lock().unwrap());
}
