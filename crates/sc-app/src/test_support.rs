//! Hand-written port fakes shared by the use case tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use sc_core::network::InboundMessage;
use sc_core::ports::{
    AnalysisError, ClipboardError, ClipboardReading, ClockPort, ContentAnalyzerPort, DialOutcome,
    KeyValueStorePort, NetworkPort, NotifierPort, StorageError, SystemClipboardPort,
};
use sc_core::{
    AnalysisResult, Clip, ClipId, ClipKind, ConnectedPeer, NetworkEvent, Notice, PeerMessage,
};
use tokio::sync::mpsc;

use crate::deps::AppDeps;
use crate::history_store::HistoryStore;

pub fn remote_clip(id: &str, content: &str) -> Clip {
    Clip {
        id: ClipId::from(id),
        content: content.to_string(),
        kind: ClipKind::Text,
        timestamp: 1_000,
        device_id: "peer1".to_string(),
        device_name: "Pixel".to_string(),
        summary: None,
        tags: Vec::new(),
        is_favorite: false,
        expires_at: None,
    }
}

pub fn connected_peer(peer_id: &str, inbound: bool) -> ConnectedPeer {
    ConnectedPeer {
        peer_id: peer_id.to_string(),
        address: "/ip4/192.168.1.20/tcp/4001".to_string(),
        connected_at: Utc::now(),
        inbound,
    }
}

/// Polls `check` until it holds, failing the test after about two seconds.
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    quota: Option<u64>,
    read_failure: Option<ReadFailure>,
    writes: AtomicUsize,
}

#[derive(Clone, Copy)]
enum ReadFailure {
    Io,
    Corrupt,
}

impl MemoryStore {
    pub fn with_quota(quota: u64) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn failing_reads() -> Self {
        Self {
            read_failure: Some(ReadFailure::Io),
            ..Self::default()
        }
    }

    pub fn corrupt_reads() -> Self {
        Self {
            read_failure: Some(ReadFailure::Corrupt),
            ..Self::default()
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStorePort for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.read_failure {
            Some(ReadFailure::Io) => return Err(StorageError::Io("disk unavailable".to_string())),
            Some(ReadFailure::Corrupt) => {
                return Err(StorageError::Corrupt("unreadable store file".to_string()))
            }
            None => {}
        }
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota {
            let required = (key.len() + value.len()) as u64;
            if required > limit {
                return Err(StorageError::QuotaExceeded { required, limit });
            }
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl NotifierPort for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

pub struct FixedClock {
    now_ms: AtomicI64,
}

impl FixedClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn advance(&self, ms: i64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

pub struct StubAnalyzer {
    result: Option<AnalysisResult>,
    calls: Mutex<Vec<(String, ClipKind)>>,
}

impl StubAnalyzer {
    pub fn returning(result: AnalysisResult) -> Self {
        Self {
            result: Some(result),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, ClipKind)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentAnalyzerPort for StubAnalyzer {
    async fn analyze(
        &self,
        content: &str,
        input_kind: ClipKind,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.calls
            .lock()
            .unwrap()
            .push((content.to_string(), input_kind));
        self.result
            .clone()
            .ok_or_else(|| AnalysisError::Transport("connection refused".to_string()))
    }
}

pub struct RecordingNetwork {
    local_peer_id: Option<String>,
    dial_outcome: Mutex<DialOutcome>,
    fail_broadcast: AtomicBool,
    broadcasts: Mutex<Vec<PeerMessage>>,
    dials: Mutex<Vec<String>>,
    peers: Mutex<Vec<ConnectedPeer>>,
    message_tx: Mutex<Option<mpsc::Sender<InboundMessage>>>,
    event_tx: Mutex<Option<mpsc::Sender<NetworkEvent>>>,
}

impl RecordingNetwork {
    pub fn new(local_peer_id: Option<&str>) -> Self {
        Self {
            local_peer_id: local_peer_id.map(str::to_string),
            dial_outcome: Mutex::new(DialOutcome::Dialing),
            fail_broadcast: AtomicBool::new(false),
            broadcasts: Mutex::new(Vec::new()),
            dials: Mutex::new(Vec::new()),
            peers: Mutex::new(Vec::new()),
            message_tx: Mutex::new(None),
            event_tx: Mutex::new(None),
        }
    }

    pub fn set_dial_outcome(&self, outcome: DialOutcome) {
        *self.dial_outcome.lock().unwrap() = outcome;
    }

    pub fn set_peers(&self, peers: Vec<ConnectedPeer>) {
        *self.peers.lock().unwrap() = peers;
    }

    pub fn fail_broadcasts(&self) {
        self.fail_broadcast.store(true, Ordering::SeqCst);
    }

    pub fn broadcasts(&self) -> Vec<PeerMessage> {
        self.broadcasts.lock().unwrap().clone()
    }

    pub fn dials(&self) -> Vec<String> {
        self.dials.lock().unwrap().clone()
    }

    pub async fn inject_message(&self, message: InboundMessage) {
        let tx = self.message_tx.lock().unwrap().clone();
        tx.expect("messages subscribed").send(message).await.unwrap();
    }

    pub async fn inject_event(&self, event: NetworkEvent) {
        let tx = self.event_tx.lock().unwrap().clone();
        tx.expect("events subscribed").send(event).await.unwrap();
    }
}

#[async_trait]
impl NetworkPort for RecordingNetwork {
    async fn start(&self) -> Result<()> {
        Ok(())
    }

    fn local_peer_id(&self) -> Option<String> {
        self.local_peer_id.clone()
    }

    async fn share_links(&self) -> Vec<String> {
        match &self.local_peer_id {
            Some(id) => vec![format!("/ip4/127.0.0.1/tcp/4001/p2p/{id}")],
            None => Vec::new(),
        }
    }

    async fn dial(&self, target: &str) -> Result<DialOutcome> {
        self.dials.lock().unwrap().push(target.to_string());
        Ok(self.dial_outcome.lock().unwrap().clone())
    }

    async fn broadcast(&self, message: PeerMessage) -> Result<usize> {
        if self.fail_broadcast.load(Ordering::SeqCst) {
            return Err(anyhow!("network task stopped"));
        }
        self.broadcasts.lock().unwrap().push(message);
        Ok(self.peers.lock().unwrap().len())
    }

    async fn connected_peers(&self) -> Vec<ConnectedPeer> {
        self.peers.lock().unwrap().clone()
    }

    async fn subscribe_messages(&self) -> Result<mpsc::Receiver<InboundMessage>> {
        let (tx, rx) = mpsc::channel(16);
        *self.message_tx.lock().unwrap() = Some(tx);
        Ok(rx)
    }

    async fn subscribe_events(&self) -> Result<mpsc::Receiver<NetworkEvent>> {
        let (tx, rx) = mpsc::channel(16);
        *self.event_tx.lock().unwrap() = Some(tx);
        Ok(rx)
    }
}

pub enum ClipboardBehaviour {
    Holding(ClipboardReading),
    Denied,
}

pub struct FakeClipboard {
    behaviour: Mutex<ClipboardBehaviour>,
    texts: Mutex<Vec<String>>,
    images: Mutex<Vec<(String, Vec<u8>)>>,
}

impl FakeClipboard {
    pub fn holding(reading: ClipboardReading) -> Self {
        Self::with_behaviour(ClipboardBehaviour::Holding(reading))
    }

    pub fn denied() -> Self {
        Self::with_behaviour(ClipboardBehaviour::Denied)
    }

    fn with_behaviour(behaviour: ClipboardBehaviour) -> Self {
        Self {
            behaviour: Mutex::new(behaviour),
            texts: Mutex::new(Vec::new()),
            images: Mutex::new(Vec::new()),
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }

    pub fn images(&self) -> Vec<(String, Vec<u8>)> {
        self.images.lock().unwrap().clone()
    }
}

impl SystemClipboardPort for FakeClipboard {
    fn read(&self) -> Result<ClipboardReading, ClipboardError> {
        match &*self.behaviour.lock().unwrap() {
            ClipboardBehaviour::Holding(reading) => Ok(reading.clone()),
            ClipboardBehaviour::Denied => {
                Err(ClipboardError::AccessDenied("not allowed".to_string()))
            }
        }
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if matches!(&*self.behaviour.lock().unwrap(), ClipboardBehaviour::Denied) {
            return Err(ClipboardError::AccessDenied("not allowed".to_string()));
        }
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn write_image(&self, mime: &str, bytes: &[u8]) -> Result<(), ClipboardError> {
        self.images
            .lock()
            .unwrap()
            .push((mime.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Fakes wired together, with handles kept for assertions.
pub struct Harness {
    pub storage: Arc<MemoryStore>,
    pub analyzer: Arc<StubAnalyzer>,
    pub network: Arc<RecordingNetwork>,
    pub clipboard: Arc<FakeClipboard>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<FixedClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(MemoryStore::default()),
            analyzer: Arc::new(StubAnalyzer::returning(AnalysisResult {
                kind: ClipKind::Code,
                summary: "Rust snippet".to_string(),
                tags: vec!["rust".to_string()],
            })),
            network: Arc::new(RecordingNetwork::new(Some("12D3KooWLocalPeerAbCdE"))),
            clipboard: Arc::new(FakeClipboard::holding(ClipboardReading::Empty)),
            notifier: Arc::new(RecordingNotifier::default()),
            clock: Arc::new(FixedClock::new(1_700_000_000_000)),
        }
    }

    pub fn history(&self) -> Arc<HistoryStore> {
        Arc::new(HistoryStore::new(
            self.storage.clone(),
            self.notifier.clone(),
            1000,
        ))
    }

    pub fn deps(&self) -> AppDeps {
        AppDeps {
            storage: self.storage.clone(),
            analyzer: self.analyzer.clone(),
            network: self.network.clone(),
            clipboard: self.clipboard.clone(),
            notifier: self.notifier.clone(),
            clock: self.clock.clone(),
        }
    }
}
