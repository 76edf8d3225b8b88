use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libp2p::{
    futures::StreamExt,
    identity, mdns,
    multiaddr::Protocol,
    noise,
    request_response::{self, ProtocolSupport},
    swarm::{
        dial_opts::{DialOpts, PeerCondition},
        NetworkBehaviour, Swarm, SwarmEvent,
    },
    tcp, yamux, Multiaddr, PeerId, StreamProtocol, SwarmBuilder,
};
use log::{debug, error, info, warn};
use sc_core::config::NetworkConfig;
use sc_core::network::{
    ConnectedPeer, DiscoveredPeer, InboundMessage, MessageAck, NetworkEvent, PeerMessage,
};
use sc_core::ports::{DialOutcome, IdentityStorePort, NetworkPort};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::identity_store::load_or_create_identity;

/// Request-response protocol carrying [`PeerMessage`]s.
pub const CLIP_PROTOCOL: &str = "/syncclip/clip/1";

const CHANNEL_CAPACITY: usize = 64;

const ACK_SIZE_MAXIMUM: u64 = 64 * 1024;

/// Discovery, connection and listen-address state shared between the swarm
/// task and the port methods.
pub struct PeerCaches {
    discovered_peers: HashMap<String, DiscoveredPeer>,
    connected_peers: HashMap<String, ConnectedPeer>,
    listen_links: Vec<String>,
}

impl PeerCaches {
    pub fn new() -> Self {
        Self {
            discovered_peers: HashMap::new(),
            connected_peers: HashMap::new(),
            listen_links: Vec::new(),
        }
    }

    pub fn upsert_discovered(
        &mut self,
        peer_id: String,
        addresses: Vec<String>,
        discovered_at: DateTime<Utc>,
    ) -> DiscoveredPeer {
        let peer = DiscoveredPeer {
            peer_id,
            addresses,
            discovered_at,
        };
        self.discovered_peers
            .insert(peer.peer_id.clone(), peer.clone());
        peer
    }

    pub fn remove_discovered(&mut self, peer_id: &str) -> Option<DiscoveredPeer> {
        self.discovered_peers.remove(peer_id)
    }

    pub fn is_discovered(&self, peer_id: &str) -> bool {
        self.discovered_peers.contains_key(peer_id)
    }

    /// Records the first connection to a peer; later ones are ignored.
    pub fn insert_connected(&mut self, peer: ConnectedPeer) -> bool {
        if self.connected_peers.contains_key(&peer.peer_id) {
            return false;
        }
        self.connected_peers.insert(peer.peer_id.clone(), peer);
        true
    }

    pub fn remove_connected(&mut self, peer_id: &str) -> Option<ConnectedPeer> {
        self.connected_peers.remove(peer_id)
    }

    /// Connected peers, oldest connection first.
    pub fn connected(&self) -> Vec<ConnectedPeer> {
        let mut peers: Vec<ConnectedPeer> = self.connected_peers.values().cloned().collect();
        peers.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.peer_id.cmp(&b.peer_id))
        });
        peers
    }

    pub fn has_connections(&self) -> bool {
        !self.connected_peers.is_empty()
    }

    pub fn add_listen_link(&mut self, link: String) -> bool {
        if self.listen_links.contains(&link) {
            return false;
        }
        self.listen_links.push(link);
        true
    }

    pub fn remove_listen_link(&mut self, link: &str) {
        self.listen_links.retain(|existing| existing != link);
    }

    pub fn listen_links(&self) -> &[String] {
        &self.listen_links
    }
}

impl Default for PeerCaches {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(NetworkBehaviour)]
struct SyncBehaviour {
    mdns: mdns::tokio::Behaviour,
    messaging: request_response::json::Behaviour<PeerMessage, MessageAck>,
}

impl SyncBehaviour {
    fn new(
        local_peer_id: PeerId,
        request_timeout: Duration,
        max_message_bytes: u64,
    ) -> Result<Self> {
        let mdns = mdns::tokio::Behaviour::new(mdns::Config::default(), local_peer_id)
            .map_err(|e| anyhow!("failed to create mdns behaviour: {e}"))?;
        // Image clips travel as base64 data URLs and exceed the codec's 1 MiB default.
        let codec = request_response::json::codec::Codec::<PeerMessage, MessageAck>::default()
            .set_request_size_maximum(max_message_bytes)
            .set_response_size_maximum(ACK_SIZE_MAXIMUM);
        let messaging = request_response::json::Behaviour::with_codec(
            codec,
            [(StreamProtocol::new(CLIP_PROTOCOL), ProtocolSupport::Full)],
            request_response::Config::default().with_request_timeout(request_timeout),
        );
        Ok(Self { mdns, messaging })
    }
}

/// What a dial request resolved to before reaching the swarm.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DialTarget {
    /// The request names this node.
    Local,
    /// A full address, optionally ending in `/p2p/<peer id>`.
    Address {
        address: Multiaddr,
        peer_id: Option<PeerId>,
    },
    /// A bare peer id, dialed through addresses learned from discovery.
    Peer(PeerId),
}

fn parse_dial_target(target: &str, local_peer_id: &PeerId) -> Result<DialTarget> {
    let target = target.trim();
    if target.is_empty() {
        bail!("dial target is empty");
    }

    if let Ok(peer_id) = target.parse::<PeerId>() {
        if peer_id == *local_peer_id {
            return Ok(DialTarget::Local);
        }
        return Ok(DialTarget::Peer(peer_id));
    }

    let address: Multiaddr = target
        .parse()
        .with_context(|| format!("'{target}' is neither a peer id nor a multiaddr"))?;
    let peer_id = address.iter().find_map(|protocol| match protocol {
        Protocol::P2p(peer_id) => Some(peer_id),
        _ => None,
    });

    if peer_id.as_ref() == Some(local_peer_id) {
        return Ok(DialTarget::Local);
    }
    Ok(DialTarget::Address { address, peer_id })
}

/// Dialable link for a listen address: `<address>/p2p/<peer id>`.
fn share_link(address: &Multiaddr, local_peer_id: PeerId) -> String {
    address.clone().with(Protocol::P2p(local_peer_id)).to_string()
}

enum SwarmCommand {
    Dial {
        target: DialTarget,
        reply: oneshot::Sender<Result<DialOutcome>>,
    },
    Broadcast {
        message: PeerMessage,
        reply: oneshot::Sender<usize>,
    },
}

/// Taken once by [`NetworkPort::start`].
struct PendingSwarm {
    keypair: identity::Keypair,
    commands: mpsc::Receiver<SwarmCommand>,
}

/// [`NetworkPort`] over libp2p: TCP with noise and yamux, mDNS discovery and
/// a JSON request-response protocol for clip messages.
pub struct Libp2pNetworkAdapter {
    local_peer_id: PeerId,
    listen_addr: Multiaddr,
    auto_connect_discovered: bool,
    request_timeout: Duration,
    idle_connection_timeout: Duration,
    max_message_bytes: u64,
    caches: Arc<RwLock<PeerCaches>>,
    started: AtomicBool,
    command_tx: mpsc::Sender<SwarmCommand>,
    pending: Mutex<Option<PendingSwarm>>,
    event_tx: mpsc::Sender<NetworkEvent>,
    event_rx: Mutex<Option<mpsc::Receiver<NetworkEvent>>>,
    message_tx: mpsc::Sender<InboundMessage>,
    message_rx: Mutex<Option<mpsc::Receiver<InboundMessage>>>,
}

impl Libp2pNetworkAdapter {
    pub fn new(identity_store: Arc<dyn IdentityStorePort>, config: &NetworkConfig) -> Result<Self> {
        let keypair = load_or_create_identity(identity_store.as_ref())
            .map_err(|e| anyhow!("failed to load libp2p identity: {e}"))?;
        let local_peer_id = PeerId::from(keypair.public());
        let listen_addr: Multiaddr = config
            .listen_addr
            .parse()
            .with_context(|| format!("invalid listen address '{}'", config.listen_addr))?;

        let (command_tx, commands) = mpsc::channel(CHANNEL_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (message_tx, message_rx) = mpsc::channel(CHANNEL_CAPACITY);

        Ok(Self {
            local_peer_id,
            listen_addr,
            auto_connect_discovered: config.auto_connect_discovered,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            idle_connection_timeout: Duration::from_secs(config.idle_connection_timeout_secs),
            max_message_bytes: config.max_message_bytes,
            caches: Arc::new(RwLock::new(PeerCaches::new())),
            started: AtomicBool::new(false),
            command_tx,
            pending: Mutex::new(Some(PendingSwarm { keypair, commands })),
            event_tx,
            event_rx: Mutex::new(Some(event_rx)),
            message_tx,
            message_rx: Mutex::new(Some(message_rx)),
        })
    }

    fn spawn_swarm(&self) -> Result<()> {
        let PendingSwarm { keypair, commands } = self.take_pending()?;
        let behaviour = SyncBehaviour::new(
            self.local_peer_id,
            self.request_timeout,
            self.max_message_bytes,
        )?;
        let idle_timeout = self.idle_connection_timeout;

        let mut swarm = SwarmBuilder::with_existing_identity(keypair)
            .with_tokio()
            .with_tcp(
                tcp::Config::default().nodelay(true),
                noise::Config::new,
                yamux::Config::default,
            )
            .map_err(|e| anyhow!("failed to configure tcp transport: {e}"))?
            .with_behaviour(move |_| behaviour)
            .map_err(|e| anyhow!("failed to attach sync behaviour: {e}"))?
            .with_swarm_config(|cfg| cfg.with_idle_connection_timeout(idle_timeout))
            .build();

        if let Err(e) = swarm.listen_on(self.listen_addr.clone()) {
            let message = format!("failed to listen on {}: {e}", self.listen_addr);
            warn!("{message}");
            if let Err(err) = self.event_tx.try_send(NetworkEvent::Error(message)) {
                warn!("failed to publish network error event: {err}");
            }
        }

        let driver = SwarmDriver {
            swarm,
            local_peer_id: self.local_peer_id,
            auto_connect_discovered: self.auto_connect_discovered,
            caches: self.caches.clone(),
            event_tx: self.event_tx.clone(),
            message_tx: self.message_tx.clone(),
            commands,
        };
        tokio::spawn(driver.run());
        self.started.store(true, Ordering::SeqCst);

        Ok(())
    }

    fn take_pending(&self) -> Result<PendingSwarm> {
        let mut guard = self
            .pending
            .lock()
            .map_err(|_| anyhow!("swarm state mutex poisoned"))?;
        guard.take().ok_or_else(|| anyhow!("swarm already started"))
    }

    fn take_receiver<T>(
        mutex: &Mutex<Option<mpsc::Receiver<T>>>,
        name: &str,
    ) -> Result<mpsc::Receiver<T>> {
        let mut guard = mutex
            .lock()
            .map_err(|_| anyhow!("{name} receiver mutex poisoned"))?;
        guard
            .take()
            .ok_or_else(|| anyhow!("{name} receiver already taken"))
    }
}

#[async_trait]
impl NetworkPort for Libp2pNetworkAdapter {
    async fn start(&self) -> Result<()> {
        self.spawn_swarm()
    }

    fn local_peer_id(&self) -> Option<String> {
        Some(self.local_peer_id.to_string())
    }

    async fn share_links(&self) -> Vec<String> {
        self.caches.read().await.listen_links().to_vec()
    }

    async fn dial(&self, target: &str) -> Result<DialOutcome> {
        let target = parse_dial_target(target, &self.local_peer_id)?;
        if target == DialTarget::Local {
            debug!("ignoring dial request for the local peer");
            return Ok(DialOutcome::SelfDial);
        }
        if !self.started.load(Ordering::SeqCst) {
            bail!("network has not been started");
        }

        let (reply, outcome) = oneshot::channel();
        self.command_tx
            .send(SwarmCommand::Dial { target, reply })
            .await
            .map_err(|_| anyhow!("network task is not running"))?;
        outcome
            .await
            .map_err(|_| anyhow!("network task stopped before dialing"))?
    }

    async fn broadcast(&self, message: PeerMessage) -> Result<usize> {
        if !self.started.load(Ordering::SeqCst) || !self.caches.read().await.has_connections() {
            debug!("no connected peers, {} not sent", message.kind());
            return Ok(0);
        }

        let (reply, delivered) = oneshot::channel();
        self.command_tx
            .send(SwarmCommand::Broadcast { message, reply })
            .await
            .map_err(|_| anyhow!("network task is not running"))?;
        delivered
            .await
            .map_err(|_| anyhow!("network task stopped before broadcasting"))
    }

    async fn connected_peers(&self) -> Vec<ConnectedPeer> {
        self.caches.read().await.connected()
    }

    async fn subscribe_messages(&self) -> Result<mpsc::Receiver<InboundMessage>> {
        Self::take_receiver(&self.message_rx, "peer message")
    }

    async fn subscribe_events(&self) -> Result<mpsc::Receiver<NetworkEvent>> {
        Self::take_receiver(&self.event_rx, "network event")
    }
}

/// Owns the swarm and serves port commands until the adapter is dropped.
struct SwarmDriver {
    swarm: Swarm<SyncBehaviour>,
    local_peer_id: PeerId,
    auto_connect_discovered: bool,
    caches: Arc<RwLock<PeerCaches>>,
    event_tx: mpsc::Sender<NetworkEvent>,
    message_tx: mpsc::Sender<InboundMessage>,
    commands: mpsc::Receiver<SwarmCommand>,
}

impl SwarmDriver {
    async fn run(mut self) {
        info!("libp2p swarm started as {}", self.local_peer_id);

        loop {
            tokio::select! {
                event = self.swarm.select_next_some() => self.handle_swarm_event(event).await,
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
            }
        }

        info!("libp2p swarm stopped");
    }

    async fn handle_command(&mut self, command: SwarmCommand) {
        match command {
            SwarmCommand::Dial { target, reply } => {
                let outcome = self.dial(target).await;
                if reply.send(outcome).is_err() {
                    debug!("dial requester went away");
                }
            }
            SwarmCommand::Broadcast { message, reply } => {
                let delivered = self.broadcast(message);
                if reply.send(delivered).is_err() {
                    debug!("broadcast requester went away");
                }
            }
        }
    }

    async fn dial(&mut self, target: DialTarget) -> Result<DialOutcome> {
        match target {
            DialTarget::Local => Ok(DialOutcome::SelfDial),
            DialTarget::Address { address, peer_id } => {
                if peer_id.is_some_and(|peer_id| self.swarm.is_connected(&peer_id)) {
                    return Ok(DialOutcome::AlreadyConnected);
                }
                info!("dialing {address}");
                self.swarm
                    .dial(address.clone())
                    .map_err(|e| anyhow!("failed to dial {address}: {e}"))?;
                Ok(DialOutcome::Dialing)
            }
            DialTarget::Peer(peer_id) => {
                if self.swarm.is_connected(&peer_id) {
                    return Ok(DialOutcome::AlreadyConnected);
                }
                if !self.caches.read().await.is_discovered(&peer_id.to_string()) {
                    bail!("peer {peer_id} has not been discovered on the local network");
                }
                info!("dialing discovered peer {peer_id}");
                self.swarm
                    .dial(peer_id)
                    .map_err(|e| anyhow!("failed to dial {peer_id}: {e}"))?;
                Ok(DialOutcome::Dialing)
            }
        }
    }

    fn broadcast(&mut self, message: PeerMessage) -> usize {
        let peers: Vec<PeerId> = self.swarm.connected_peers().copied().collect();
        for peer in &peers {
            self.swarm
                .behaviour_mut()
                .messaging
                .send_request(peer, message.clone());
        }
        debug!(
            "sent {} for clip {} to {} peer(s)",
            message.kind(),
            message.clip_id(),
            peers.len()
        );
        peers.len()
    }

    /// Events are dropped rather than stalling the swarm when nobody drains them.
    fn publish(&self, event: NetworkEvent) {
        if let Err(err) = self.event_tx.try_send(event) {
            warn!("failed to publish network event: {err}");
        }
    }

    async fn handle_swarm_event(&mut self, event: SwarmEvent<SyncBehaviourEvent>) {
        match event {
            SwarmEvent::Behaviour(SyncBehaviourEvent::Mdns(event)) => self.handle_mdns(event).await,
            SwarmEvent::Behaviour(SyncBehaviourEvent::Messaging(event)) => {
                self.handle_messaging(event).await
            }
            SwarmEvent::ConnectionEstablished {
                peer_id,
                endpoint,
                num_established,
                ..
            } => {
                let event = {
                    let mut caches = self.caches.write().await;
                    apply_connection_established(
                        &mut caches,
                        peer_id.to_string(),
                        endpoint.get_remote_address().to_string(),
                        endpoint.is_listener(),
                        num_established.get(),
                        Utc::now(),
                    )
                };
                if let Some(event) = event {
                    info!("connected to {peer_id} via {}", endpoint.get_remote_address());
                    self.publish(event);
                }
            }
            SwarmEvent::ConnectionClosed {
                peer_id,
                num_established,
                cause,
                ..
            } => {
                let event = {
                    let mut caches = self.caches.write().await;
                    apply_connection_closed(&mut caches, &peer_id.to_string(), num_established)
                };
                if let Some(event) = event {
                    info!("disconnected from {peer_id} (cause: {cause:?})");
                    self.publish(event);
                }
            }
            SwarmEvent::OutgoingConnectionError { peer_id, error, .. } => {
                error!("outgoing connection error to {:?}: {}", peer_id, error);
                let target = peer_id
                    .map(|peer_id| peer_id.to_string())
                    .unwrap_or_else(|| "peer".to_string());
                self.publish(NetworkEvent::Error(format!(
                    "connection to {target} failed"
                )));
            }
            SwarmEvent::IncomingConnectionError {
                send_back_addr,
                error,
                ..
            } => {
                warn!(
                    "incoming connection error from {}: {}",
                    send_back_addr, error
                );
            }
            SwarmEvent::NewListenAddr { address, .. } => {
                let link = share_link(&address, self.local_peer_id);
                let added = self.caches.write().await.add_listen_link(link.clone());
                if added {
                    info!("libp2p listening on {address}");
                    self.publish(NetworkEvent::Listening(link));
                }
            }
            SwarmEvent::ExpiredListenAddr { address, .. } => {
                let link = share_link(&address, self.local_peer_id);
                self.caches.write().await.remove_listen_link(&link);
                debug!("listen address expired: {address}");
            }
            _ => {}
        }
    }

    async fn handle_mdns(&mut self, event: mdns::Event) {
        match event {
            mdns::Event::Discovered(peers) => {
                let peers: Vec<(PeerId, Multiaddr)> = peers.into_iter().collect();
                let targets: HashSet<PeerId> = peers.iter().map(|(peer_id, _)| *peer_id).collect();
                let discovered = collect_mdns_discovered(peers);
                let events = {
                    let mut caches = self.caches.write().await;
                    apply_mdns_discovered(&mut caches, discovered, Utc::now())
                };
                for event in events {
                    self.publish(event);
                }

                if self.auto_connect_discovered {
                    for peer_id in targets {
                        self.auto_dial(peer_id);
                    }
                }
            }
            mdns::Event::Expired(peers) => {
                let expired = collect_mdns_expired(peers);
                let events = {
                    let mut caches = self.caches.write().await;
                    apply_mdns_expired(&mut caches, expired)
                };
                for event in events {
                    self.publish(event);
                }
            }
        }
    }

    fn auto_dial(&mut self, peer_id: PeerId) {
        let opts = DialOpts::peer_id(peer_id)
            .condition(PeerCondition::DisconnectedAndNotDialing)
            .build();
        match self.swarm.dial(opts) {
            Ok(()) => debug!("auto-dialing discovered peer {peer_id}"),
            Err(e) => debug!("skipped auto-dial of {peer_id}: {e}"),
        }
    }

    async fn handle_messaging(&mut self, event: request_response::Event<PeerMessage, MessageAck>) {
        match event {
            request_response::Event::Message { peer, message, .. } => match message {
                request_response::Message::Request {
                    request, channel, ..
                } => {
                    debug!("received {} from {peer}", request.kind());
                    let accepted = self
                        .message_tx
                        .send(InboundMessage {
                            from_peer: peer.to_string(),
                            message: request,
                        })
                        .await
                        .is_ok();
                    if !accepted {
                        warn!("no consumer for peer messages, dropping message from {peer}");
                    }
                    if self
                        .swarm
                        .behaviour_mut()
                        .messaging
                        .send_response(channel, MessageAck { accepted })
                        .is_err()
                    {
                        warn!("failed to acknowledge message from {peer}");
                    }
                }
                request_response::Message::Response { response, .. } => {
                    debug!("{peer} acknowledged message (accepted: {})", response.accepted);
                }
            },
            request_response::Event::OutboundFailure { peer, error, .. } => {
                warn!("failed to deliver message to {peer}: {error}");
                self.publish(NetworkEvent::DeliveryFailed {
                    peer_id: peer.to_string(),
                    reason: error.to_string(),
                });
            }
            request_response::Event::InboundFailure { peer, error, .. } => {
                warn!("failed to receive message from {peer}: {error}");
            }
            request_response::Event::ResponseSent { .. } => {}
        }
    }
}

fn collect_mdns_discovered(
    peers: impl IntoIterator<Item = (PeerId, Multiaddr)>,
) -> HashMap<String, Vec<String>> {
    let mut discovered = HashMap::new();
    for (peer_id, addr) in peers {
        discovered
            .entry(peer_id.to_string())
            .or_insert_with(Vec::new)
            .push(addr.to_string());
    }
    discovered
}

fn collect_mdns_expired(peers: impl IntoIterator<Item = (PeerId, Multiaddr)>) -> HashSet<String> {
    peers
        .into_iter()
        .map(|(peer_id, _)| peer_id.to_string())
        .collect()
}

fn apply_mdns_discovered(
    caches: &mut PeerCaches,
    discovered: HashMap<String, Vec<String>>,
    discovered_at: DateTime<Utc>,
) -> Vec<NetworkEvent> {
    discovered
        .into_iter()
        .map(|(peer_id, addresses)| {
            NetworkEvent::PeerDiscovered(caches.upsert_discovered(
                peer_id,
                addresses,
                discovered_at,
            ))
        })
        .collect()
}

fn apply_mdns_expired(caches: &mut PeerCaches, expired: HashSet<String>) -> Vec<NetworkEvent> {
    expired
        .into_iter()
        .filter_map(|peer_id| {
            caches
                .remove_discovered(&peer_id)
                .map(|_| NetworkEvent::PeerLost(peer_id))
        })
        .collect()
}

/// `num_established` counts connections to the peer including this one.
fn apply_connection_established(
    caches: &mut PeerCaches,
    peer_id: String,
    address: String,
    inbound: bool,
    num_established: u32,
    connected_at: DateTime<Utc>,
) -> Option<NetworkEvent> {
    if num_established > 1 {
        return None;
    }
    let peer = ConnectedPeer {
        peer_id,
        address,
        connected_at,
        inbound,
    };
    caches
        .insert_connected(peer.clone())
        .then_some(NetworkEvent::PeerConnected(peer))
}

/// `remaining` counts connections to the peer still open.
fn apply_connection_closed(
    caches: &mut PeerCaches,
    peer_id: &str,
    remaining: u32,
) -> Option<NetworkEvent> {
    if remaining > 0 {
        return None;
    }
    caches
        .remove_connected(peer_id)
        .map(|peer| NetworkEvent::PeerDisconnected(peer.peer_id))
}
