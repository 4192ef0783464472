/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Initiator runner.
//!
//! One tokio task drives one session: inbound bytes are framed by
//! [`FixCodec`] and fed to [`Session::receive`], a read that stays idle for a
//! heartbeat interval becomes a [`Session::keep_alive`] tick, and whatever the
//! session queued in the [`Outbox`] is written back after every step.

use crate::application::Application;
use crate::error::{EngineError, Result};
use crate::outbox::Outbox;
use bytes::BytesMut;
use std::sync::Arc;
use std::time::Duration;
use tidefix_core::MsgType;
use tidefix_core::types::SessionId;
use tidefix_session::{Connection, MessageVisitor, Session, SessionConfig, TimeSource};
use tidefix_store::SessionStore;
use tidefix_tagvalue::Message;
use tidefix_transport::FixCodec;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until, timeout};
use tokio_util::codec::Decoder;
use tracing::{debug, info, warn};

const READ_BUFFER_CAPACITY: usize = 4096;

/// What the session reported during one `receive` call.
#[derive(Debug)]
enum SessionEvent {
    Logon(SessionId),
    Logout(SessionId),
    Application(Message),
}

/// Collects session events so they can be awaited after the sync call.
#[derive(Debug, Default)]
struct EventQueue(Vec<SessionEvent>);

impl MessageVisitor for EventQueue {
    fn visit_application(&mut self, message: &Message) {
        self.0.push(SessionEvent::Application(message.clone()));
    }

    fn on_logon(&mut self, session: &SessionId) {
        self.0.push(SessionEvent::Logon(session.clone()));
    }

    fn on_logout(&mut self, session: &SessionId) {
        self.0.push(SessionEvent::Logout(session.clone()));
    }
}

/// Client side of a FIX session over TCP.
pub struct Initiator<A: Application> {
    application: Arc<A>,
    config: SessionConfig,
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn TimeSource>,
    connect_timeout: Duration,
}

impl<A: Application> std::fmt::Debug for Initiator<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Initiator")
            .field("session", &self.config.session_id())
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

impl<A: Application> Initiator<A> {
    pub(crate) fn new(
        application: Arc<A>,
        config: SessionConfig,
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn TimeSource>,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            application,
            config,
            store,
            clock,
            connect_timeout,
        }
    }

    /// Returns the identity of the session this initiator runs.
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.config.session_id()
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Connects to `addr`, logs on and runs the session until it ends.
    ///
    /// # Errors
    /// - `ConnectTimeout` if the connection is not established in time
    /// - socket, framing, session or store failures
    pub async fn run(&self, addr: impl ToSocketAddrs) -> Result<()> {
        self.run_with(addr, None).await
    }

    /// Like [`run`](Self::run), and also sends every application message
    /// received on `outbound` while the session is up.
    ///
    /// # Errors
    /// As for [`run`](Self::run).
    pub async fn run_with(
        &self,
        addr: impl ToSocketAddrs,
        outbound: Option<mpsc::Receiver<Message>>,
    ) -> Result<()> {
        let stream = timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| EngineError::ConnectTimeout(self.connect_timeout))??;
        stream.set_nodelay(true)?;
        info!(session = %self.config.session_id(), peer = ?stream.peer_addr().ok(), "connected");
        self.run_stream(stream, outbound).await
    }

    /// Runs the session over an already connected stream.
    ///
    /// The store is saved on every exit path.
    ///
    /// # Errors
    /// Socket, framing, session or store failures.
    pub async fn run_stream<S>(
        &self,
        mut stream: S,
        mut outbound: Option<mpsc::Receiver<Message>>,
    ) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut session = Session::new(self.config.clone(), Arc::clone(&self.store), Arc::clone(&self.clock))
            .map_err(EngineError::Fix)?;
        let mut outbox = Outbox::new();
        self.application.on_create(session.session_id()).await;

        let result = self
            .pump(&mut session, &mut outbox, &mut stream, &mut outbound)
            .await;
        if !outbox.is_closed() {
            session.disconnect(&mut outbox)?;
        }
        if let Err(err) = stream.shutdown().await {
            debug!(session = %session.session_id(), error = %err, "shutdown failed");
        }
        match &result {
            Ok(()) => info!(session = %session.session_id(), "session ended"),
            Err(err) => warn!(session = %session.session_id(), error = %err, "session failed"),
        }
        result
    }

    async fn pump<S>(
        &self,
        session: &mut Session,
        outbox: &mut Outbox,
        stream: &mut S,
        outbound: &mut Option<mpsc::Receiver<Message>>,
    ) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut codec = FixCodec::new().with_max_message_size(self.config.max_message_size);
        let mut read_buf = BytesMut::with_capacity(READ_BUFFER_CAPACITY);
        let mut write_buf = BytesMut::new();
        let mut events = EventQueue::default();

        session.logon(outbox)?;
        let mut idle_deadline = Instant::now() + session.heartbeat_interval();
        loop {
            outbox.drain_into(&mut codec, &mut write_buf)?;
            if !write_buf.is_empty() {
                stream.write_all(&write_buf).await?;
                write_buf.clear();
            }
            if outbox.is_closed() {
                return Ok(());
            }

            if let Some(frame) = codec.decode(&mut read_buf)? {
                session.receive(outbox, &frame, &mut events)?;
                self.deliver(session, outbox, &mut events).await?;
                continue;
            }

            tokio::select! {
                () = sleep_until(idle_deadline) => {
                    session.keep_alive(outbox)?;
                    idle_deadline = Instant::now() + session.heartbeat_interval();
                }
                read = stream.read_buf(&mut read_buf) => {
                    match read {
                        Ok(0) => {
                            if let Some(frame) = codec.decode_eof(&mut read_buf)? {
                                session.receive(outbox, &frame, &mut events)?;
                                self.deliver(session, outbox, &mut events).await?;
                            }
                            info!(session = %session.session_id(), "connection closed by peer");
                            return Ok(());
                        }
                        Ok(n) => {
                            debug!(session = %session.session_id(), bytes = n, "read");
                            idle_deadline = Instant::now() + session.heartbeat_interval();
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
                Some(message) = next_outbound(outbound) => {
                    if session.is_logged_on() {
                        session.send(outbox, message)?;
                    } else {
                        warn!(session = %session.session_id(), msg_type = %message.msg_type(), "dropping outbound message while not logged on");
                    }
                }
            }
        }
    }

    async fn deliver(
        &self,
        session: &mut Session,
        outbox: &mut Outbox,
        events: &mut EventQueue,
    ) -> Result<()> {
        for event in events.0.drain(..) {
            match event {
                SessionEvent::Logon(id) => self.application.on_logon(&id).await,
                SessionEvent::Logout(id) => self.application.on_logout(&id).await,
                SessionEvent::Application(message) => {
                    let verdict = self
                        .application
                        .from_app(&message, session.session_id())
                        .await;
                    if message.msg_type() == MsgType::BusinessMessageReject {
                        continue;
                    }
                    if let (Err(reject), Some(seq)) = (verdict, message.seq_num()) {
                        session.business_reject(
                            outbox,
                            seq,
                            &message.msg_type(),
                            reject.reason,
                            &reject.text,
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}

async fn next_outbound(outbound: &mut Option<mpsc::Receiver<Message>>) -> Option<Message> {
    match outbound {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::RejectReason;
    use crate::builder::EngineBuilder;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tidefix_core::types::{BusinessRejectReason, SeqNum, Timestamp};
    use tidefix_dictionary::MessageKind;
    use tidefix_dictionary::tags::*;
    use tidefix_session::{RecordingConnection, SessionConfigBuilder, SessionState, SystemTimeSource};
    use tidefix_store::{MemoryStore, SequenceState};
    use tokio::net::TcpListener;

    #[derive(Debug, Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
        reject_orders: bool,
    }

    impl Recorder {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[async_trait]
    impl Application for Recorder {
        async fn on_create(&self, _session_id: &SessionId) {
            self.push("create".to_string());
        }

        async fn on_logon(&self, _session_id: &SessionId) {
            self.push("logon".to_string());
        }

        async fn on_logout(&self, _session_id: &SessionId) {
            self.push("logout".to_string());
        }

        async fn from_app(
            &self,
            message: &Message,
            _session_id: &SessionId,
        ) -> std::result::Result<(), RejectReason> {
            self.push(format!("app:{}", message.msg_type()));
            if self.reject_orders {
                Err(RejectReason::new(BusinessRejectReason::UnknownSecurity, "unknown symbol"))
            } else {
                Ok(())
            }
        }
    }

    fn acceptor_session() -> Session {
        let config = SessionConfigBuilder::new()
            .sender_comp_id("OPENFIX")
            .target_comp_id("initiator")
            .build()
            .unwrap();
        Session::new(config, Arc::new(MemoryStore::new()), Arc::new(SystemTimeSource)).unwrap()
    }

    fn order() -> Message {
        let mut message = Message::new(MessageKind::NewOrderSingle);
        message
            .set(CL_ORD_ID, "ORDER-1")
            .unwrap()
            .set(HANDL_INST, "1")
            .unwrap()
            .set(SYMBOL, "GOOG")
            .unwrap()
            .set(SIDE, "1")
            .unwrap()
            .set(TRANSACT_TIME, Timestamp::now())
            .unwrap()
            .set(ORDER_QTY, 100i64)
            .unwrap()
            .set(ORD_TYPE, "1")
            .unwrap();
        message
    }

    async fn read_frame(socket: &mut TcpStream, codec: &mut FixCodec, buf: &mut BytesMut) -> BytesMut {
        loop {
            if let Some(frame) = codec.decode(buf).unwrap() {
                return frame;
            }
            assert_ne!(socket.read_buf(buf).await.unwrap(), 0, "initiator hung up");
        }
    }

    /// Counterparty: answers the Logon, sends an order, then logs out.
    /// Returns every message the initiator sent after its Logon.
    async fn counterparty(listener: TcpListener) -> Vec<Message> {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut session = acceptor_session();
        let mut conn = RecordingConnection::new();
        let mut codec = FixCodec::new();
        let mut buf = BytesMut::new();
        let mut app: Vec<Message> = Vec::new();
        let mut received = Vec::new();

        let logon = read_frame(&mut socket, &mut codec, &mut buf).await;
        session.receive(&mut conn, &logon, &mut app).unwrap();
        session.send(&mut conn, order()).unwrap();
        session.logout(&mut conn, Some("done")).unwrap();
        for frame in conn.take_sent() {
            socket.write_all(&frame).await.unwrap();
        }

        while !conn.is_closed() {
            let frame = read_frame(&mut socket, &mut codec, &mut buf).await;
            received.push(tidefix_tagvalue::Parser::new().decode(&frame).unwrap());
            session.receive(&mut conn, &frame, &mut app).unwrap();
        }
        received
    }

    async fn listener() -> (TcpListener, std::net::SocketAddr) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        (listener, addr)
    }

    #[tokio::test]
    async fn test_initiator_session_lifecycle() {
        let (listener, addr) = listener().await;
        let peer = tokio::spawn(counterparty(listener));

        let store = Arc::new(MemoryStore::new());
        let initiator = EngineBuilder::new()
            .with_application(Recorder::default())
            .with_session(
                SessionConfigBuilder::new()
                    .sender_comp_id("initiator")
                    .target_comp_id("OPENFIX")
                    .build()
                    .unwrap(),
            )
            .with_store(store.clone())
            .build()
            .unwrap();

        initiator.run(addr).await.unwrap();
        let received = peer.await.unwrap();

        assert_eq!(
            received.iter().map(Message::msg_type).collect::<Vec<_>>(),
            vec![MsgType::Logout]
        );
        assert_eq!(
            initiator.application.events(),
            vec!["create", "logon", "app:D", "logout"]
        );
        assert_eq!(
            store.load(&initiator.session_id()).unwrap(),
            Some(SequenceState::new(SeqNum::new(4), SeqNum::new(3)))
        );
    }

    #[tokio::test]
    async fn test_initiator_business_rejects_refused_messages() {
        let (listener, addr) = listener().await;
        let peer = tokio::spawn(counterparty(listener));

        let initiator = EngineBuilder::new()
            .with_application(Recorder {
                reject_orders: true,
                ..Recorder::default()
            })
            .with_session(
                SessionConfigBuilder::new()
                    .sender_comp_id("initiator")
                    .target_comp_id("OPENFIX")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        initiator.run(addr).await.unwrap();
        let received = peer.await.unwrap();

        let reject = &received[0];
        assert_eq!(reject.msg_type(), MsgType::BusinessMessageReject);
        assert_eq!(reject.body().get_int(REF_SEQ_NUM).unwrap(), 2);
        assert_eq!(reject.body().get_str(REF_MSG_TYPE).unwrap(), "D");
        assert_eq!(received[1].msg_type(), MsgType::Logout);
    }

    /// Counterparty that stays silent after the Logon and logs out once the
    /// initiator sends a Heartbeat. Returns the message types it received.
    async fn silent_counterparty(listener: TcpListener) -> Vec<MsgType> {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut session = acceptor_session();
        let mut conn = RecordingConnection::new();
        let mut codec = FixCodec::new();
        let mut buf = BytesMut::new();
        let mut app: Vec<Message> = Vec::new();
        let mut received = Vec::new();

        while !conn.is_closed() {
            let frame = read_frame(&mut socket, &mut codec, &mut buf).await;
            let msg_type = tidefix_tagvalue::Parser::new().decode(&frame).unwrap().msg_type();
            session.receive(&mut conn, &frame, &mut app).unwrap();
            if msg_type == MsgType::Heartbeat && session.state() == SessionState::Active {
                session.logout(&mut conn, None).unwrap();
            }
            for frame in conn.take_sent() {
                socket.write_all(&frame).await.unwrap();
            }
            received.push(msg_type);
        }
        received
    }

    #[tokio::test]
    async fn test_initiator_heartbeats_while_sending() {
        let (listener, addr) = listener().await;
        let peer = tokio::spawn(silent_counterparty(listener));

        let initiator = EngineBuilder::new()
            .with_session(
                SessionConfigBuilder::new()
                    .sender_comp_id("initiator")
                    .target_comp_id("OPENFIX")
                    .heartbeat_interval(Duration::from_secs(1))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let (tx, rx) = mpsc::channel(16);
        let sender = tokio::spawn(async move {
            while tx.send(order()).await.is_ok() {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        });

        timeout(Duration::from_secs(10), initiator.run_with(addr, Some(rx)))
            .await
            .expect("outbound traffic kept the idle timer from firing")
            .unwrap();
        let received = peer.await.unwrap();
        sender.await.unwrap();

        assert_eq!(received.first(), Some(&MsgType::Logon));
        assert!(received.contains(&MsgType::NewOrderSingle));
        assert_eq!(received.last(), Some(&MsgType::Logout));
        assert!(received.contains(&MsgType::Heartbeat));
    }

    #[tokio::test]
    async fn test_initiator_connect_timeout() {
        let initiator = EngineBuilder::new()
            .with_session(
                SessionConfigBuilder::new()
                    .sender_comp_id("initiator")
                    .target_comp_id("OPENFIX")
                    .build()
                    .unwrap(),
            )
            .with_connect_timeout(Duration::from_millis(1))
            .build()
            .unwrap();

        // Non-routable address: the connect attempt never completes.
        let result = initiator.run("10.255.255.1:9876").await;
        assert!(matches!(
            result,
            Err(EngineError::ConnectTimeout(_) | EngineError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_initiator_ends_when_peer_hangs_up() {
        let (listener, addr) = listener().await;
        let peer = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            drop(socket);
        });

        let store = Arc::new(MemoryStore::new());
        let initiator = EngineBuilder::new()
            .with_session(
                SessionConfigBuilder::new()
                    .sender_comp_id("initiator")
                    .target_comp_id("OPENFIX")
                    .build()
                    .unwrap(),
            )
            .with_store(store.clone())
            .build()
            .unwrap();

        let result = initiator.run(addr).await;
        peer.await.unwrap();
        assert!(result.is_ok() || matches!(result, Err(EngineError::Io(_))));
        assert_eq!(
            store.load(&initiator.session_id()).unwrap(),
            Some(SequenceState::new(SeqNum::new(1), SeqNum::new(2)))
        );
    }
}
