/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FIX 4.2 initiator example.
//!
//! Connects to `FIX_ADDR` (default `127.0.0.1:9876`), logs on, sends one
//! order and logs every application message received. Sequence numbers are
//! kept in `./seqnums`.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tidefix::dictionary::tags::*;
use tidefix::prelude::*;
use tokio::sync::mpsc;
use tracing::info;

struct LoggingApplication;

#[async_trait]
impl Application for LoggingApplication {
    async fn on_create(&self, session_id: &SessionId) {
        info!(%session_id, "session created");
    }

    async fn on_logon(&self, session_id: &SessionId) {
        info!(%session_id, "logged on");
    }

    async fn on_logout(&self, session_id: &SessionId) {
        info!(%session_id, "logged out");
    }

    async fn from_app(
        &self,
        message: &Message,
        session_id: &SessionId,
    ) -> std::result::Result<(), RejectReason> {
        info!(%session_id, msg_type = %message.msg_type(), seq = ?message.seq_num(), "application message");
        Ok(())
    }
}

fn order(cl_ord_id: &str) -> std::result::Result<Message, EncodeError> {
    let mut message = Message::new(MessageKind::NewOrderSingle);
    message
        .set(CL_ORD_ID, cl_ord_id)?
        .set(HANDL_INST, "1")?
        .set(SYMBOL, "IBM")?
        .set(SIDE, "1")?
        .set(TRANSACT_TIME, Timestamp::now())?
        .set(ORDER_QTY, 100i64)?
        .set(ORD_TYPE, "1")?;
    Ok(message)
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("FIX_ADDR").unwrap_or_else(|_| "127.0.0.1:9876".to_string());
    let config = SessionConfigBuilder::new()
        .sender_comp_id("initiator")
        .target_comp_id("OPENFIX")
        .heartbeat_interval(Duration::from_secs(30))
        .build()?;

    let initiator = EngineBuilder::new()
        .with_application(LoggingApplication)
        .with_session(config)
        .with_store(Arc::new(FileStore::new("seqnums")))
        .with_connect_timeout(Duration::from_secs(10))
        .build()?;

    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        if let Ok(message) = order("O1") {
            let _ = tx.send(message).await;
        }
    });

    info!(%addr, "connecting");
    initiator.run_with(addr.as_str(), Some(rx)).await?;
    Ok(())
}
