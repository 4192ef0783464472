/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! File-based sequence store.
//!
//! Each session gets one file named `<sender>-<target>.seqnums` holding
//! `incoming:outgoing` as plain text.

use crate::traits::{SequenceState, SessionStore};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tidefix_core::error::StoreError;
use tidefix_core::types::{CompId, SeqNum, SessionId};
use tracing::debug;

/// Sequence store keeping one text file per session in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the store directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, sender: &CompId, target: &CompId) -> PathBuf {
        self.dir.join(format!("{sender}-{target}.seqnums"))
    }

    fn write(&self, path: &Path, state: SequenceState) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(path, format!("{}:{}", state.incoming, state.outgoing))?;
        debug!(path = %path.display(), incoming = %state.incoming, outgoing = %state.outgoing, "saved sequence numbers");
        Ok(())
    }
}

fn parse_state(text: &str) -> Option<SequenceState> {
    let (incoming, outgoing) = text.trim().split_once(':')?;
    Some(SequenceState::new(
        SeqNum::new(incoming.parse().ok()?),
        SeqNum::new(outgoing.parse().ok()?),
    ))
}

impl SessionStore for FileStore {
    fn load(&self, session: &SessionId) -> Result<Option<SequenceState>, StoreError> {
        let path = self.path(&session.sender_comp_id, &session.target_comp_id);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        parse_state(&text)
            .map(Some)
            .ok_or_else(|| StoreError::Corrupted {
                reason: format!("{}: expected 'incoming:outgoing'", path.display()),
            })
    }

    fn save(&self, session: &SessionId, state: SequenceState) -> Result<(), StoreError> {
        let path = self.path(&session.sender_comp_id, &session.target_comp_id);
        self.write(&path, state)
    }

    fn reset_outgoing_seq(
        &self,
        sender: &CompId,
        target: &CompId,
        incoming: SeqNum,
        outgoing: SeqNum,
    ) -> Result<(), StoreError> {
        let path = self.path(sender, target);
        self.write(&path, SequenceState::new(incoming, outgoing))
    }
}
