//! Order edit sessions: working-set mutation, total reconciliation, and the
//! commit/discard lifecycle for the admin back office.

mod session;
mod totals;

pub use session::{EditSession, EditSessionView, SessionMode, WorkingSet};
pub use totals::{compute as compute_totals, OrderTotals};

use std::collections::HashMap;
use std::sync::Arc;

use storefront_core::error::AppError;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::models::{AdditionalCharge, LineItem};

#[derive(Debug, Error)]
pub enum EditError {
    #[error("order is not being edited")]
    NotEditing,

    #[error("an edit is already in progress for this order")]
    AlreadyEditing,

    #[error("no pending changes to commit")]
    NothingToCommit,

    #[error("{0}")]
    InvalidCharge(String),
}

impl From<EditError> for AppError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::NotEditing | EditError::AlreadyEditing => {
                AppError::Conflict(anyhow::anyhow!(err.to_string()))
            }
            EditError::NothingToCommit => {
                AppError::PreconditionFailed(anyhow::anyhow!(err.to_string()))
            }
            EditError::InvalidCharge(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
        }
    }
}

/// Registry of per-order edit sessions.
///
/// Each order's session sits behind its own async lock, so a slow commit on
/// one order never blocks edits on another. There is deliberately no
/// cross-process concurrency control: the back office assumes a single
/// editor per order, and the last commit wins.
#[derive(Default)]
pub struct EditSessions {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<EditSession>>>>,
}

impl EditSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the session for an order, if one exists.
    pub async fn get(&self, order_id: Uuid) -> Option<Arc<Mutex<EditSession>>> {
        self.sessions.read().await.get(&order_id).cloned()
    }

    /// Start editing an order, seeding the snapshot from the persisted
    /// state. Fails if an edit is already in progress for this order.
    pub async fn begin(
        &self,
        order_id: Uuid,
        items: Vec<LineItem>,
        charges: Vec<AdditionalCharge>,
    ) -> Result<Arc<Mutex<EditSession>>, EditError> {
        let handle = {
            let mut sessions = self.sessions.write().await;
            sessions
                .entry(order_id)
                .or_insert_with(|| {
                    Arc::new(Mutex::new(EditSession::new(order_id, vec![], vec![])))
                })
                .clone()
        };

        let mut session = handle.lock().await;
        if session.mode() == SessionMode::Editing {
            return Err(EditError::AlreadyEditing);
        }
        session.refresh_snapshot(items, charges);
        session.begin_edit()?;
        drop(session);

        Ok(handle)
    }

    /// Drop an order's session, e.g. after the order itself is deleted.
    pub async fn remove(&self, order_id: Uuid) {
        self.sessions.write().await.remove(&order_id);
    }
}
