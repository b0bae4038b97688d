// History sync worker
//
// Owns the remote client and the journal. Commands arrive over an mpsc
// channel; results go back to the UI as AppEvents. Runs until every command
// sender is dropped.

use super::journal::Journal;
use super::remote::{HistoryError, RemoteHistory};
use super::HistoryEntry;
use crate::calculator::Evaluation;
use crate::events::AppEvent;
use anyhow::Result;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum SyncCommand {
    /// Journal the entry and persist the evaluation remotely
    Save {
        evaluation: Evaluation,
        entry: HistoryEntry,
    },
    Delete {
        id: i64,
    },
    Clear,
    Fetch,
}

pub struct HistorySync {
    remote: Option<RemoteHistory>,
    journal: Option<Journal>,
    command_rx: mpsc::Receiver<SyncCommand>,
    event_tx: mpsc::Sender<AppEvent>,
}

impl HistorySync {
    pub fn new(
        remote: Option<RemoteHistory>,
        journal: Option<Journal>,
        command_rx: mpsc::Receiver<SyncCommand>,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            remote,
            journal,
            command_rx,
            event_tx,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        tracing::info!(
            remote = self.remote.is_some(),
            journal = ?self.journal.as_ref().map(|j| j.path()),
            "History sync started"
        );

        while let Some(command) = self.command_rx.recv().await {
            self.handle(command).await;
        }

        tracing::info!("History sync shutting down");
        Ok(())
    }

    async fn handle(&mut self, command: SyncCommand) {
        match command {
            SyncCommand::Save { evaluation, entry } => {
                if let Some(journal) = &self.journal {
                    if let Err(e) = journal.append(&entry) {
                        tracing::error!("Failed to journal calculation: {:?}", e);
                    }
                }

                let Some(remote) = self.remote.as_mut() else {
                    return;
                };
                if !RemoteHistory::accepts(&evaluation) {
                    tracing::debug!("Keeping {} local: not storable remotely", entry.expression);
                    return;
                }
                match remote.save(&evaluation).await {
                    Ok(_) => {
                        tracing::debug!("Saved {} remotely", entry.expression);
                        self.fetch().await;
                    }
                    Err(e) => self.report("save", e).await,
                }
            }

            SyncCommand::Delete { id } => {
                let Some(remote) = self.remote.as_mut() else {
                    return;
                };
                match remote.delete(id).await {
                    Ok(()) => self.emit(AppEvent::HistoryDeleted { id }).await,
                    Err(e) => {
                        self.report("delete", e).await;
                        // Resync so the list shows what the server still holds
                        self.fetch().await;
                    }
                }
            }

            SyncCommand::Clear => {
                let Some(remote) = self.remote.as_mut() else {
                    return;
                };
                match remote.clear().await {
                    Ok(count) => {
                        tracing::info!("Remote history cleared: {} entries", count);
                        self.emit(AppEvent::HistoryCleared { count }).await;
                    }
                    Err(e) => self.report("clear", e).await,
                }
            }

            SyncCommand::Fetch => self.fetch().await,
        }
    }

    async fn fetch(&mut self) {
        let Some(remote) = self.remote.as_mut() else {
            return;
        };
        match remote.fetch().await {
            Ok(entries) => self.emit(AppEvent::HistoryLoaded(entries)).await,
            Err(e) => self.report("fetch", e).await,
        }
    }

    async fn report(&mut self, action: &'static str, error: HistoryError) {
        match error {
            HistoryError::NotConfigured => {
                tracing::debug!("Skipping remote {}: not configured", action);
            }
            HistoryError::SessionExpired => {
                tracing::warn!("Remote {} failed: session expired", action);
                self.remote = None;
                self.emit(AppEvent::SessionExpired).await;
            }
            other => {
                tracing::warn!("Remote {} failed: {}", action, other);
                self.emit(AppEvent::SyncFailed {
                    action,
                    message: other.to_string(),
                })
                .await;
            }
        }
    }

    async fn emit(&self, event: AppEvent) {
        if self.event_tx.send(event).await.is_err() {
            tracing::debug!("UI event channel closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::BinaryOp;
    use crate::config::RemoteConfig;

    fn save_command() -> SyncCommand {
        let evaluation = Evaluation {
            lhs: 6.0,
            op: BinaryOp::Divide,
            rhs: 4.0,
            result: 1.5,
        };
        SyncCommand::Save {
            evaluation,
            entry: HistoryEntry::from_evaluation(&evaluation),
        }
    }

    #[tokio::test]
    async fn test_local_only_save_writes_journal() {
        let dir = std::env::temp_dir().join(format!("kogui-sync-{}", std::process::id()));
        let journal = Journal::new(&dir, "sync-test").unwrap();
        let path = journal.path().to_path_buf();

        let (command_tx, command_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let worker = HistorySync::new(None, Some(journal), command_rx, event_tx);

        command_tx.send(save_command()).await.unwrap();
        command_tx.send(SyncCommand::Fetch).await.unwrap();
        drop(command_tx);
        worker.run().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("6 ÷ 4"));
        // No remote, nothing to report
        assert!(event_rx.try_recv().is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_unauthenticated_remote_is_silent() {
        let config = RemoteConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            access_token: None,
            ..Default::default()
        };
        let remote = RemoteHistory::new(&config).unwrap();

        let (command_tx, command_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let worker = HistorySync::new(Some(remote), None, command_rx, event_tx);

        command_tx.send(SyncCommand::Fetch).await.unwrap();
        command_tx.send(SyncCommand::Clear).await.unwrap();
        drop(command_tx);
        worker.run().await.unwrap();

        assert!(event_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_modulo_save_stays_local() {
        let dir = std::env::temp_dir().join(format!("kogui-sync-mod-{}", std::process::id()));
        let journal = Journal::new(&dir, "sync-modulo").unwrap();
        let path = journal.path().to_path_buf();

        // Unreachable but authenticated: any request would report SyncFailed
        let config = RemoteConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            access_token: Some("token".to_string()),
            timeout_secs: 2,
            ..Default::default()
        };
        let remote = RemoteHistory::new(&config).unwrap();

        let (command_tx, command_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let worker = HistorySync::new(Some(remote), Some(journal), command_rx, event_tx);

        let evaluation = Evaluation {
            lhs: 5.0,
            op: BinaryOp::Modulo,
            rhs: 0.0,
            result: f64::NAN,
        };
        command_tx
            .send(SyncCommand::Save {
                evaluation,
                entry: HistoryEntry::from_evaluation(&evaluation),
            })
            .await
            .unwrap();
        drop(command_tx);
        worker.run().await.unwrap();

        assert!(event_rx.try_recv().is_err());
        let content = std::fs::read_to_string(&path).unwrap();
        let journaled: HistoryEntry = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(journaled.expression, "5 % 0");
        assert!(journaled.result.is_nan());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_unreachable_remote_reports_failure() {
        let config = RemoteConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            access_token: Some("token".to_string()),
            timeout_secs: 2,
            ..Default::default()
        };
        let remote = RemoteHistory::new(&config).unwrap();

        let (command_tx, command_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let worker = HistorySync::new(Some(remote), None, command_rx, event_tx);

        command_tx.send(SyncCommand::Fetch).await.unwrap();
        drop(command_tx);
        worker.run().await.unwrap();

        match event_rx.try_recv() {
            Ok(AppEvent::SyncFailed { action, .. }) => assert_eq!(action, "fetch"),
            other => panic!("expected SyncFailed, got {:?}", other),
        }
    }
}
