//! The archive run: verify the mapping, then sweep each source board's done
//! list into its archive list.
//!
//! Every step runs sequentially. A failure on one board or card is logged and
//! skipped; a card that was moved stays moved even if a later step fails.

use tracing::{debug, error, info, instrument, warn};

use crate::ports::{BoardService, Clock};
use crate::retention::parse_timestamp;
use crate::{ArchiveMapping, ArchiveSettings, ArchiverError, BoardList, ListId, RunSummary};

/// Maximum characters of a card name shown in log lines.
const CARD_NAME_LOG_WIDTH: usize = 40;

/// Drives an archive run against a [`BoardService`].
pub struct Archiver<B, C> {
    boards: B,
    clock: C,
    settings: ArchiveSettings,
}

impl<B, C> Archiver<B, C>
where
    B: BoardService,
    C: Clock,
{
    /// Creates an orchestrator over `boards`, reading time from `clock`.
    pub fn new(boards: B, clock: C, settings: ArchiveSettings) -> Self {
        Self {
            boards,
            clock,
            settings,
        }
    }

    /// Settings the run was configured with.
    pub fn settings(&self) -> &ArchiveSettings {
        &self.settings
    }

    /// Runs verification followed by every configured mapping, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiverError::ArchiveBoardNotFound`] when verification cannot
    /// read the archive board. No card is touched in that case.
    pub async fn run(&self) -> Result<RunSummary, ArchiverError> {
        info!("{}", "=".repeat(60));
        info!("Starting card archive run");
        info!(days = self.settings.retention.as_days(), "Retention window");
        info!(board = %self.settings.archive_board, "Archive board");
        info!("{}", "=".repeat(60));

        if let Err(err) = self.verify_mapping().await {
            error!(error = %err, "Archive settings failed verification");
            return Err(err);
        }

        let mut summary = RunSummary::default();
        for mapping in &self.settings.mappings {
            if !mapping.is_configured() {
                warn!(
                    board = %mapping.source_board,
                    "Skipping board: archive list is not configured"
                );
                continue;
            }

            let moved = self.process_source_board(mapping).await;
            summary.record(mapping.source_board.clone(), moved);
        }

        info!("{}", "=".repeat(60));
        if summary.total_moved() > 0 {
            info!("Archive run completed successfully");
        } else {
            info!("Archive run completed");
        }
        info!(total = summary.total_moved(), "Total cards moved");
        info!("{}", "=".repeat(60));

        Ok(summary)
    }

    /// Checks that the archive board exists and reports, for every mapping,
    /// whether its archive list belongs to that board.
    ///
    /// Only a missing archive board is an error; problems with individual
    /// mappings are logged.
    #[instrument(skip(self))]
    pub async fn verify_mapping(&self) -> Result<(), ArchiverError> {
        info!("Verifying archive settings");
        let archive_board_id = &self.settings.archive_board;

        let Some(archive_board) = self.boards.board_info(archive_board_id).await else {
            error!(board = %archive_board_id, "Archive board not found");
            return Err(ArchiverError::ArchiveBoardNotFound {
                board: archive_board_id.clone(),
            });
        };
        info!(name = %archive_board.name, "Archive board found");

        let archive_lists = self.boards.board_lists(archive_board_id).await;
        info!("Lists on the archive board:");
        for list in &archive_lists {
            info!("  - '{}' (ID: {})", list.name, list.id);
        }

        for mapping in &self.settings.mappings {
            let source_name = match self.boards.board_info(&mapping.source_board).await {
                Some(board) => board.name,
                None => "NOT FOUND".to_owned(),
            };

            if let Some(list) = find_list(&archive_lists, &mapping.archive_list) {
                info!("{} -> '{}'", source_name, list.name);
            } else if mapping.archive_list.is_placeholder() {
                warn!(
                    "{} -> NOT CONFIGURED (replace '{}')",
                    source_name, mapping.archive_list
                );
            } else {
                error!(
                    "{} -> list ID {} NOT FOUND on the archive board",
                    source_name, mapping.archive_list
                );
            }
        }

        Ok(())
    }

    /// Moves every expired card in the source board's done list to the mapped
    /// archive list. Returns the number of cards moved.
    #[instrument(skip(self, mapping), fields(board = %mapping.source_board))]
    pub async fn process_source_board(&self, mapping: &ArchiveMapping) -> usize {
        let source = &mapping.source_board;
        let done_name = &self.settings.done_list_name;
        info!("Processing board {}", source);

        let Some(board) = self.boards.board_info(source).await else {
            error!("Board {} not found", source);
            return 0;
        };
        info!(name = %board.name, "Board found");

        let source_lists = self.boards.board_lists(source).await;
        let Some(done_list) = source_lists.iter().find(|l| &l.name == done_name) else {
            info!("List '{}' not found", done_name);
            return 0;
        };
        info!("Found list '{}'", done_name);

        let archive_list_name = self.archive_list_name(&mapping.archive_list).await;

        let done_cards: Vec<_> = self
            .boards
            .board_cards(source)
            .await
            .into_iter()
            .filter(|card| card.list_id.as_ref() == Some(&done_list.id))
            .collect();
        info!(count = done_cards.len(), "Cards in '{}'", done_name);

        if done_cards.is_empty() {
            info!("No cards to archive");
            return 0;
        }

        let now = self.clock.now();
        let retention = self.settings.retention;
        info!("Archiving cards older than {}", retention.cutoff(now).date_label());
        info!("Current time {} UTC", now.minute_label());
        info!("Target list '{}'", archive_list_name);

        let mut moved = 0;
        for card in &done_cards {
            let Some(raw) = card.updated_at.as_deref().filter(|s| !s.is_empty()) else {
                error!(card = %card.id, "Card has no timestamp, skipping");
                continue;
            };
            let Some(updated) = parse_timestamp(raw) else {
                error!(card = %card.id, value = raw, "Could not parse card timestamp");
                continue;
            };

            let days_old = updated.days_until(now);
            if !retention.is_expired(updated, now) {
                debug!("'{}' ({} days) is not due yet", card.name, days_old);
                continue;
            }

            info!(
                "'{}' ({} days, updated {})",
                card.short_name(CARD_NAME_LOG_WIDTH),
                days_old,
                updated.date_label()
            );

            if self
                .boards
                .move_card(&card.id, &self.settings.archive_board, &mapping.archive_list)
                .await
            {
                info!("Moved to '{}'", archive_list_name);
                moved += 1;
            } else {
                error!(card = %card.id, "Failed to move card");
            }
        }

        info!(moved, "Cards moved from board {}", source);
        moved
    }

    async fn archive_list_name(&self, list: &ListId) -> String {
        let lists = self.boards.board_lists(&self.settings.archive_board).await;
        match find_list(&lists, list) {
            Some(found) => found.name.clone(),
            None => format!("List {list}"),
        }
    }
}

fn find_list<'a>(lists: &'a [BoardList], id: &ListId) -> Option<&'a BoardList> {
    lists.iter().find(|l| &l.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{Board, BoardId, Card, CardId, RetentionWindow, Timestamp, UNCONFIGURED_LIST_ID};

    const ARCHIVE: &str = "archive";

    fn board_id(s: &str) -> BoardId {
        BoardId::new(s).unwrap()
    }

    fn list_id(s: &str) -> ListId {
        ListId::new(s).unwrap()
    }

    struct FixedClock(Timestamp);

    impl Clock for FixedClock {
        fn now(&self) -> Timestamp {
            self.0
        }
    }

    fn dec_20() -> FixedClock {
        FixedClock(Timestamp::from_utc(
            Utc.with_ymd_and_hms(2025, 12, 20, 0, 0, 0).unwrap(),
        ))
    }

    /// In-memory board server. Moves are recorded and applied so that a second
    /// run sees the archived state.
    #[derive(Default)]
    struct FakeBoards {
        boards: HashMap<BoardId, String>,
        lists: Vec<BoardList>,
        cards: Mutex<Vec<Card>>,
        moves: Mutex<Vec<(CardId, BoardId, ListId)>>,
        failing_moves: Vec<CardId>,
    }

    impl FakeBoards {
        fn with_board(mut self, id: &str, name: &str, lists: &[(&str, &str)]) -> Self {
            self.boards.insert(board_id(id), name.to_owned());
            for (list, list_name) in lists {
                self.lists.push(BoardList {
                    id: list_id(list),
                    name: (*list_name).to_owned(),
                    board_id: board_id(id),
                });
            }
            self
        }

        fn with_card(self, id: &str, board: &str, list: &str, updated: Option<&str>) -> Self {
            self.cards.lock().unwrap().push(Card {
                id: CardId::new(id).unwrap(),
                name: format!("Card {id}"),
                list_id: Some(list_id(list)),
                board_id: board_id(board),
                created_at: None,
                updated_at: updated.map(str::to_owned),
            });
            self
        }

        fn moved_ids(&self) -> Vec<String> {
            self.moves
                .lock()
                .unwrap()
                .iter()
                .map(|(card, _, _)| card.to_string())
                .collect()
        }
    }

    #[async_trait]
    impl BoardService for FakeBoards {
        async fn board_info(&self, board: &BoardId) -> Option<Board> {
            self.boards.get(board).map(|name| Board {
                id: board.clone(),
                name: name.clone(),
            })
        }

        async fn board_lists(&self, board: &BoardId) -> Vec<BoardList> {
            self.lists
                .iter()
                .filter(|l| &l.board_id == board)
                .cloned()
                .collect()
        }

        async fn board_cards(&self, board: &BoardId) -> Vec<Card> {
            self.cards
                .lock()
                .unwrap()
                .iter()
                .filter(|c| &c.board_id == board)
                .cloned()
                .collect()
        }

        async fn move_card(
            &self,
            card: &CardId,
            target_board: &BoardId,
            target_list: &ListId,
        ) -> bool {
            if self.failing_moves.contains(card) {
                return false;
            }
            self.moves
                .lock()
                .unwrap()
                .push((card.clone(), target_board.clone(), target_list.clone()));
            for c in self.cards.lock().unwrap().iter_mut() {
                if &c.id == card {
                    c.board_id = target_board.clone();
                    c.list_id = Some(target_list.clone());
                }
            }
            true
        }
    }

    fn settings(mappings: &[(&str, &str)]) -> ArchiveSettings {
        ArchiveSettings {
            retention: RetentionWindow::days(14),
            done_list_name: "Done".to_owned(),
            archive_board: board_id(ARCHIVE),
            mappings: mappings
                .iter()
                .map(|(src, list)| ArchiveMapping::new(board_id(src), list_id(list)))
                .collect(),
        }
    }

    fn two_team_server() -> FakeBoards {
        FakeBoards::default()
            .with_board(ARCHIVE, "Archive", &[("arch-dev", "Dev"), ("arch-ops", "Ops")])
            .with_board("dev", "Development", &[("dev-todo", "To do"), ("dev-done", "Done")])
            .with_board("ops", "Operations", &[("ops-done", "Done")])
            .with_card("1", "dev", "dev-done", Some("2025-12-01T00:00:00Z"))
            .with_card("2", "dev", "dev-done", Some("2025-12-10T00:00:00Z"))
            .with_card("3", "dev", "dev-todo", Some("2025-01-01T00:00:00Z"))
            .with_card("4", "ops", "ops-done", Some("2025-11-01T09:15:00.000Z"))
            .with_card("5", "ops", "ops-done", Some("2025-11-20T09:15:00.000Z"))
    }

    #[tokio::test]
    async fn only_expired_done_cards_are_moved_once_to_mapped_list() {
        let archiver = Archiver::new(
            two_team_server(),
            dec_20(),
            settings(&[("dev", "arch-dev"), ("ops", "arch-ops")]),
        );

        let summary = archiver.run().await.unwrap();

        let moves = archiver.boards.moves.lock().unwrap().clone();
        assert_eq!(
            moves,
            vec![
                (CardId::new("1").unwrap(), board_id(ARCHIVE), list_id("arch-dev")),
                (CardId::new("4").unwrap(), board_id(ARCHIVE), list_id("arch-ops")),
                (CardId::new("5").unwrap(), board_id(ARCHIVE), list_id("arch-ops")),
            ]
        );
        assert_eq!(summary.boards()[0].moved, 1);
        assert_eq!(summary.boards()[1].moved, 2);
        assert_eq!(summary.total_moved(), 3);
    }

    #[tokio::test]
    async fn second_run_does_not_rematch_archived_cards() {
        let archiver = Archiver::new(
            two_team_server(),
            dec_20(),
            settings(&[("dev", "arch-dev"), ("ops", "arch-ops")]),
        );

        archiver.run().await.unwrap();
        let second = archiver.run().await.unwrap();

        assert_eq!(second.total_moved(), 0);
        assert_eq!(archiver.boards.moved_ids(), vec!["1", "4", "5"]);
    }

    #[tokio::test]
    async fn unparseable_or_missing_timestamps_are_skipped() {
        let server = FakeBoards::default()
            .with_board(ARCHIVE, "Archive", &[("arch", "Dev")])
            .with_board("dev", "Development", &[("done", "Done")])
            .with_card("1", "dev", "done", Some("not a date"))
            .with_card("2", "dev", "done", None)
            .with_card("3", "dev", "done", Some(""))
            .with_card("4", "dev", "done", Some("2025-10-01T00:00:00Z"));
        let archiver = Archiver::new(server, dec_20(), settings(&[("dev", "arch")]));

        let summary = archiver.run().await.unwrap();

        assert_eq!(summary.total_moved(), 1);
        assert_eq!(archiver.boards.moved_ids(), vec!["4"]);
    }

    #[tokio::test]
    async fn failed_moves_are_not_counted() {
        let mut server = FakeBoards::default()
            .with_board(ARCHIVE, "Archive", &[("arch", "Dev")])
            .with_board("dev", "Development", &[("done", "Done")])
            .with_card("1", "dev", "done", Some("2025-10-01T00:00:00Z"))
            .with_card("2", "dev", "done", Some("2025-10-02T00:00:00Z"));
        server.failing_moves.push(CardId::new("1").unwrap());
        let archiver = Archiver::new(server, dec_20(), settings(&[("dev", "arch")]));

        let summary = archiver.run().await.unwrap();

        assert_eq!(summary.total_moved(), 1);
        assert_eq!(archiver.boards.moved_ids(), vec!["2"]);
    }

    #[tokio::test]
    async fn board_without_done_list_moves_nothing() {
        let server = FakeBoards::default()
            .with_board(ARCHIVE, "Archive", &[("arch", "Dev")])
            .with_board("dev", "Development", &[("todo", "Finished")])
            .with_card("1", "dev", "todo", Some("2025-01-01T00:00:00Z"));
        let archiver = Archiver::new(server, dec_20(), settings(&[("dev", "arch")]));

        let summary = archiver.run().await.unwrap();

        assert_eq!(summary.total_moved(), 0);
        assert!(archiver.boards.moved_ids().is_empty());
    }

    #[tokio::test]
    async fn missing_source_board_is_skipped_and_others_proceed() {
        let server = FakeBoards::default()
            .with_board(ARCHIVE, "Archive", &[("arch", "Dev")])
            .with_board("dev", "Development", &[("done", "Done")])
            .with_card("1", "dev", "done", Some("2025-10-01T00:00:00Z"));
        let archiver = Archiver::new(
            server,
            dec_20(),
            settings(&[("gone", "arch"), ("dev", "arch")]),
        );

        let summary = archiver.run().await.unwrap();

        assert_eq!(summary.boards().len(), 2);
        assert_eq!(summary.boards()[0].moved, 0);
        assert_eq!(summary.total_moved(), 1);
    }

    #[tokio::test]
    async fn placeholder_mappings_are_skipped() {
        let archiver = Archiver::new(
            two_team_server(),
            dec_20(),
            settings(&[("dev", UNCONFIGURED_LIST_ID), ("ops", "arch-ops")]),
        );

        let summary = archiver.run().await.unwrap();

        assert_eq!(summary.boards().len(), 1);
        assert_eq!(summary.boards()[0].source_board, board_id("ops"));
        assert_eq!(archiver.boards.moved_ids(), vec!["4", "5"]);
    }

    #[tokio::test]
    async fn missing_archive_board_halts_before_any_move() {
        let server = FakeBoards::default()
            .with_board("dev", "Development", &[("done", "Done")])
            .with_card("1", "dev", "done", Some("2025-10-01T00:00:00Z"));
        let archiver = Archiver::new(server, dec_20(), settings(&[("dev", "arch")]));

        let err = archiver.run().await.unwrap_err();

        assert!(matches!(err, ArchiverError::ArchiveBoardNotFound { .. }));
        assert!(archiver.boards.moved_ids().is_empty());
    }

    #[tokio::test]
    async fn unknown_archive_list_is_reported_but_not_fatal() {
        let archiver = Archiver::new(
            two_team_server(),
            dec_20(),
            settings(&[("dev", "not-on-archive")]),
        );

        assert!(archiver.verify_mapping().await.is_ok());
    }

    #[tokio::test]
    async fn card_updated_exactly_at_cutoff_stays() {
        let server = FakeBoards::default()
            .with_board(ARCHIVE, "Archive", &[("arch", "Dev")])
            .with_board("dev", "Development", &[("done", "Done")])
            .with_card("1", "dev", "done", Some("2025-12-06T00:00:00Z"))
            .with_card("2", "dev", "done", Some("2025-12-05T23:59:59.999Z"));
        let archiver = Archiver::new(server, dec_20(), settings(&[("dev", "arch")]));

        let moved = archiver
            .process_source_board(&archiver.settings().mappings[0].clone())
            .await;

        assert_eq!(moved, 1);
        assert_eq!(archiver.boards.moved_ids(), vec!["2"]);
    }
}
