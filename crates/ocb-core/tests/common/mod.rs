use ocb_core::BoardBuilder;
use tempfile::TempDir;

/// Helper function to create a test board
pub async fn create_test_board() -> (TempDir, ocb_core::Board) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let board = BoardBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create board");
    (temp_dir, board)
}
