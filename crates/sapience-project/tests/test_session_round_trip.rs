use async_trait::async_trait;

use sapience_core::checkpoint::CheckpointConfig;
use sapience_core::dataset::{ColumnStats, DatasetHandle, StatsMap};
use sapience_core::method::MethodKind;
use sapience_core::window::manager::{NullPresenter, WindowManager};
use sapience_core::window::model::{TEXT_COLUMN_FIELD, WindowId, WindowState};
use sapience_core::workspace::Workspace;
use sapience_project::{
    export_project, import_project, ImportOutcome, KeyManager, PasswordPrompt,
};

struct FixedPrompt(Option<String>);

#[async_trait]
impl PasswordPrompt for FixedPrompt {
    async fn request_password(&self) -> Option<String> {
        self.0.clone()
    }
}

fn workspace_with_dataset() -> Workspace {
    let mut stats = StatsMap::new();
    stats.insert(
        "review".into(),
        ColumnStats::Textual {
            avg_len: 11.5,
            max_len: 64,
            min_len: 2,
            unique_count: 8,
        },
    );
    stats.insert(
        "rating".into(),
        ColumnStats::Numeric {
            mean: 3.4,
            std_dev: 1.1,
        },
    );
    let mut ws = Workspace::new();
    ws.set_dataset(Some(DatasetHandle {
        file_name: "reviews.csv".into(),
        content: b"review,rating\ngreat,5\nawful,1".to_vec(),
        stats,
    }));
    ws
}

#[tokio::test]
async fn full_session_survives_export_and_import() {
    // Build a session: one tf-idf window on "review" with a recorded
    // analysis result and a checkpoint, then minimize it.
    let mut ws = workspace_with_dataset();
    let mut wm = WindowManager::new(NullPresenter);
    let id = wm.open(&mut ws, MethodKind::TfIdf, None).unwrap();
    wm.set_field(&mut ws, &id, TEXT_COLUMN_FIELD, "review".into())
        .unwrap();
    wm.set_field(&mut ws, &id, "maxWords", "200".into()).unwrap();
    wm.set_preview(&mut ws, &id, "<img/>").unwrap();
    let config = CheckpointConfig {
        method: MethodKind::TfIdf,
        fields: ws.window(&id).unwrap().fields.clone(),
    };
    let checkpoint_id = ws
        .checkpoints_mut()
        .create(&id, config, "<img/>".into())
        .id
        .clone();
    wm.minimize(&mut ws, &id, false).unwrap();

    let mut keys = KeyManager::new();
    keys.set_password("p1").await.unwrap();
    let container = export_project(&ws, &keys).unwrap();

    // Import into a fresh session under the same password.
    let mut ws2 = Workspace::new();
    let mut wm2 = WindowManager::new(NullPresenter);
    let mut keys2 = KeyManager::new();
    keys2.set_password("p1").await.unwrap();
    let outcome = import_project(&mut ws2, &mut wm2, &mut keys2, &FixedPrompt(None), &container)
        .await
        .unwrap();
    assert_eq!(outcome, ImportOutcome::Imported);

    let dataset = ws2.dataset().unwrap();
    assert_eq!(dataset.file_name, "reviews.csv");
    assert_eq!(dataset.content, b"review,rating\ngreat,5\nawful,1");
    assert_eq!(dataset.stats.len(), 2);

    let window = ws2.window(&id).unwrap();
    assert_eq!(window.state, WindowState::Minimized);
    assert_eq!(window.chosen_column(), Some("review"));
    assert_eq!(window.preview_content, "<img/>");
    assert_eq!(
        window.fields.get("maxWords").and_then(|v| v.as_text()),
        Some("200")
    );

    // One tray entry, no duplicate from the forced replay.
    let tray = ws2.tray_entries();
    assert_eq!(tray.len(), 1);
    assert_eq!(
        tray[0].title,
        "Term Frequency-Inverse Document Frequency (TF-IDF) (review)"
    );

    // Exactly the one checkpoint, same id hence same timestamp.
    let history = ws2.checkpoints().history(&id);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, checkpoint_id);
    assert_eq!(history[0].output_data, "<img/>");
}

#[tokio::test]
async fn checkpoint_order_is_preserved_across_round_trip() {
    let mut ws = workspace_with_dataset();
    let mut wm = WindowManager::new(NullPresenter);
    let id = wm.open(&mut ws, MethodKind::Lda, None).unwrap();
    wm.set_field(&mut ws, &id, TEXT_COLUMN_FIELD, "review".into())
        .unwrap();

    let config = CheckpointConfig {
        method: MethodKind::Lda,
        fields: ws.window(&id).unwrap().fields.clone(),
    };
    for (ts, output) in [(1_000, "first"), (2_000, "second"), (3_000, "third")] {
        ws.checkpoints_mut()
            .create_at(&id, config.clone(), output.into(), ts);
    }

    let mut keys = KeyManager::new();
    keys.set_password("p1").await.unwrap();
    let container = export_project(&ws, &keys).unwrap();

    let mut ws2 = Workspace::new();
    let mut wm2 = WindowManager::new(NullPresenter);
    import_project(&mut ws2, &mut wm2, &mut keys, &FixedPrompt(None), &container)
        .await
        .unwrap();

    let history = ws2.checkpoints().history(&id);
    let outputs: Vec<&str> = history.iter().map(|c| c.output_data.as_str()).collect();
    assert_eq!(outputs, ["first", "second", "third"]);
    let timestamps: Vec<i64> = history.iter().map(|c| c.timestamp).collect();
    assert_eq!(timestamps, [1_000, 2_000, 3_000]);
}

#[tokio::test]
async fn import_under_new_password_replaces_session_key() {
    let mut ws = workspace_with_dataset();
    let mut wm = WindowManager::new(NullPresenter);
    wm.open(&mut ws, MethodKind::TfIdf, None).unwrap();
    let mut keys = KeyManager::new();
    keys.set_password("p1").await.unwrap();
    let container = export_project(&ws, &keys).unwrap();

    // Receiving session runs under a different password.
    let mut ws2 = Workspace::new();
    let mut wm2 = WindowManager::new(NullPresenter);
    let mut keys2 = KeyManager::new();
    keys2.set_password("p2").await.unwrap();

    let outcome = import_project(
        &mut ws2,
        &mut wm2,
        &mut keys2,
        &FixedPrompt(Some("p1".into())),
        &container,
    )
    .await
    .unwrap();
    assert_eq!(outcome, ImportOutcome::Imported);
    assert_eq!(ws2.window_count(), 1);

    // Subsequent exports use the recovered key: the original session can
    // read them without prompting.
    let re_exported = export_project(&ws2, &keys2).unwrap();
    let mut ws3 = Workspace::new();
    let mut wm3 = WindowManager::new(NullPresenter);
    let outcome = import_project(&mut ws3, &mut wm3, &mut keys, &FixedPrompt(None), &re_exported)
        .await
        .unwrap();
    assert_eq!(outcome, ImportOutcome::Imported);
}

#[tokio::test]
async fn windows_without_a_window_record_are_dropped_on_import() {
    // An importing session with live windows gets them replaced wholesale.
    let mut ws = workspace_with_dataset();
    let mut wm = WindowManager::new(NullPresenter);
    wm.open(&mut ws, MethodKind::Nmf, None).unwrap();
    let mut keys = KeyManager::new();
    keys.set_password("p1").await.unwrap();
    let container = export_project(&Workspace::new(), &keys).unwrap();

    let stale: Vec<WindowId> = ws.windows().map(|w| w.id.clone()).collect();
    import_project(&mut ws, &mut wm, &mut keys, &FixedPrompt(None), &container)
        .await
        .unwrap();
    assert_eq!(ws.window_count(), 0);
    assert!(ws.dataset().is_none());
    for id in stale {
        assert!(ws.window(&id).is_none());
    }
}
