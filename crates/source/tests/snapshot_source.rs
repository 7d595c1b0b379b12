use testkit::{
    CONVERSATION_ID, SECOND_CONVERSATION_ID, sample_snapshot, sample_tools, write_snapshot,
};
use tracedeck_core::TraceDeckError;
use tracedeck_core::config::Config;
use tracedeck_core::ids::{ConversationId, TraceId};
use tracedeck_core::source::TraceSource;
use tracedeck_source::{ConfiguredSource, SnapshotSource};

#[tokio::test]
async fn opens_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_snapshot(dir.path()).unwrap();

    let source = SnapshotSource::open(&path).await.unwrap();
    let list = source.conversations().await.unwrap();
    let ids: Vec<_> = list.iter().map(|c| c.group_id.as_str()).collect();
    assert_eq!(ids, vec![CONVERSATION_ID, SECOND_CONVERSATION_ID]);
    assert_eq!(list[1].instruction, None);
}

#[tokio::test]
async fn conversation_neighbors_follow_file_order() {
    let source = SnapshotSource::from_value(sample_snapshot()).unwrap();

    let first = ConversationId::parse(CONVERSATION_ID).unwrap();
    let n = source.conversation_neighbors(&first).await.unwrap();
    assert_eq!(n.previous, None);
    assert_eq!(n.next.as_deref(), Some(SECOND_CONVERSATION_ID));

    let unknown = ConversationId::parse("nope").unwrap();
    let n = source.conversation_neighbors(&unknown).await.unwrap();
    assert_eq!((n.previous, n.next), (None, None));
}

#[tokio::test]
async fn trace_neighbors_cross_conversations() {
    let source = SnapshotSource::from_value(sample_snapshot()).unwrap();
    let id = TraceId::parse("trace-2").unwrap();
    let n = source.trace_neighbors(&id).await.unwrap();
    assert_eq!(n.previous.as_deref(), Some("trace-1"));
    assert_eq!(n.next.as_deref(), Some("trace-3"));
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let source = SnapshotSource::from_value(sample_snapshot()).unwrap();

    let err = source
        .conversation_traces(&ConversationId::parse("nope").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, TraceDeckError::NotFound(_)));

    let err = source
        .trace_spans(&TraceId::parse("nope").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, TraceDeckError::NotFound(_)));
}

#[tokio::test]
async fn spans_keep_raw_records() {
    let source = SnapshotSource::from_value(sample_snapshot()).unwrap();
    let spans = source
        .trace_spans(&TraceId::parse("trace-1").unwrap())
        .await
        .unwrap();
    assert_eq!(spans.len(), 4);
    assert_eq!(spans[0].declared_type(), Some("agent"));
}

#[tokio::test]
async fn config_selects_snapshot_when_file_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_snapshot(dir.path()).unwrap();

    let cfg = Config {
        source_file: Some(path),
        ..Config::default()
    };
    let source = ConfiguredSource::from_config(&cfg).await.unwrap();
    assert!(matches!(source, ConfiguredSource::Snapshot(_)));
    assert_eq!(source.conversations().await.unwrap().len(), 2);

    let http = ConfiguredSource::from_config(&Config::default()).await.unwrap();
    assert!(matches!(http, ConfiguredSource::Http(_)));
}

#[tokio::test]
async fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SnapshotSource::open(&dir.path().join("absent.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, TraceDeckError::Io(_)));
}

#[tokio::test]
async fn tools_come_from_snapshot() {
    let source = SnapshotSource::from_value(sample_snapshot()).unwrap();
    assert_eq!(source.tools().await.unwrap(), sample_tools());

    let bare = SnapshotSource::from_json(r#"{"conversations": []}"#).unwrap();
    assert!(bare.tools().await.unwrap().is_empty());
}
