//! Typed client against the real router on an ephemeral port.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use protocol_api::client::{
    BulkDaoAttributeFormValues, BulkDaoAttribution, ClientError, ErrorKind, ProtocolClient,
    dao_select_options, recent_contributions_for_dao,
};
use protocol_api::graphql::{AppState, router};

async fn serve(app: &common::TestApp) -> ProtocolClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState {
        schema: app.schema.clone(),
        db: app.db.clone(),
    };
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    ProtocolClient::new(&format!("http://{addr}"))
}

async fn guild_links(app: &common::TestApp, contribution: i64) -> Vec<i64> {
    sqlx::query_scalar("SELECT guild_id FROM guild_contribution WHERE contribution_id = ?")
        .bind(contribution)
        .fetch_all(app.db.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn bulk_attribution_sends_one_mutation_per_contribution() {
    let app = common::setup().await;
    let client = serve(&app).await;
    let user = app.user("0xbulk").await;
    let dao = app.guild("Answer").await;
    let mut ids = Vec::new();
    for i in 0..3 {
        ids.push(app.contribution(user, &format!("c{i}"), i).await);
    }

    let bulk = BulkDaoAttribution::new(Arc::new(client));
    let progress = bulk.subscribe();
    let contribution_ids: Vec<i32> = ids.iter().map(|&id| id as i32).collect();
    let outcome = bulk
        .run(&contribution_ids, &BulkDaoAttributeFormValues { dao_id: Some(dao as i32) })
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.succeeded, contribution_ids);
    assert!(!progress.borrow().is_loading());
    assert_eq!(progress.borrow().completed, 3);
    for id in ids {
        assert_eq!(guild_links(&app, id).await, vec![dao]);
    }
}

#[tokio::test]
async fn bulk_attribution_on_a_pooled_file_database() {
    let app = common::setup_file().await;
    let client = Arc::new(serve(&app).await);
    let user = app.user("0xpool").await;
    let dao = app.guild("Pooled").await;
    let mut ids = Vec::new();
    for i in 0..12 {
        ids.push(app.contribution(user, &format!("p{i}"), i).await);
    }
    let contribution_ids: Vec<i32> = ids.iter().map(|&id| id as i32).collect();

    for _ in 0..3 {
        let outcome = BulkDaoAttribution::new(client.clone())
            .run(&contribution_ids, &BulkDaoAttributeFormValues { dao_id: Some(dao as i32) })
            .await
            .unwrap();
        assert!(outcome.is_success(), "failed: {:?}", outcome.failed);
    }
    for id in ids {
        assert_eq!(guild_links(&app, id).await, vec![dao]);
    }
}

#[tokio::test]
async fn bulk_attribution_commits_the_rest_when_one_fails() {
    let app = common::setup().await;
    let client = serve(&app).await;
    let user = app.user("0xpartial").await;
    let dao = app.guild("Alpha").await;
    let good_a = app.contribution(user, "a", 0).await;
    let good_b = app.contribution(user, "b", 0).await;
    let missing = 9_999;

    let bulk = BulkDaoAttribution::new(Arc::new(client));
    let outcome = bulk
        .run(
            &[good_a as i32, missing, good_b as i32],
            &BulkDaoAttributeFormValues { dao_id: Some(dao as i32) },
        )
        .await
        .unwrap();

    assert!(!outcome.is_success());
    assert_eq!(outcome.succeeded, vec![good_a as i32, good_b as i32]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].0, missing);
    assert_eq!(outcome.failed[0].1.kind(), ErrorKind::NotFound);
    assert_eq!(guild_links(&app, good_a).await, vec![dao]);
    assert_eq!(guild_links(&app, good_b).await, vec![dao]);
}

#[tokio::test]
async fn infinite_list_pages_by_cursor() {
    let app = common::setup().await;
    let client = serve(&app).await;
    let user = app.user("0xpager").await;
    let dao = app.guild("Pager").await;
    let mut expected = Vec::new();
    for i in 0..12 {
        let id = app.contribution(user, &format!("c{i}"), i).await;
        app.link(dao, id).await;
        expected.push(id as i32);
    }
    app.contribution(user, "elsewhere", 0).await;

    let mut list = recent_contributions_for_dao(client, dao as i32);
    let first: Vec<i32> = list.fetch_next_page().await.unwrap().unwrap().iter().map(|c| c.id).collect();
    assert_eq!(first, expected[..10].to_vec());
    assert!(list.has_next_page());

    let second: Vec<i32> = list.fetch_next_page().await.unwrap().unwrap().iter().map(|c| c.id).collect();
    assert_eq!(second, expected[10..].to_vec());
    assert!(!list.has_next_page());
    assert!(list.fetch_next_page().await.unwrap().is_none());
    assert_eq!(list.items().count(), 12);
}

#[tokio::test]
async fn dao_options_lead_with_no_dao() {
    let app = common::setup().await;
    let client = serve(&app).await;
    let user = app.user("0xmember").await;
    let alpha = app.guild("Alpha").await;
    app.guild("Other").await;
    app.member(user, alpha).await;

    let options = dao_select_options(&client, user as i32).await.unwrap();
    let labels: Vec<(Option<i32>, &str)> = options.iter().map(|o| (o.value, o.label.as_str())).collect();
    assert_eq!(labels, vec![(None, "No DAO"), (Some(alpha as i32), "Alpha")]);
}

#[tokio::test]
async fn server_errors_keep_their_kind() {
    let app = common::setup().await;
    let client = serve(&app).await;

    let err = client.attribute_contribution(404, None).await.unwrap_err();
    assert_matches!(err, ClientError::Api { kind: ErrorKind::NotFound, .. });
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let client = ProtocolClient::new("http://127.0.0.1:9");
    let err = client.list_daos(None).await.unwrap_err();
    assert_matches!(err, ClientError::Transport(_));
    assert_eq!(err.kind(), ErrorKind::TransientIo);
}
