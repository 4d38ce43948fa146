//! Relation resolution through the GraphQL schema and the ORM helpers.

mod common;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use protocol_api::error::ApiError;
use protocol_api::graphql::entities::*;
use protocol_api::graphql::orm::FindManyArgs;
use protocol_api::graphql::orm::relations;
use serde_json::json;

#[tokio::test]
async fn relation_results_follow_declared_nullability() {
    let app = common::setup().await;
    let user = app.user("0x01").await;
    let contribution = app.contribution(user, "Docs", 0).await;

    let data = app
        .query(&format!(
            "{{ contribution(where: {{ id: {contribution} }}) {{
                user {{ id address }}
                status {{ name }}
                chain {{ id }}
                linear_issue {{ id }}
            }} }}"
        ))
        .await;

    assert_eq!(
        data["contribution"],
        json!({
            "user": { "id": user, "address": "0x01" },
            "status": { "name": "staging" },
            "chain": null,
            "linear_issue": null,
        })
    );

    let sdl = app.schema.sdl();
    assert!(sdl.contains("user: User!"));
    assert!(sdl.contains("chain: Chain\n"));
    assert!(sdl.contains("twitter_user: TwitterUser\n"));
}

#[tokio::test]
async fn take_limits_to_many_relation_in_default_order() {
    let app = common::setup().await;
    let author = app.user("0xauthor").await;
    let attester = app.user("0xattester").await;

    let mut expected = Vec::new();
    for i in 0..7 {
        let contribution = app.contribution(author, &format!("c{i}"), i).await;
        expected.push(app.attestation(attester, contribution).await);
    }

    let data = app
        .query(&format!(
            "{{ user(where: {{ id: {attester} }}) {{ attestations(take: 5) {{ id }} }} }}"
        ))
        .await;

    let ids: Vec<i64> = data["user"]["attestations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, expected[..5].to_vec());
}

#[tokio::test]
async fn to_many_relation_honours_order_and_cursor() {
    let app = common::setup().await;
    let user = app.user("0x02").await;
    let first = app.contribution(user, "a", 3).await;
    let second = app.contribution(user, "b", 2).await;
    let third = app.contribution(user, "c", 1).await;

    let data = app
        .query(&format!(
            "{{ user(where: {{ id: {user} }}) {{
                newest: contributions(orderBy: [{{ date_of_engagement: desc }}]) {{ id }}
                after: contributions(cursor: {{ id: {second} }}, skip: 1) {{ id }}
            }} }}"
        ))
        .await;

    assert_eq!(
        data["user"]["newest"],
        json!([{ "id": third }, { "id": second }, { "id": first }])
    );
    assert_eq!(data["user"]["after"], json!([{ "id": third }]));
}

#[tokio::test]
async fn relation_count_reports_each_to_many_relation() {
    let app = common::setup().await;
    let user = app.user("0x03").await;
    let guild = app.guild("Alpha").await;
    app.member(user, guild).await;
    app.contribution(user, "a", 0).await;
    app.contribution(user, "b", 0).await;

    let data = app
        .query(&format!(
            "{{ user(where: {{ id: {user} }}) {{ _count {{ contributions guild_users attestations }} }} }}"
        ))
        .await;

    assert_eq!(
        data["user"]["_count"],
        json!({ "contributions": 2, "guild_users": 1, "attestations": 0 })
    );
}

#[tokio::test]
async fn missing_root_is_not_found() {
    let app = common::setup().await;
    let pool = app.db.pool();

    let many = relations::has_many::<User, Attestation, _, _, _>(
        pool,
        999,
        "user_id",
        &FindManyArgs::<AttestationWhereInput, AttestationWhereUniqueInput, AttestationOrderByInput>::default(),
    )
    .await;
    assert_matches!(many, Err(ApiError::NotFound { .. }));

    let one = relations::belongs_to::<Contribution, Chain>(pool, 999, "chain_id").await;
    assert_matches!(one, Err(ApiError::NotFound { .. }));

    let has_one = relations::has_one::<User, TwitterUser>(pool, 999, "user_id").await;
    assert_matches!(has_one, Err(ApiError::NotFound { .. }));
}

#[tokio::test]
async fn root_deleted_between_fetch_and_relation_is_not_found() {
    let app = common::setup().await;
    let user = app.user("0x04").await;
    let contribution = app.contribution(user, "gone", 0).await;

    let loaded = protocol_api::graphql::orm::crud::find_unique::<Contribution, _>(
        app.db.pool(),
        &ContributionWhereUniqueInput {
            id: Some(contribution as i32),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    sqlx::query("DELETE FROM contribution WHERE id = ?")
        .bind(contribution)
        .execute(app.db.pool())
        .await
        .unwrap();

    let result = relations::belongs_to_required::<Contribution, User>(
        app.db.pool(),
        i64::from(loaded.id),
        "user_id",
    )
    .await;
    assert_matches!(result, Err(ApiError::NotFound { .. }));
}

#[tokio::test]
async fn relation_filters_select_through_links() {
    let app = common::setup().await;
    let user = app.user("0x05").await;
    let alpha = app.guild("Alpha").await;
    let beta = app.guild("Beta").await;
    let in_alpha = app.contribution(user, "alpha work", 0).await;
    let in_beta = app.contribution(user, "beta work", 0).await;
    let unattributed = app.contribution(user, "loose", 0).await;
    app.link(alpha, in_alpha).await;
    app.link(beta, in_beta).await;

    let data = app
        .query(&format!(
            "{{
                alpha: contributions(where: {{ guilds: {{ some: {{ guild: {{ is: {{ id: {{ equals: {alpha} }} }} }} }} }} }}) {{ id }}
                none: contributions(where: {{ guilds: {{ none: {{}} }} }}) {{ id }}
                by_name: contributions(where: {{ user: {{ is: {{ address: {{ equals: \"0x05\" }} }} }}, name: {{ contains: \"work\" }} }}) {{ id }}
            }}"
        ))
        .await;

    assert_eq!(data["alpha"], json!([{ "id": in_alpha }]));
    assert_eq!(data["none"], json!([{ "id": unattributed }]));
    assert_eq!(data["by_name"], json!([{ "id": in_alpha }, { "id": in_beta }]));
}
