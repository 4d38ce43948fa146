//! Generated CRUD operations end to end.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn create_then_find_and_list() {
    let app = common::setup().await;

    let created = app
        .query(
            r#"mutation { createOneChain(data: { name: "Gnosis", chain_id: "100" }) {
                id name chain_id createdAt updatedAt
            } }"#,
        )
        .await;
    let chain = &created["createOneChain"];
    assert_eq!(chain["name"], "Gnosis");
    assert_eq!(chain["createdAt"], chain["updatedAt"]);

    let found = app.query(r#"{ chain(where: { chain_id: "100" }) { name } }"#).await;
    assert_eq!(found["chain"], json!({ "name": "Gnosis" }));

    let missing = app.query(r#"{ chain(where: { chain_id: "nope" }) { name } }"#).await;
    assert_eq!(missing["chain"], json!(null));

    let listed = app
        .query(r#"{ chains(where: { name: { startsWith: "Gno" } }) { chain_id } }"#)
        .await;
    assert_eq!(listed["chains"], json!([{ "chain_id": "100" }]));
}

#[tokio::test]
async fn defaults_apply_on_create() {
    let app = common::setup().await;
    let data = app
        .query(
            r#"mutation { createOneUser(data: { address: "0xdef", chain_type_id: 1 }) {
                active name chain_type { name }
            } }"#,
        )
        .await;
    assert_eq!(
        data["createOneUser"],
        json!({ "active": true, "name": null, "chain_type": { "name": "ethereum_mainnet" } })
    );
}

#[tokio::test]
async fn big_int_round_trips_as_string() {
    let app = common::setup().await;
    let user = app.user("0xdiscord").await;
    let data = app
        .query(&format!(
            r#"mutation {{ createOneDiscordUser(data: {{ discord_id: "912345678901234567", user_id: {user} }}) {{
                discord_id user {{ address }}
            }} }}"#
        ))
        .await;
    assert_eq!(
        data["createOneDiscordUser"],
        json!({ "discord_id": "912345678901234567", "user": { "address": "0xdiscord" } })
    );
}

#[tokio::test]
async fn update_operations_and_missing_rows() {
    let app = common::setup().await;
    let user = app.user("0xupd").await;
    let guild = app.guild("Alpha").await;
    let member = app.member(user, guild).await;

    let data = app
        .query(&format!(
            r#"mutation {{ updateOneGuildUser(
                where: {{ id: {member} }},
                data: {{ favorite: {{ set: true }}, membership_status_id: {{ set: 2 }} }}
            ) {{ favorite membershipStatus {{ name }} }} }}"#
        ))
        .await;
    assert_eq!(
        data["updateOneGuildUser"],
        json!({ "favorite": true, "membershipStatus": { "name": "Member" } })
    );

    let cleared = app
        .query(&format!(
            r#"mutation {{ updateOneGuildUser(where: {{ id: {member} }}, data: {{ membership_status_id: {{ set: null }} }}) {{
                membershipStatus {{ name }}
            }} }}"#
        ))
        .await;
    assert_eq!(cleared["updateOneGuildUser"]["membershipStatus"], json!(null));

    let errors = app
        .query_errors(r#"mutation { updateOneGuildUser(where: { id: 999 }, data: { favorite: { set: true } }) { id } }"#)
        .await;
    assert_eq!(common::code(&errors[0]).as_deref(), Some("NOT_FOUND"));

    let errors = app
        .query_errors(r#"mutation { deleteOneGuildUser(where: {}) { id } }"#)
        .await;
    assert_eq!(common::code(&errors[0]).as_deref(), Some("BAD_USER_INPUT"));
}

#[tokio::test]
async fn numeric_envelopes_compose() {
    let app = common::setup().await;
    let user = app.user("0xnum").await;
    let contribution = app.contribution(user, "n", 0).await;

    let data = app
        .query(&format!(
            r#"mutation {{ updateOneContribution(where: {{ id: {contribution} }}, data: {{ on_chain_id: {{ set: 10 }} }}) {{ on_chain_id }} }}"#
        ))
        .await;
    assert_eq!(data["updateOneContribution"]["on_chain_id"], json!(10));

    let data = app
        .query(&format!(
            r#"mutation {{ updateOneContribution(where: {{ id: {contribution} }}, data: {{ on_chain_id: {{ increment: 5, multiply: 2 }} }}) {{ on_chain_id }} }}"#
        ))
        .await;
    assert_eq!(data["updateOneContribution"]["on_chain_id"], json!(30));

    let errors = app
        .query_errors(&format!(
            r#"mutation {{ updateOneContribution(where: {{ id: {contribution} }}, data: {{ on_chain_id: {{ divide: 0 }} }}) {{ on_chain_id }} }}"#
        ))
        .await;
    assert_eq!(common::code(&errors[0]).as_deref(), Some("BAD_USER_INPUT"));

    let data = app
        .query(&format!(
            r#"query {{ contribution(where: {{ id: {contribution} }}) {{ on_chain_id }} }}"#
        ))
        .await;
    assert_eq!(data["contribution"]["on_chain_id"], json!(30));
}

#[tokio::test]
async fn many_operations_report_affected_rows() {
    let app = common::setup().await;

    let created = app
        .query(
            r#"mutation { createManyGuild(data: [{ name: "A" }, { name: "B" }, { name: "C" }]) { count } }"#,
        )
        .await;
    assert_eq!(created["createManyGuild"], json!({ "count": 3 }));

    let updated = app
        .query(
            r#"mutation { updateManyGuild(where: { name: { in: ["A", "B"] } }, data: { logo: { set: "x.png" } }) { count } }"#,
        )
        .await;
    assert_eq!(updated["updateManyGuild"], json!({ "count": 2 }));

    let deleted = app
        .query(r#"mutation { deleteManyGuild(where: { logo: { isNull: true } }) { count } }"#)
        .await;
    assert_eq!(deleted["deleteManyGuild"], json!({ "count": 1 }));
    assert_eq!(app.count("guild").await, 2);
}

#[tokio::test]
async fn create_many_is_atomic() {
    let app = common::setup().await;
    let errors = app
        .query_errors(
            r#"mutation { createManyChain(data: [{ name: "a", chain_id: "1" }, { name: "b", chain_id: "1" }]) { count } }"#,
        )
        .await;
    assert_eq!(common::code(&errors[0]).as_deref(), Some("CONSTRAINT_VIOLATION"));
    assert_eq!(app.count("chain").await, 0);
}

#[tokio::test]
async fn deletes_follow_ownership() {
    let app = common::setup().await;
    let user = app.user("0xown").await;
    let attester = app.user("0xatt").await;
    let guild = app.guild("Alpha").await;
    let contribution = app.contribution(user, "owned", 0).await;
    app.member(user, guild).await;
    app.link(guild, contribution).await;
    app.attestation(attester, contribution).await;

    let errors = app
        .query_errors(&format!("mutation {{ deleteOneUser(where: {{ id: {user} }}) {{ id }} }}"))
        .await;
    assert_eq!(common::code(&errors[0]).as_deref(), Some("CONSTRAINT_VIOLATION"));

    app.query(&format!("mutation {{ deleteOneGuild(where: {{ id: {guild} }}) {{ id }} }}"))
        .await;
    assert_eq!(app.count("guild_user").await, 0);
    assert_eq!(app.count("guild_contribution").await, 0);

    app.query(&format!(
        "mutation {{ deleteOneContribution(where: {{ id: {contribution} }}) {{ id }} }}"
    ))
    .await;
    assert_eq!(app.count("attestation").await, 0);
    assert_eq!(app.count("user").await, 2);
}

#[tokio::test]
async fn updated_at_is_refreshed_unless_set() {
    let app = common::setup().await;
    let guild = app.guild("Alpha").await;

    let data = app
        .query(&format!(
            r#"mutation {{ updateOneGuild(where: {{ id: {guild} }}, data: {{ updatedAt: {{ set: "2020-01-01T00:00:00Z" }} }}) {{ updatedAt }} }}"#
        ))
        .await;
    assert_eq!(data["updateOneGuild"]["updatedAt"], json!("2020-01-01T00:00:00Z"));

    let data = app
        .query(&format!(
            r#"mutation {{ updateOneGuild(where: {{ id: {guild} }}, data: {{ name: {{ set: "Renamed" }} }}) {{ name updatedAt }} }}"#
        ))
        .await;
    assert_eq!(data["updateOneGuild"]["name"], "Renamed");
    assert_ne!(data["updateOneGuild"]["updatedAt"], json!("2020-01-01T00:00:00Z"));
}

#[tokio::test]
async fn recent_days_filters_and_rejects_out_of_range() {
    let app = common::setup().await;
    let user = app.user("0xabc").await;
    let fresh = app.contribution(user, "fresh", 0).await;
    let stale = app.contribution(user, "stale", 0).await;
    sqlx::query("UPDATE contribution SET created_at = '2001-01-01T00:00:00.000Z' WHERE id = ?")
        .bind(stale)
        .execute(app.db.pool())
        .await
        .unwrap();

    let recent = r#"{ contributions(where: { createdAt: { recentDays: 7 } }) { id createdAt } }"#;
    let data = app.query(recent).await;
    assert_eq!(data["contributions"].as_array().unwrap().len(), 1);
    assert_eq!(data["contributions"][0]["id"], json!(fresh));
    assert!(data["contributions"][0]["createdAt"].as_str().unwrap().ends_with('Z'));

    let errors = app
        .query_errors(r#"{ contributions(where: { createdAt: { recentDays: 2000000000 } }) { id } }"#)
        .await;
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0].message.contains("less than or equal to 36500"),
        "{}",
        errors[0].message
    );

    // The schema keeps serving after the rejected request
    let data = app.query(recent).await;
    assert_eq!(data["contributions"][0]["id"], json!(fresh));
}
