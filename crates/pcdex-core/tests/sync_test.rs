// End-to-end tests for the cache + binding layer against a mock server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{any, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pcdex_api::{InventoryClient, TransportConfig};
use pcdex_core::{
    Inventory, MutationCallbacks, NotesUpdate, PcId, PcListParams, TagAssignment, TagCreate, TagId,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Inventory) {
    let server = MockServer::start().await;
    let client = InventoryClient::new(&server.uri(), &TransportConfig::default())
        .expect("mock server URI should parse");
    (server, Inventory::with_client(client))
}

fn pc_body(id: &str, notes: &str, tags: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "host": "atlas",
        "serial": "SN-900123",
        "cpu": "Ryzen 5 3600",
        "mainboard": "B450 Tomahawk",
        "resolution": "2560x1440",
        "ram_total_gb": 32,
        "ram_slots": "2/4",
        "submitted_at": "2025-06-01 10:00:00",
        "notes": notes,
        "gpus": [],
        "ram_sticks": [],
        "disks": [],
        "tags": tags
    })
}

fn list_row(id: &str, tags: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "host": "atlas",
        "cpu": "Ryzen 5 3600",
        "ram_total_gb": 32,
        "submitted_at": "2025-06-01 10:00:00",
        "tags": tags
    })
}

// ── §8: get-then-list field agreement ───────────────────────────────

#[tokio::test]
async fn test_get_then_list_fields_agree() {
    let (server, inv) = setup().await;

    Mock::given(method("GET"))
        .and(path("/pc/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pc_body("a1", "", json!([]))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pcs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([list_row("a1", json!([]))])))
        .mount(&server)
        .await;

    let pc = inv.pc(&PcId::from("a1")).await.expect("get should succeed");
    let rows = inv.pcs(&PcListParams::default()).await.expect("list should succeed");

    let row = rows.iter().find(|r| r.id == pc.id).expect("row for the fetched pc");
    assert_eq!(row.host, pc.host);
    assert_eq!(row.cpu, pc.cpu);
    assert_eq!(row.ram_total_gb, pc.ram_total_gb);
    assert_eq!(row.submitted_at, pc.submitted_at);
}

// ── §8: concurrent double-subscription, one network call ────────────

#[tokio::test]
async fn test_concurrent_subscriptions_share_one_request() {
    let (server, inv) = setup().await;

    Mock::given(method("GET"))
        .and(path("/pcs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([list_row("a1", json!([]))])))
        .expect(1)
        .mount(&server)
        .await;

    let q1 = inv.pcs_query(PcListParams::default());
    let q2 = inv.pcs_query(PcListParams::default());

    let (s1, s2) = tokio::join!(q1.resolve(), q2.resolve());

    let d1 = s1.data.expect("first subscriber should have data");
    let d2 = s2.data.expect("second subscriber should have data");
    assert!(Arc::ptr_eq(&d1, &d2), "both subscribers should see the same resolved value");

    // A third read is served from cache; the expect(1) above verifies
    // no extra request went out when the server drops.
    let again = inv.pcs(&PcListParams::default()).await.expect("cached read");
    assert!(Arc::ptr_eq(&d1, &again));
}

#[tokio::test]
async fn test_refetch_goes_back_to_the_network() {
    let (server, inv) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let query = inv.tags_query();
    query.resolve().await;
    query.resolve().await; // fresh hit, no request
    query.refetch().await; // stale-marked, second request
}

// ── §8: notes update (optimistic patch + invalidation) ──────────────

#[tokio::test]
async fn test_notes_update_lands_and_refetch_sees_no_stale_value() {
    let (server, inv) = setup().await;

    Mock::given(method("GET"))
        .and(path("/pc/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pc_body("a1", "old", json!([]))))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pc/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pc_body("a1", "new", json!([]))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/update_notes"))
        .and(body_json(json!({ "pc_id": "a1", "notes": "new" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pc_id": "a1" })))
        .mount(&server)
        .await;

    let id = PcId::from("a1");
    let pc = inv.pc(&id).await.expect("initial fetch");
    assert_eq!(pc.notes.as_deref(), Some("old"));

    inv.update_notes()
        .trigger(NotesUpdate {
            pc_id: id.clone(),
            notes: "new".into(),
        })
        .await
        .expect("update should succeed");

    // Confirmed value is in the cache immediately, marked for refetch.
    let entry = inv.cache().pc(&id).expect("entry should remain cached");
    assert_eq!(entry.value.notes.as_deref(), Some("new"));
    assert!(!entry.is_fresh());

    // The refetch resolves to the authoritative value; no stale notes.
    let pc = inv.pc(&id).await.expect("refetch");
    assert_eq!(pc.notes.as_deref(), Some("new"));
    assert!(inv.cache().pc(&id).expect("cached").is_fresh());
}

#[tokio::test]
async fn test_failed_notes_update_rolls_back_the_optimistic_patch() {
    let (server, inv) = setup().await;

    Mock::given(method("GET"))
        .and(path("/pc/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pc_body("a1", "old", json!([]))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/update_notes"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
        .mount(&server)
        .await;

    let id = PcId::from("a1");
    inv.pc(&id).await.expect("initial fetch");

    let err = inv
        .update_notes()
        .trigger(NotesUpdate {
            pc_id: id.clone(),
            notes: "new".into(),
        })
        .await
        .expect_err("update must fail");
    assert_eq!(err.status(), Some(500));

    // Cache untouched: old value, still fresh.
    let entry = inv.cache().pc(&id).expect("entry should remain cached");
    assert_eq!(entry.value.notes.as_deref(), Some("old"));
    assert!(entry.is_fresh());
}

#[tokio::test]
async fn test_empty_id_notes_update_issues_zero_requests() {
    let (server, inv) = setup().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let order = Arc::new(Mutex::new(Vec::new()));
    let on_error_order = Arc::clone(&order);
    let on_settled_order = Arc::clone(&order);

    let err = inv
        .update_notes()
        .trigger_with(
            NotesUpdate {
                pc_id: PcId::from(""),
                notes: "x".into(),
            },
            MutationCallbacks::new()
                .on_success(|_| panic!("must not succeed"))
                .on_error(move |_| on_error_order.lock().expect("lock").push("error"))
                .on_settled(move || on_settled_order.lock().expect("lock").push("settled")),
        )
        .await
        .expect_err("empty id must fail");

    assert!(err.is_invalid_argument());
    assert_eq!(*order.lock().expect("lock"), vec!["error", "settled"]);
}

// ── §8: tag deletion cascade ────────────────────────────────────────

#[tokio::test]
async fn test_deleted_tag_disappears_from_cache_and_subsequent_fetches() {
    let (server, inv) = setup().await;

    let lab = json!({ "id": 1, "name": "lab", "color": "#228BE6" });
    let keep = json!({ "id": 2, "name": "keep", "color": "#40C057" });

    Mock::given(method("GET"))
        .and(path("/pc/a1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(pc_body("a1", "", json!([lab, keep]))),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pcs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([list_row(
            "a1",
            json!([{ "name": "lab", "color": "#228BE6" }, { "name": "keep", "color": "#40C057" }])
        )])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pcs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!([list_row("a1", json!([{ "name": "keep", "color": "#40C057" }]))]),
        ))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/tags/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .mount(&server)
        .await;

    let id = PcId::from("a1");
    inv.pc(&id).await.expect("prime detail");
    inv.pcs(&PcListParams::default()).await.expect("prime list");

    let lab_tag = pcdex_core::Tag {
        id: TagId::new(1),
        name: "lab".into(),
        color: "#228BE6".into(),
    };
    inv.delete_tag().trigger(lab_tag).await.expect("delete should succeed");

    // Cascade: the cached record lost the tag immediately.
    let entry = inv.cache().pc(&id).expect("cached record");
    assert!(!entry.value.has_tag(TagId::new(1)));
    assert!(entry.value.has_tag(TagId::new(2)));

    // Subsequent list fetch (stale-marked, so it hits the network)
    // contains no trace of the deleted tag.
    let rows = inv.pcs(&PcListParams::default()).await.expect("refetched list");
    assert!(rows[0].tags.iter().all(|b| b.name != "lab"));
}

// ── §8: tag add/remove round-trip ───────────────────────────────────

#[tokio::test]
async fn test_tag_add_then_remove_restores_the_id_set() {
    let (server, inv) = setup().await;
    let id = PcId::from("a1");

    Mock::given(method("GET"))
        .and(path("/pc/a1/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pc/a1/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 3, "name": "lab", "color": "#228BE6" }
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pc/a1/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pc/a1/tags"))
        .and(body_json(json!({ "tag_id": 3 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/pc/a1/tags/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .mount(&server)
        .await;

    let before: Vec<TagId> = inv.pc_tags(&id).await.expect("initial").iter().map(|t| t.id).collect();

    let assign = TagAssignment {
        pc_id: id.clone(),
        tag_id: TagId::new(3),
    };
    inv.add_tag().trigger(assign.clone()).await.expect("add should succeed");

    let mid: Vec<TagId> = inv.pc_tags(&id).await.expect("after add").iter().map(|t| t.id).collect();
    assert_eq!(mid, vec![TagId::new(3)]);

    inv.remove_tag().trigger(assign).await.expect("remove should succeed");

    let after: Vec<TagId> =
        inv.pc_tags(&id).await.expect("after remove").iter().map(|t| t.id).collect();
    assert_eq!(after, before);
}

// ── Deletion semantics ──────────────────────────────────────────────

#[tokio::test]
async fn test_pc_delete_removes_entry_only_after_confirmation() {
    let (server, inv) = setup().await;
    let id = PcId::from("a1");

    Mock::given(method("GET"))
        .and(path("/pc/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pc_body("a1", "", json!([]))))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/pc/a1/delete"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "locked" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/pc/a1/delete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pc_id": "a1" })))
        .mount(&server)
        .await;

    inv.pc(&id).await.expect("prime detail");

    // Failed delete: nothing removed, nothing staled.
    inv.delete_pc().trigger(id.clone()).await.expect_err("first delete must fail");
    assert!(inv.cache().pc(&id).expect("still cached").is_fresh());

    // Confirmed delete: entry gone.
    let deleted = inv.delete_pc().trigger(id.clone()).await.expect("second delete succeeds");
    assert_eq!(deleted.pc_id, id);
    assert!(inv.cache().pc(&id).is_none());
}

// ── Mutation callbacks observe post-mutation cache state ────────────

#[tokio::test]
async fn test_on_success_sees_the_cache_after_invalidation() {
    let (server, inv) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tags"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "id": 9, "name": "new", "color": "#228BE6" })),
        )
        .mount(&server)
        .await;

    inv.tags().await.expect("prime tag list");
    assert!(inv.cache().tag_list().expect("cached").is_fresh());

    let observed_stale = Arc::new(Mutex::new(false));
    let observer = Arc::clone(&observed_stale);
    let cache_view = inv.clone();

    inv.create_tag()
        .trigger_with(
            TagCreate {
                name: "new".into(),
                color: "#228BE6".into(),
            },
            MutationCallbacks::new().on_success(move |_| {
                let stale = cache_view
                    .cache()
                    .tag_list()
                    .is_some_and(|entry| !entry.is_fresh());
                *observer.lock().expect("lock") = stale;
            }),
        )
        .await
        .expect("create should succeed");

    assert!(
        *observed_stale.lock().expect("lock"),
        "on_success must observe the already-invalidated tag list"
    );
}

// ── Background refetch on invalidation ──────────────────────────────

#[tokio::test]
async fn test_subscribed_query_refetches_in_the_background() {
    let (server, inv) = setup().await;

    Mock::given(method("GET"))
        .and(path("/pcs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([list_row("a1", json!([]))])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pcs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            list_row("a1", json!([])),
            list_row("b2", json!([]))
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pc/a1/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .mount(&server)
        .await;

    let query = inv.pcs_query(PcListParams::default());
    query.resolve().await;
    assert_eq!(query.data().expect("resolved").len(), 1);

    let refresher = query.spawn_refetch();
    let mut states = query.subscribe();

    // Any tag association change invalidates every list query.
    inv.add_tag()
        .trigger(TagAssignment {
            pc_id: PcId::from("a1"),
            tag_id: TagId::new(3),
        })
        .await
        .expect("add should succeed");

    let refreshed = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            states.changed().await.expect("query state sender alive");
            let state = states.borrow_and_update().clone();
            if let Some(rows) = state.data {
                if rows.len() == 2 {
                    break;
                }
            }
        }
    })
    .await;
    assert!(refreshed.is_ok(), "background refetch should deliver the new list");

    inv.shutdown();
    refresher.await.expect("refresh task should exit cleanly");
}

// ── Failing queries surface state, keep prior data ──────────────────

#[tokio::test]
async fn test_query_error_state_keeps_prior_data() {
    let (server, inv) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "lab", "color": "#228BE6" }
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let query = inv.tags_query();
    let state = query.resolve().await;
    assert!(!state.is_error);
    assert_eq!(state.data.expect("data").len(), 1);

    let state = query.refetch().await;
    assert!(state.is_error);
    assert_eq!(state.error.expect("error").status(), Some(500));
    // Prior data stays visible alongside the error.
    assert_eq!(state.data.expect("prior data").len(), 1);
}
