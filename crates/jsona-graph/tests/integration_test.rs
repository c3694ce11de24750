use jsona_graph::mock::{MapperCall, RecordingMapper};
use jsona_graph::{
    deserialize, deserialize_str, Deserialized, Document, JsonDeserializer, ModelGraph, Related,
    ResourceId,
};
use serde_json::json;

fn document(value: serde_json::Value) -> Document {
    Document::from_value(value).expect("valid document")
}

// --- Identity ---

#[test]
fn test_same_entity_resolves_to_one_model() {
    let doc = document(json!({
        "data": {
            "type": "articles", "id": "1",
            "relationships": {
                "author": { "data": { "type": "people", "id": "9" } },
                "reviewer": { "data": { "type": "people", "id": "9" } }
            }
        },
        "included": [
            { "type": "people", "id": "9", "attributes": { "name": "Dan" } }
        ]
    }));

    let mut graph = ModelGraph::new();
    let article = *deserialize(&doc, &mut graph).unwrap().one().unwrap();

    let author = graph.related(article, "author").and_then(Related::one);
    let reviewer = graph.related(article, "reviewer").and_then(Related::one);
    assert!(author.is_some());
    assert_eq!(author, reviewer);
    assert_eq!(graph.len(), 2);
}

#[test]
fn test_included_entity_is_described_once() {
    let doc = document(json!({
        "data": [
            { "type": "comments", "id": "1",
              "relationships": { "author": { "data": { "type": "people", "id": "2" } } } },
            { "type": "comments", "id": "2",
              "relationships": { "author": { "data": { "type": "people", "id": "2" } } } }
        ],
        "included": [
            { "type": "people", "id": "2", "attributes": { "name": "Ann" } }
        ]
    }));

    let mut mapper = RecordingMapper::new();
    let comments = deserialize(&doc, &mut mapper).unwrap().into_vec();

    let first = mapper.relationships_of(comments[0]).unwrap()["author"].clone();
    let second = mapper.relationships_of(comments[1]).unwrap()["author"].clone();
    assert_eq!(first, second);

    let person = *first.one().unwrap();
    let attribute_writes = mapper
        .calls_for(person)
        .into_iter()
        .filter(|call| matches!(call, MapperCall::SetAttributes { .. }))
        .count();
    assert_eq!(attribute_writes, 1);
    assert_eq!(mapper.created(), 3);
}

#[test]
fn test_reference_seen_before_description_is_populated_in_place() {
    // The first article references the second before the collection reaches it.
    let doc = document(json!({
        "data": [
            { "type": "articles", "id": "1", "attributes": { "title": "Part one" },
              "relationships": { "next": { "data": { "type": "articles", "id": "2" } } } },
            { "type": "articles", "id": "2", "attributes": { "title": "Part two" },
              "relationships": { "previous": { "data": { "type": "articles", "id": "1" } } } }
        ]
    }));

    let mut graph = ModelGraph::new();
    let articles = deserialize(&doc, &mut graph).unwrap().into_vec();
    assert_eq!(articles.len(), 2);
    assert_eq!(graph.len(), 2);

    let next = graph.related(articles[0], "next").and_then(Related::one);
    assert_eq!(next, Some(&articles[1]));
    assert_eq!(graph.node(articles[1]).attributes["title"], "Part two");
    let previous = graph.related(articles[1], "previous").and_then(Related::one);
    assert_eq!(previous, Some(&articles[0]));
}

#[test]
fn test_resources_without_identity_are_never_shared() {
    let doc = document(json!({
        "data": [
            { "type": "drafts", "attributes": { "title": "a" } },
            { "type": "drafts", "attributes": { "title": "a" } }
        ]
    }));

    let mut mapper = RecordingMapper::new();
    let drafts = deserialize(&doc, &mut mapper).unwrap().into_vec();
    assert_eq!(drafts, vec![1, 2]);
    assert!(!mapper
        .calls()
        .iter()
        .any(|call| matches!(call, MapperCall::SetId { .. })));
}

// --- Cycles ---

#[test]
fn test_mutual_references_form_a_true_cycle() {
    let doc = document(json!({
        "data": {
            "type": "people", "id": "1", "attributes": { "name": "Alice" },
            "relationships": { "friend": { "data": { "type": "people", "id": "2" } } }
        },
        "included": [{
            "type": "people", "id": "2", "attributes": { "name": "Bob" },
            "relationships": { "friend": { "data": { "type": "people", "id": "1" } } }
        }]
    }));

    let mut graph = ModelGraph::new();
    let alice = *deserialize(&doc, &mut graph).unwrap().one().unwrap();
    let bob = *graph.related(alice, "friend").unwrap().one().unwrap();

    assert_eq!(graph.related(bob, "friend").unwrap().one(), Some(&alice));
    assert_eq!(graph.node(bob).attributes["name"], "Bob");
    assert_eq!(graph.len(), 2);
}

#[test]
fn test_cycle_through_included_only_resources_terminates() {
    // Both ends of the cycle are fully described in `included`.
    let doc = document(json!({
        "data": { "type": "folders", "id": "root",
                  "relationships": { "child": { "data": { "type": "folders", "id": "a" } } } },
        "included": [
            { "type": "folders", "id": "a", "attributes": { "name": "a" },
              "relationships": { "sibling": { "data": { "type": "folders", "id": "b" } } } },
            { "type": "folders", "id": "b", "attributes": { "name": "b" },
              "relationships": { "sibling": { "data": { "type": "folders", "id": "a" } } } }
        ]
    }));

    let mut graph = ModelGraph::new();
    let root = *deserialize(&doc, &mut graph).unwrap().one().unwrap();
    let a = *graph.related(root, "child").unwrap().one().unwrap();
    let b = *graph.related(a, "sibling").unwrap().one().unwrap();
    assert_eq!(graph.related(b, "sibling").unwrap().one(), Some(&a));
    assert_eq!(graph.len(), 3);
}

#[test]
fn test_self_reference() {
    let doc = document(json!({
        "data": { "type": "people", "id": "1",
                  "relationships": { "manager": { "data": { "type": "people", "id": "1" } } } }
    }));

    let mut graph = ModelGraph::new();
    let boss = *deserialize(&doc, &mut graph).unwrap().one().unwrap();
    assert_eq!(graph.related(boss, "manager").unwrap().one(), Some(&boss));
}

// --- Shape ---

#[test]
fn test_single_object_is_not_wrapped() {
    let mut mapper = RecordingMapper::new();
    let result = deserialize_str(r#"{"data": {"type": "posts", "id": "1"}}"#, &mut mapper).unwrap();
    assert_eq!(result, Some(Deserialized::One(1)));
}

#[test]
fn test_collection_keeps_order_and_omits_gaps() {
    let doc = document(json!({
        "data": [
            { "type": "posts", "id": "3" },
            null,
            { "type": "tags", "id": "1" },
            { "type": "posts", "id": "1" }
        ]
    }));

    let mut graph = ModelGraph::accepting(["posts"]);
    let posts = match deserialize(&doc, &mut graph) {
        Some(Deserialized::Many(posts)) => posts,
        other => panic!("expected a collection, got {other:?}"),
    };
    let ids: Vec<String> = posts
        .iter()
        .map(|post| graph.node(*post).id.as_ref().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["3", "1"]);
}

#[test]
fn test_empty_collection_stays_a_collection() {
    let mut graph = ModelGraph::new();
    let result = deserialize_str(r#"{"data": []}"#, &mut graph).unwrap();
    assert_eq!(result, Some(Deserialized::Many(vec![])));
}

#[test]
fn test_absent_null_or_declined_primary_data_is_nothing() {
    let mut graph = ModelGraph::accepting(["posts"]);
    assert_eq!(deserialize_str(r#"{"meta": {}}"#, &mut graph).unwrap(), None);
    assert_eq!(deserialize_str(r#"{"data": null}"#, &mut graph).unwrap(), None);
    assert_eq!(deserialize_str(r#"{"data": 42}"#, &mut graph).unwrap(), None);
    assert_eq!(
        deserialize_str(r#"{"data": {"type": "tags", "id": "1"}}"#, &mut graph).unwrap(),
        None
    );
    assert!(graph.is_empty());
}

/// A malformed collection entry is skipped like a `null` one; its neighbours survive.
#[test]
fn test_malformed_collection_entry_skips_only_that_entry() {
    let json = r#"{
        "data": [
            { "type": "posts", "id": "1", "attributes": { "title": "first" } },
            { "type": "posts", "id": "2", "attributes": { "title": "second" } },
            { "type": "posts", "id": "3", "relationships": { "tags": "oops" } }
        ]
    }"#;

    let mut graph = ModelGraph::new();
    let Some(Deserialized::Many(posts)) = deserialize_str(json, &mut graph).unwrap() else {
        panic!("expected a collection");
    };
    assert_eq!(posts.len(), 2);
    assert_eq!(graph.node(posts[0]).attributes["title"], "first");
    assert_eq!(graph.node(posts[1]).attributes["title"], "second");
    assert!(graph.find("posts", "3").is_none());
}

/// A malformed included item is left out of the pool; references to it fall back to stubs.
#[test]
fn test_malformed_included_item_does_not_fail_document() {
    let json = r#"{
        "data": {
            "type": "posts", "id": "1",
            "relationships": {
                "author": { "data": { "type": "people", "id": "9" } },
                "editor": { "data": { "type": "people", "id": "10" } }
            }
        },
        "included": [
            { "type": "people", "id": "9", "attributes": [] },
            { "type": "people", "id": "10", "attributes": { "name": "Ann" } }
        ]
    }"#;

    let mut mapper = RecordingMapper::new();
    let post = *deserialize_str(json, &mut mapper)
        .expect("document should parse")
        .unwrap()
        .one()
        .unwrap();

    let relationships = mapper.relationships_of(post).unwrap().clone();
    let author = *relationships["author"].one().unwrap();
    let editor = *relationships["editor"].one().unwrap();
    assert_eq!(mapper.id_of(author), Some(&ResourceId::from("9")));
    assert!(mapper.attributes_of(author).is_none());
    assert_eq!(mapper.attributes_of(editor).unwrap()["name"], "Ann");
}

#[test]
fn test_unparseable_input_is_an_error() {
    let mut graph = ModelGraph::new();
    let err = deserialize_str("{ nope", &mut graph).unwrap_err();
    assert!(err.to_string().starts_with("Malformed JSON:API document"));
}

// --- Relationships ---

#[test]
fn test_null_entry_in_to_many_drops_all_relationships() {
    let doc = document(json!({
        "data": {
            "type": "posts", "id": "1",
            "relationships": {
                "author": { "data": { "type": "people", "id": "9" } },
                "comments": { "data": [{ "type": "comments", "id": "1" }, null] }
            }
        }
    }));

    let mut mapper = RecordingMapper::new();
    let post = *deserialize(&doc, &mut mapper).unwrap().one().unwrap();
    assert!(mapper.relationships_of(post).is_none());
    assert!(!mapper
        .calls()
        .iter()
        .any(|call| matches!(call, MapperCall::SetRelationships { .. })));
}

#[test]
fn test_missing_target_falls_back_to_stub_model() {
    let doc = document(json!({
        "data": { "type": "posts", "id": "1",
                  "relationships": { "tags": { "data": [{ "type": "tags", "id": "9" }] } } }
    }));

    let mut mapper = RecordingMapper::new();
    let post = *deserialize(&doc, &mut mapper).unwrap().one().unwrap();
    let tag = mapper.relationships_of(post).unwrap()["tags"].many()[0];

    assert_eq!(mapper.kind_of(tag), Some("tags"));
    assert_eq!(
        mapper.calls_for(tag),
        vec![
            &MapperCall::Create { kind: "tags".into(), model: tag },
            &MapperCall::SetId { model: tag, id: ResourceId::from("9") },
        ]
    );
}

#[test]
fn test_null_to_one_is_kept() {
    let doc = document(json!({
        "data": { "type": "posts", "id": "1",
                  "relationships": { "author": { "data": null } } }
    }));

    let mut graph = ModelGraph::new();
    let post = *deserialize(&doc, &mut graph).unwrap().one().unwrap();
    assert_eq!(graph.related(post, "author"), Some(&Related::Null));
}

#[test]
fn test_relationships_resolving_to_nothing_are_not_attached() {
    let doc = document(json!({
        "data": { "type": "posts", "id": "1",
                  "relationships": {
                      "author": { "links": { "related": "/posts/1/author" } },
                      "editor": { "data": { "type": "people", "id": "3" } }
                  } }
    }));

    let mut mapper = RecordingMapper::new().decline("people");
    let post = *deserialize(&doc, &mut mapper).unwrap().one().unwrap();
    assert!(mapper.relationships_of(post).is_none());
    assert!(mapper
        .calls()
        .contains(&MapperCall::Decline { kind: "people".into() }));
}

#[test]
fn test_declined_to_many_targets_are_omitted() {
    let doc = document(json!({
        "data": { "type": "posts", "id": "1",
                  "relationships": { "related": { "data": [
                      { "type": "posts", "id": "2" },
                      { "type": "videos", "id": "1" },
                      { "type": "posts", "id": "3" }
                  ] } } }
    }));

    let mut graph = ModelGraph::accepting(["posts"]);
    let post = *deserialize(&doc, &mut graph).unwrap().one().unwrap();
    let related = graph.related(post, "related").unwrap().many();
    assert_eq!(related.len(), 2);
    assert_eq!(graph.node(related[1]).id, Some(ResourceId::from("3")));
}

// --- Meta & Links ---

#[test]
fn test_meta_and_links_reach_capable_mappers() {
    let doc = document(json!({
        "data": {
            "type": "posts", "id": "1",
            "meta": { "views": 10 },
            "links": { "self": "/posts/1" },
            "relationships": {
                "author": {
                    "data": { "type": "people", "id": "9" },
                    "links": { "related": "/posts/1/author" },
                    "meta": { "verified": true }
                }
            }
        }
    }));

    let mut graph = ModelGraph::new();
    let post = *deserialize(&doc, &mut graph).unwrap().one().unwrap();
    let node = graph.node(post);
    assert_eq!(node.meta.as_ref().unwrap()["views"], 10);
    assert_eq!(node.links.as_ref().unwrap()["self"], "/posts/1");
    assert_eq!(node.relationship_links["author"]["related"], "/posts/1/author");
    assert_eq!(node.relationship_meta["author"]["verified"], true);
}

#[test]
fn test_meta_and_links_skipped_without_capability() {
    let doc = document(json!({
        "data": {
            "type": "posts", "id": "1",
            "meta": { "views": 10 },
            "links": { "self": "/posts/1" },
            "relationships": {
                "author": { "data": null, "links": { "self": "/x" }, "meta": { "a": 1 } }
            }
        }
    }));

    let mut mapper = RecordingMapper::new().required_only();
    let post = *deserialize(&doc, &mut mapper).unwrap().one().unwrap();

    assert!(mapper.relationships_of(post).unwrap()["author"].is_null());
    let optional = mapper.calls().iter().any(|call| {
        matches!(
            call,
            MapperCall::SetMeta { .. }
                | MapperCall::SetLinks { .. }
                | MapperCall::SetRelationshipMeta { .. }
                | MapperCall::SetRelationshipLinks { .. }
        )
    });
    assert!(!optional);
}

#[test]
fn test_relationship_links_not_set_after_fail_fast() {
    let doc = document(json!({
        "data": {
            "type": "posts", "id": "1",
            "relationships": {
                "author": { "data": null, "links": { "self": "/a" } },
                "comments": { "data": [null], "links": { "self": "/c" } }
            }
        }
    }));

    let mut mapper = RecordingMapper::new();
    deserialize(&doc, &mut mapper);
    let relations: Vec<&str> = mapper
        .calls()
        .iter()
        .filter_map(|call| match call {
            MapperCall::SetRelationshipLinks { relation, .. } => Some(relation.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(relations, vec!["author"]);
}

// --- Isolation ---

#[test]
fn test_each_call_starts_with_an_empty_cache() {
    let doc = document(json!({ "data": { "type": "posts", "id": "1" } }));

    let mut mapper = RecordingMapper::new();
    let first = JsonDeserializer::new(&doc, &mut mapper).build();
    let second = JsonDeserializer::new(&doc, &mut mapper).build();
    assert_eq!(first, Some(Deserialized::One(1)));
    assert_eq!(second, Some(Deserialized::One(2)));
}
