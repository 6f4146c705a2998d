use super::super::reddit::{parse_listing, usable_author};

#[test]
fn parses_a_comment_listing() {
    let body = r#"{
        "kind": "Listing",
        "data": {
            "after": "t1_next",
            "children": [
                {
                    "kind": "t1",
                    "data": {
                        "id": "abc",
                        "name": "t1_abc",
                        "body": "please !activitycheck this user",
                        "parent_id": "t3_xyz",
                        "author": "asker",
                        "subreddit": "ucla",
                        "created_utc": 1700000000.0,
                        "permalink": "/r/ucla/comments/xyz/abc/"
                    }
                }
            ]
        }
    }"#;

    let (after, items) = parse_listing(body).unwrap();
    assert_eq!(after.as_deref(), Some("t1_next"));
    assert_eq!(items.len(), 1);

    let item = &items[0];
    assert_eq!(item.id, "abc");
    assert_eq!(item.name, "t1_abc");
    assert_eq!(item.body, "please !activitycheck this user");
    assert_eq!(item.parent_id, "t3_xyz");
    assert_eq!(item.author.as_deref(), Some("asker"));
    assert_eq!(item.subreddit, "ucla");
    assert_eq!(item.created_utc, 1700000000.0);
    assert_eq!(item.permalink, "/r/ucla/comments/xyz/abc/");
}

#[test]
fn parses_a_submission_listing_with_missing_comment_fields() {
    // Submissions carry no body or parent_id; defaults fill the gaps.
    let body = r#"{
        "kind": "Listing",
        "data": {
            "after": null,
            "children": [
                {
                    "kind": "t3",
                    "data": {
                        "id": "xyz",
                        "name": "t3_xyz",
                        "author": "poster",
                        "subreddit": "ucla",
                        "created_utc": 1690000000.0,
                        "permalink": "/r/ucla/comments/xyz/some_title/"
                    }
                }
            ]
        }
    }"#;

    let (after, items) = parse_listing(body).unwrap();
    assert!(after.is_none());
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "t3_xyz");
    assert!(items[0].body.is_empty());
    assert!(items[0].parent_id.is_empty());
}

#[test]
fn empty_listing_parses_to_no_items() {
    let body = r#"{"kind": "Listing", "data": {"after": null, "children": []}}"#;
    let (after, items) = parse_listing(body).unwrap();
    assert!(after.is_none());
    assert!(items.is_empty());
}

#[test]
fn malformed_listing_is_an_error() {
    assert!(parse_listing("not json at all").is_err());
    assert!(parse_listing(r#"{"data": "wrong shape"}"#).is_err());
}

#[test]
fn deleted_and_missing_authors_are_unusable() {
    assert_eq!(usable_author(Some("bruin_poster")), Some("bruin_poster".to_string()));
    assert_eq!(usable_author(Some("[deleted]")), None);
    assert_eq!(usable_author(Some("")), None);
    assert_eq!(usable_author(None), None);
}
