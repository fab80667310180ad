use crate::api::helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

fn titles(body: &Value) -> Vec<String> {
    let mut titles: Vec<String> = body
        .as_array()
        .expect("Expected a JSON array")
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect();
    titles.sort();
    titles
}

fn ids(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("Expected a JSON array")
        .iter()
        .map(|b| b["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn it_should_create_a_bulletin_owned_by_the_caller() {
    let ctx = TestContext::new().await.unwrap();
    let books = ctx.fixtures.create_category("Books", None).await.unwrap();
    let user_id = Uuid::new_v4();

    let response = ctx
        .client
        .post_with_auth(
            "/api/bulletin",
            &json!({
                "title": "  Rust in Action  ",
                "description": "Barely read",
                "categoryId": books.id,
                "price": "19.99"
            }),
            &ctx.user_token(user_id),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let body = response.json();
    assert_eq!(body["title"], "Rust in Action");
    assert_eq!(body["ownerId"], user_id.to_string());
    assert_eq!(body["categoryId"], books.id.to_string());
    assert_eq!(body["price"], "19.99");

    let id = body["id"].as_str().unwrap();
    let fetched = ctx
        .client
        .get(&format!("/api/bulletin/{}", id))
        .await
        .unwrap();
    fetched.assert_status(StatusCode::OK);
    assert_eq!(fetched.json()["description"], "Barely read");
}

#[tokio::test]
async fn it_should_require_authentication_to_create_a_bulletin() {
    let ctx = TestContext::new().await.unwrap();
    let books = ctx.fixtures.create_category("Books", None).await.unwrap();

    let response = ctx
        .client
        .post(
            "/api/bulletin",
            &json!({ "title": "Book", "categoryId": books.id, "price": "5" }),
        )
        .await
        .unwrap();

    response.assert_error(StatusCode::UNAUTHORIZED, "Missing authorization header");
}

#[tokio::test]
async fn it_should_reject_invalid_bulletins() {
    let ctx = TestContext::new().await.unwrap();
    let books = ctx.fixtures.create_category("Books", None).await.unwrap();
    let token = ctx.user_token(Uuid::new_v4());

    let zero_price = ctx
        .client
        .post_with_auth(
            "/api/bulletin",
            &json!({ "title": "Free book", "categoryId": books.id, "price": "0" }),
            &token,
        )
        .await
        .unwrap();
    zero_price.assert_error(StatusCode::BAD_REQUEST, "Price must be greater than zero");

    let unknown_category = ctx
        .client
        .post_with_auth(
            "/api/bulletin",
            &json!({ "title": "Book", "categoryId": Uuid::new_v4(), "price": "5" }),
            &token,
        )
        .await
        .unwrap();
    unknown_category.assert_error(StatusCode::BAD_REQUEST, "Category does not exist");

    let blank_title = ctx
        .client
        .post_with_auth(
            "/api/bulletin",
            &json!({ "title": " ", "categoryId": books.id, "price": "5" }),
            &token,
        )
        .await
        .unwrap();
    blank_title.assert_error(StatusCode::BAD_REQUEST, "Title is required");
}

#[tokio::test]
async fn it_should_return_not_found_for_unknown_bulletin() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .get(&format!("/api/bulletin/{}", Uuid::new_v4()))
        .await
        .unwrap();

    response.assert_error(StatusCode::NOT_FOUND, "Bulletin not found");
}

#[tokio::test]
async fn it_should_search_by_text_and_price_range() {
    let ctx = TestContext::new().await.unwrap();
    let home = ctx.fixtures.create_category("Home", None).await.unwrap();
    let seller = Uuid::new_v4();
    for (title, price) in [
        ("Desk lamp", 25),
        ("Floor LAMP", 80),
        ("Antique lamp", 450),
        ("Bookshelf", 60),
    ] {
        ctx.fixtures
            .create_bulletin(seller, home.id, title, price)
            .await
            .unwrap();
    }

    let response = ctx
        .client
        .post(
            "/api/bulletin/search",
            &json!({ "search": "lamp", "minPrice": "20", "maxPrice": "100", "take": 10 }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(titles(response.json()), vec!["Desk lamp", "Floor LAMP"]);
}

#[tokio::test]
async fn it_should_treat_blank_search_as_no_text_filter() {
    let ctx = TestContext::new().await.unwrap();
    let home = ctx.fixtures.create_category("Home", None).await.unwrap();
    for title in ["Chair", "Table"] {
        ctx.fixtures
            .create_bulletin(Uuid::new_v4(), home.id, title, 10)
            .await
            .unwrap();
    }

    let response = ctx
        .client
        .post("/api/bulletin/search", &json!({ "search": "   ", "take": 10 }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(titles(response.json()), vec!["Chair", "Table"]);
}

#[tokio::test]
async fn it_should_search_by_owner_and_skip_ownerless_bulletins() {
    let ctx = TestContext::new().await.unwrap();
    let home = ctx.fixtures.create_category("Home", None).await.unwrap();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    ctx.fixtures.create_bulletin(alice, home.id, "Sofa", 200).await.unwrap();
    ctx.fixtures.create_bulletin(bob, home.id, "Rug", 40).await.unwrap();
    ctx.fixtures
        .create_bulletin(Uuid::nil(), home.id, "Legacy import", 10)
        .await
        .unwrap();

    let by_alice = ctx
        .client
        .post("/api/bulletin/search", &json!({ "userId": alice, "take": 10 }))
        .await
        .unwrap();
    assert_eq!(titles(by_alice.json()), vec!["Sofa"]);

    let everyone = ctx
        .client
        .post("/api/bulletin/search", &json!({ "take": 10 }))
        .await
        .unwrap();
    assert_eq!(titles(everyone.json()), vec!["Rug", "Sofa"]);
}

#[tokio::test]
async fn it_should_paginate_search_results_in_id_order() {
    let ctx = TestContext::new().await.unwrap();
    let home = ctx.fixtures.create_category("Home", None).await.unwrap();
    let mut all_ids = Vec::new();
    for i in 0..5 {
        let bulletin = ctx
            .fixtures
            .create_bulletin(Uuid::new_v4(), home.id, &format!("Item {}", i), 10)
            .await
            .unwrap();
        all_ids.push(bulletin.id.to_string());
    }
    all_ids.sort();

    let page = ctx
        .client
        .post("/api/bulletin/search", &json!({ "take": 2, "skip": 2 }))
        .await
        .unwrap();

    page.assert_status(StatusCode::OK);
    assert_eq!(ids(page.json()), all_ids[2..4].to_vec());
}

#[tokio::test]
async fn it_should_reject_out_of_range_page_sizes() {
    let ctx = TestContext::new().await.unwrap();

    let zero = ctx
        .client
        .post("/api/bulletin/search", &json!({ "take": 0 }))
        .await
        .unwrap();
    zero.assert_error(StatusCode::BAD_REQUEST, "take must be between 1 and 100");

    let huge = ctx
        .client
        .post("/api/bulletin/search", &json!({ "take": 101 }))
        .await
        .unwrap();
    huge.assert_error(StatusCode::BAD_REQUEST, "take must be between 1 and 100");

    let negative_skip = ctx
        .client
        .post("/api/bulletin/search", &json!({ "take": 10, "skip": -1 }))
        .await
        .unwrap();
    negative_skip.assert_error(StatusCode::BAD_REQUEST, "skip cannot be negative");
}

#[tokio::test]
async fn it_should_list_bulletins_of_a_category_and_its_descendants() {
    let ctx = TestContext::new().await.unwrap();
    let tree = ctx.fixtures.create_electronics_tree().await.unwrap();
    let seller = Uuid::new_v4();
    for (category_id, title) in [
        (tree.electronics.id, "Cable"),
        (tree.phones.id, "Landline"),
        (tree.smartphones.id, "Smartphone"),
        (tree.laptops.id, "Laptop"),
        (tree.furniture.id, "Chair"),
    ] {
        ctx.fixtures
            .create_bulletin(seller, category_id, title, 100)
            .await
            .unwrap();
    }

    let whole_tree = ctx
        .client
        .get(&format!(
            "/api/bulletin/by-category?bulletinCategoryId={}&take=10",
            tree.electronics.id
        ))
        .await
        .unwrap();
    whole_tree.assert_status(StatusCode::OK);
    assert_eq!(
        titles(whole_tree.json()),
        vec!["Cable", "Landline", "Laptop", "Smartphone"]
    );

    let phones_only = ctx
        .client
        .get(&format!(
            "/api/bulletin/by-category?bulletinCategoryId={}&take=10&skip=0",
            tree.phones.id
        ))
        .await
        .unwrap();
    assert_eq!(titles(phones_only.json()), vec!["Landline", "Smartphone"]);
}

#[tokio::test]
async fn it_should_return_not_found_for_bulletins_of_unknown_category() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .get(&format!(
            "/api/bulletin/by-category?bulletinCategoryId={}&take=10",
            Uuid::new_v4()
        ))
        .await
        .unwrap();

    response.assert_error(StatusCode::NOT_FOUND, "Category not found");
}

#[tokio::test]
async fn it_should_let_the_owner_update_a_bulletin() {
    let ctx = TestContext::new().await.unwrap();
    let home = ctx.fixtures.create_category("Home", None).await.unwrap();
    let garden = ctx.fixtures.create_category("Garden", None).await.unwrap();
    let owner = Uuid::new_v4();
    let bulletin = ctx
        .fixtures
        .create_bulletin(owner, home.id, "Chair", 30)
        .await
        .unwrap();

    ctx.client
        .put_with_auth(
            &format!("/api/bulletin/{}", bulletin.id),
            &json!({
                "title": "Garden chair",
                "description": "Weatherproof",
                "categoryId": garden.id,
                "price": "25.50"
            }),
            &ctx.user_token(owner),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);

    let fetched = ctx
        .client
        .get(&format!("/api/bulletin/{}", bulletin.id))
        .await
        .unwrap();
    let body = fetched.json();
    assert_eq!(body["title"], "Garden chair");
    assert_eq!(body["categoryId"], garden.id.to_string());
    assert_eq!(body["price"], "25.50");
    assert_eq!(body["ownerId"], owner.to_string());
}

#[tokio::test]
async fn it_should_forbid_updates_by_other_users() {
    let ctx = TestContext::new().await.unwrap();
    let home = ctx.fixtures.create_category("Home", None).await.unwrap();
    let bulletin = ctx
        .fixtures
        .create_bulletin(Uuid::new_v4(), home.id, "Chair", 30)
        .await
        .unwrap();

    let response = ctx
        .client
        .put_with_auth(
            &format!("/api/bulletin/{}", bulletin.id),
            &json!({ "title": "Mine now", "categoryId": home.id, "price": "1" }),
            &ctx.user_token(Uuid::new_v4()),
        )
        .await
        .unwrap();

    response.assert_error(StatusCode::FORBIDDEN, "Only the owner can update this bulletin");

    let fetched = ctx
        .client
        .get(&format!("/api/bulletin/{}", bulletin.id))
        .await
        .unwrap();
    assert_eq!(fetched.json()["title"], "Chair");
}

#[tokio::test]
async fn it_should_let_the_owner_delete_a_bulletin() {
    let ctx = TestContext::new().await.unwrap();
    let home = ctx.fixtures.create_category("Home", None).await.unwrap();
    let owner = Uuid::new_v4();
    let bulletin = ctx
        .fixtures
        .create_bulletin(owner, home.id, "Chair", 30)
        .await
        .unwrap();

    ctx.client
        .delete_with_auth(&format!("/api/bulletin/{}", bulletin.id), &ctx.user_token(owner))
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);

    ctx.client
        .get(&format!("/api/bulletin/{}", bulletin.id))
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn it_should_let_an_admin_delete_any_bulletin() {
    let ctx = TestContext::new().await.unwrap();
    let home = ctx.fixtures.create_category("Home", None).await.unwrap();
    let bulletin = ctx
        .fixtures
        .create_bulletin(Uuid::new_v4(), home.id, "Spam", 1)
        .await
        .unwrap();

    ctx.client
        .delete_with_auth(&format!("/api/bulletin/{}", bulletin.id), &ctx.admin_token())
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn it_should_forbid_deletion_by_other_users() {
    let ctx = TestContext::new().await.unwrap();
    let home = ctx.fixtures.create_category("Home", None).await.unwrap();
    let bulletin = ctx
        .fixtures
        .create_bulletin(Uuid::new_v4(), home.id, "Chair", 30)
        .await
        .unwrap();

    let response = ctx
        .client
        .delete_with_auth(
            &format!("/api/bulletin/{}", bulletin.id),
            &ctx.user_token(Uuid::new_v4()),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::FORBIDDEN);
    ctx.client
        .get(&format!("/api/bulletin/{}", bulletin.id))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn it_should_return_not_found_when_deleting_unknown_bulletin() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .delete_with_auth(
            &format!("/api/bulletin/{}", Uuid::new_v4()),
            &ctx.admin_token(),
        )
        .await
        .unwrap();

    response.assert_error(StatusCode::NOT_FOUND, "Bulletin not found");
}

#[tokio::test]
async fn it_should_reject_a_malformed_bulletin_id_with_the_error_payload() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/api/bulletin/not-a-uuid").await.unwrap();

    response.assert_error(StatusCode::BAD_REQUEST, "Invalid input");
}

#[tokio::test]
async fn it_should_reject_a_search_without_take_with_the_error_payload() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post("/api/bulletin/search", &json!({ "search": "x" }))
        .await
        .unwrap();

    response.assert_error(StatusCode::BAD_REQUEST, "missing field `take`");
}

#[tokio::test]
async fn it_should_reject_a_malformed_category_query_with_the_error_payload() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .get("/api/bulletin/by-category?bulletinCategoryId=zzz&take=5")
        .await
        .unwrap();

    response.assert_error(StatusCode::BAD_REQUEST, "Failed to deserialize query string");
}

#[tokio::test]
async fn it_should_reject_sub_cent_prices() {
    let ctx = TestContext::new().await.unwrap();
    let books = ctx.fixtures.create_category("Books", None).await.unwrap();

    let response = ctx
        .client
        .post_with_auth(
            "/api/bulletin",
            &json!({ "title": "Book", "categoryId": books.id, "price": "0.001" }),
            &ctx.user_token(Uuid::new_v4()),
        )
        .await
        .unwrap();

    response.assert_error(StatusCode::BAD_REQUEST, "at most 2 decimal places");
}
