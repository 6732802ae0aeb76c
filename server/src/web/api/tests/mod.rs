
use crate::data_store::memory::MemoryStore;
use crate::data_store::RoomId;
use crate::web::api::configure_app;
use crate::web::AppState;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;

macro_rules! init_app {
    () => {{
        let store = Arc::new(MemoryStore::default());
        sample_data::fill_sample_data(store.as_ref());
        test::init_service(
            App::new()
                .configure(configure_app)
                .app_data(web::Data::new(AppState::for_tests(store))),
        )
        .await
    }};
}

macro_rules! login_admin {
    ($app:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({
                "username": sample_data::ADMIN_USERNAME,
                "password": sample_data::ADMIN_PASSWORD,
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        body["sessionToken"]
            .as_str()
            .expect("login response should contain a session token")
            .to_string()
    }};
}

fn booking_request(room: RoomId, date: &str) -> Value {
    json!({
        "roomId": room,
        "date": date,
        "requesterType": "Student",
        "activityName": "Chess tournament",
        "reason": "Weekly club meeting",
        "requesterName": "Omar Nasser",
        "universityId": "44100999",
        "email": "omar@example.com",
        "contactNumber": "0500000000",
    })
}

#[actix_web::test]
async fn test_list_rooms_without_token() {
    let app = init_app!();
    let req = test::TestRequest::get().uri("/api/v1/rooms").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let rooms: Value = test::read_body_json(resp).await;
    assert_eq!(rooms.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_calendar_shows_slot_states() {
    let app = init_app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/calendar/2099/1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let calendar: Value = test::read_body_json(resp).await;
    assert_eq!(calendar["year"], 2099);
    assert_eq!(calendar["month"], 1);
    let rows = calendar["rows"].as_array().unwrap();
    let main_hall = rows
        .iter()
        .find(|r| r["room"]["id"] == json!(sample_data::MAIN_HALL))
        .unwrap();
    let days = main_hall["days"].as_array().unwrap();
    assert_eq!(days.len(), 31);
    assert_eq!(days[9]["date"], "2099-01-10");
    assert_eq!(days[9]["state"], "Pending");
    assert_eq!(days[10]["state"], "Free");
    let seminar_room = rows
        .iter()
        .find(|r| r["room"]["id"] == json!(sample_data::SEMINAR_ROOM))
        .unwrap();
    assert!(seminar_room["days"]
        .as_array()
        .unwrap()
        .iter()
        .all(|d| d["state"] == "Closed"));
}

#[actix_web::test]
async fn test_calendar_rejects_invalid_month() {
    let app = init_app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/calendar/2099/13")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_create_booking() {
    let app = init_app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/bookings")
        .set_json(booking_request(sample_data::MAIN_HALL, "2099-02-01"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let booking: Value = test::read_body_json(resp).await;
    assert_eq!(booking["status"], "Pending");
    assert!(booking["id"].is_string());
}

#[actix_web::test]
async fn test_create_booking_conflicts() {
    let app = init_app!();
    // The sample data already holds an active booking on this slot.
    let req = test::TestRequest::post()
        .uri("/api/v1/bookings")
        .set_json(booking_request(sample_data::MAIN_HALL, "2099-01-10"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // The seminar room is under maintenance.
    let req = test::TestRequest::post()
        .uri("/api/v1/bookings")
        .set_json(booking_request(sample_data::SEMINAR_ROOM, "2099-02-01"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_booking_request_validation() {
    let app = init_app!();
    let mut request = booking_request(sample_data::MAIN_HALL, "2099-02-01");
    request["reason"] = Value::Null;
    let req = test::TestRequest::post()
        .uri("/api/v1/bookings")
        .set_json(&request)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let mut request = booking_request(sample_data::MAIN_HALL, "2099-02-01");
    request["email"] = json!("not-an-email");
    let req = test::TestRequest::post()
        .uri("/api/v1/bookings")
        .set_json(&request)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_admin_endpoints_require_login() {
    let app = init_app!();
    let req = test::TestRequest::get().uri("/api/v1/bookings").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get().uri("/api/v1/admins").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/rooms/{}", sample_data::MAIN_HALL))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_login_with_wrong_password() {
    let app = init_app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({
            "username": sample_data::ADMIN_USERNAME,
            "password": "wrong",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_decision_flow() {
    let app = init_app!();
    let token = login_admin!(app);

    let req = test::TestRequest::get()
        .uri("/api/v1/bookings?status=Pending")
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .to_request();
    let bookings: Value = test::call_and_read_body_json(&app, req).await;
    let booking_id = bookings[0]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/bookings/{}/decision", booking_id))
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .set_json(json!({"decision": "Approved"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let booking: Value = test::read_body_json(resp).await;
    assert_eq!(booking["status"], "Approved");

    // A booking is decided exactly once.
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/bookings/{}/decision", booking_id))
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .set_json(json!({"decision": "Rejected", "rejectionReason": "too late"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_rejection_requires_reason() {
    let app = init_app!();
    let token = login_admin!(app);

    let req = test::TestRequest::get()
        .uri("/api/v1/bookings?status=Pending")
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .to_request();
    let bookings: Value = test::call_and_read_body_json(&app, req).await;
    let booking_id = bookings[0]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/bookings/{}/decision", booking_id))
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .set_json(json!({"decision": "Rejected"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/bookings/{}/decision", booking_id))
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .set_json(json!({
            "decision": "Rejected",
            "rejectionReason": "The hall is needed for exams.",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let booking: Value = test::read_body_json(resp).await;
    assert_eq!(booking["status"], "Rejected");
    assert_eq!(booking["rejectionReason"], "The hall is needed for exams.");
}

#[actix_web::test]
async fn test_delete_booking_frees_slot() {
    let app = init_app!();
    let token = login_admin!(app);

    let req = test::TestRequest::get()
        .uri("/api/v1/bookings?status=Pending")
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .to_request();
    let bookings: Value = test::call_and_read_body_json(&app, req).await;
    let booking_id = bookings[0]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/bookings/{}", booking_id))
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/bookings/{}", booking_id))
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // The deleted booking no longer occupies its slot.
    let req = test::TestRequest::post()
        .uri("/api/v1/bookings")
        .set_json(booking_request(sample_data::MAIN_HALL, "2099-01-10"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn test_room_management_and_cascade() {
    let app = init_app!();
    let token = login_admin!(app);

    // Close the main hall for maintenance.
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/rooms/{}", sample_data::MAIN_HALL))
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .set_json(json!({
            "id": sample_data::MAIN_HALL,
            "name": "Main hall",
            "status": "UnderMaintenance",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/rooms/{}", sample_data::MAIN_HALL))
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Deleting the room removed its bookings along with it.
    let req = test::TestRequest::get()
        .uri("/api/v1/bookings")
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .to_request();
    let bookings: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(bookings.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_room_create_with_mismatching_id() {
    let app = init_app!();
    let token = login_admin!(app);
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/rooms/{}", sample_data::MAIN_HALL))
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .set_json(json!({
            "id": sample_data::SEMINAR_ROOM,
            "name": "Main hall",
            "status": "Available",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_admin_account_management() {
    let app = init_app!();
    let token = login_admin!(app);

    let req = test::TestRequest::post()
        .uri("/api/v1/admins")
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .set_json(json!({"username": "second_admin", "password": "secret"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let account: Value = test::read_body_json(resp).await;
    let admin_id = account["id"].as_str().unwrap().to_string();

    // Usernames are unique.
    let req = test::TestRequest::post()
        .uri("/api/v1/admins")
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .set_json(json!({"username": "second_admin", "password": "other"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/admins/{}", admin_id))
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .set_json(json!({"username": "renamed_admin", "password": ""}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/v1/admins")
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .to_request();
    let admins: Value = test::call_and_read_body_json(&app, req).await;
    let admins = admins.as_array().unwrap();
    assert_eq!(admins.len(), 2);
    assert!(admins.iter().any(|a| a["username"] == "renamed_admin"));
    // Passwords never show up in responses.
    assert!(admins.iter().all(|a| a.get("password").is_none()));
}

#[actix_web::test]
async fn test_auth_check_and_logout() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/v1/auth").to_request();
    let info: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(info["authorization"], json!([{"role": "Requester"}]));
    assert!(info.get("loggedIn").is_none());

    let token = login_admin!(app);
    let req = test::TestRequest::get()
        .uri("/api/v1/auth")
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .to_request();
    let info: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(info["loggedIn"], true);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(("X-SESSION-TOKEN", token.as_str()))
        .to_request();
    let response: Value = test::call_and_read_body_json(&app, req).await;
    let logged_out_token = response["sessionToken"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/v1/auth")
        .insert_header(("X-SESSION-TOKEN", logged_out_token.as_str()))
        .to_request();
    let info: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(info["authorization"], json!([{"role": "Requester"}]));
    assert!(info.get("loggedIn").is_none());
}

#[actix_web::test]
async fn test_tampered_session_token_is_rejected() {
    let app = init_app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/bookings")
        .insert_header(("X-SESSION-TOKEN", "bm90LXJlYWw.c2lnbmF0dXJl"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
