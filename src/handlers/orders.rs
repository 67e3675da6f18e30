use std::num::NonZeroU32;

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::OrderService;
use crate::domain::order::{OrderLineInput, OrderView};
use crate::errors::{AppError, ErrorResponse};
use crate::infrastructure::Store;

pub type SharedOrderService = web::Data<OrderService<Store>>;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItemCreateRequest {
    pub menu_id: Uuid,
    #[schema(value_type = u32, minimum = 1)]
    pub quantity: NonZeroU32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateRequest {
    pub order_table_id: Uuid,
    pub order_line_items: Vec<OrderLineItemCreateRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderChangeStatusRequest {
    /// One of `COOKING`, `MEAL`, `COMPLETION`.
    pub order_status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItemResponse {
    pub menu_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_table_id: Uuid,
    pub order_status: String,
    /// RFC 3339 timestamp.
    pub ordered_time: String,
    pub order_line_items: Vec<OrderLineItemResponse>,
}

impl From<OrderLineItemCreateRequest> for OrderLineInput {
    fn from(req: OrderLineItemCreateRequest) -> Self {
        OrderLineInput {
            menu_id: req.menu_id,
            quantity: req.quantity,
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        OrderResponse {
            id: order.id,
            order_table_id: order.order_table_id,
            order_status: order.order_status.to_string(),
            ordered_time: order.ordered_time.to_rfc3339(),
            order_line_items: order
                .order_line_items
                .into_iter()
                .map(|item| OrderLineItemResponse {
                    menu_id: item.menu_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

/// Map a malformed JSON body onto the common error shape.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    AppError::BadRequest {
        code: "INVALID_REQUEST_ERROR",
        message: err.to_string(),
    }
    .into()
}

/// Answers path segments that are not UUIDs with the JSON error body.
pub fn path_error_handler(
    err: actix_web::error::PathError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    AppError::BadRequest {
        code: "INVALID_REQUEST_ERROR",
        message: err.to_string(),
    }
    .into()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/orders
///
/// Places an order on an occupied table. The order starts in `COOKING`.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = OrderCreateRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "No line items, empty table or malformed body", body = ErrorResponse),
        (status = 404, description = "Order table not found", body = ErrorResponse),
        (status = 409, description = "Line item references an unknown menu", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: SharedOrderService,
    body: web::Json<OrderCreateRequest>,
) -> Result<HttpResponse, AppError> {
    let OrderCreateRequest {
        order_table_id,
        order_line_items,
    } = body.into_inner();
    let lines: Vec<OrderLineInput> = order_line_items
        .into_iter()
        .map(OrderLineInput::from)
        .collect();

    let order = web::block(move || service.create(order_table_id, lines))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/orders/{}", order.id)))
        .json(OrderResponse::from(order)))
}

/// GET /api/orders
///
/// Returns every order with its line items.
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "All orders", body = [OrderResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn list_orders(service: SharedOrderService) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || service.list())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/orders/{id}
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: SharedOrderService,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || service.get(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT /api/orders/{id}/order-status
///
/// Moves an order to the requested status. Completed orders reject any
/// further change.
#[utoipa::path(
    put,
    path = "/api/orders/{id}/order-status",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = OrderChangeStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = OrderResponse),
        (status = 400, description = "Unknown status or order already completed", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn change_order_status(
    service: SharedOrderService,
    path: web::Path<Uuid>,
    body: web::Json<OrderChangeStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status = body.into_inner().order_status;

    let order = web::block(move || service.change_order_status(order_id, &status))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::{json, Value};
    use uuid::Uuid;

    use super::OrderResponse;
    use crate::application::OrderService;
    use crate::infrastructure::{InMemoryStore, Store};

    struct Seed {
        menu: Uuid,
        table: Uuid,
        empty_table: Uuid,
    }

    fn seeded_service() -> (web::Data<OrderService<Store>>, Seed) {
        let store = InMemoryStore::new();
        let seed = Seed {
            menu: store.add_menu().expect("menu"),
            table: store.add_table(4, false).expect("table"),
            empty_table: store.add_table(0, true).expect("table"),
        };
        (
            web::Data::new(OrderService::new(Store::Memory(store))),
            seed,
        )
    }

    macro_rules! app {
        ($service:expr) => {
            test::init_service(App::new().app_data($service.clone()).configure(crate::routes)).await
        };
    }

    fn create_body(table: Uuid, menu: Uuid) -> Value {
        json!({
            "orderTableId": table,
            "orderLineItems": [{ "menuId": menu, "quantity": 1 }]
        })
    }

    #[actix_web::test]
    async fn post_creates_order() {
        let (service, seed) = seeded_service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/api/orders")
            .set_json(create_body(seed.table, seed.menu))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let location = resp
            .headers()
            .get("location")
            .expect("location header")
            .to_str()
            .expect("ascii")
            .to_string();
        let body: OrderResponse = test::read_body_json(resp).await;
        assert_eq!(location, format!("/api/orders/{}", body.id));
        assert_eq!(body.order_table_id, seed.table);
        assert_eq!(body.order_status, "COOKING");
        assert_eq!(body.order_line_items.len(), 1);
    }

    #[actix_web::test]
    async fn post_without_line_items_is_bad_request() {
        let (service, seed) = seeded_service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/api/orders")
            .set_json(json!({ "orderTableId": seed.table, "orderLineItems": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "ORDER_ITEM_EMPTY_ERROR");
    }

    #[actix_web::test]
    async fn post_on_empty_table_is_bad_request() {
        let (service, seed) = seeded_service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/api/orders")
            .set_json(create_body(seed.empty_table, seed.menu))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "ORDER_TABLE_EMPTY_ERROR");
    }

    #[actix_web::test]
    async fn post_on_unknown_table_is_not_found() {
        let (service, seed) = seeded_service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/api/orders")
            .set_json(create_body(Uuid::new_v4(), seed.menu))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "TABLE_NOT_FOUND_ERROR");
    }

    #[actix_web::test]
    async fn post_with_unknown_menu_is_conflict() {
        let (service, seed) = seeded_service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/api/orders")
            .set_json(create_body(seed.table, Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "DATA_INTEGRITY_ERROR");
    }

    #[actix_web::test]
    async fn zero_quantity_is_rejected_by_the_body_parser() {
        let (service, seed) = seeded_service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/api/orders")
            .set_json(json!({
                "orderTableId": seed.table,
                "orderLineItems": [{ "menuId": seed.menu, "quantity": 0 }]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "INVALID_REQUEST_ERROR");
    }

    #[actix_web::test]
    async fn quantity_is_bounded_by_u32() {
        let (service, seed) = seeded_service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/api/orders")
            .set_json(json!({
                "orderTableId": seed.table,
                "orderLineItems": [{ "menuId": seed.menu, "quantity": u32::MAX }]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: OrderResponse = test::read_body_json(resp).await;
        assert_eq!(body.order_line_items[0].quantity, u32::MAX);

        let req = test::TestRequest::post()
            .uri("/api/orders")
            .set_json(json!({
                "orderTableId": seed.table,
                "orderLineItems": [{ "menuId": seed.menu, "quantity": u64::from(u32::MAX) + 1 }]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "INVALID_REQUEST_ERROR");
    }

    #[actix_web::test]
    async fn non_uuid_order_id_is_bad_request() {
        let (service, _) = seeded_service();
        let app = app!(service);

        let req = test::TestRequest::get().uri("/api/orders/42").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "INVALID_REQUEST_ERROR");

        let req = test::TestRequest::put()
            .uri("/api/orders/42/order-status")
            .set_json(json!({ "orderStatus": "MEAL" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "INVALID_REQUEST_ERROR");
    }

    #[actix_web::test]
    async fn list_and_get_return_created_order() {
        let (service, seed) = seeded_service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/api/orders")
            .set_json(create_body(seed.table, seed.menu))
            .to_request();
        let created: OrderResponse = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get().uri("/api/orders").to_request();
        let listed: Vec<OrderResponse> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].ordered_time, created.ordered_time);

        let req = test::TestRequest::get()
            .uri(&format!("/api/orders/{}", created.id))
            .to_request();
        let fetched: OrderResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched.order_table_id, seed.table);
        assert_eq!(fetched.order_line_items[0].menu_id, seed.menu);
    }

    #[actix_web::test]
    async fn get_unknown_order_is_not_found() {
        let (service, _) = seeded_service();
        let app = app!(service);

        let req = test::TestRequest::get()
            .uri(&format!("/api/orders/{}", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn put_status_walks_the_workflow() {
        let (service, seed) = seeded_service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/api/orders")
            .set_json(create_body(seed.table, seed.menu))
            .to_request();
        let created: OrderResponse = test::call_and_read_body_json(&app, req).await;
        let uri = format!("/api/orders/{}/order-status", created.id);

        for status in ["MEAL", "COMPLETION"] {
            let req = test::TestRequest::put()
                .uri(&uri)
                .set_json(json!({ "orderStatus": status }))
                .to_request();
            let changed: OrderResponse = test::call_and_read_body_json(&app, req).await;
            assert_eq!(changed.id, created.id);
            assert_eq!(changed.order_status, status);
        }

        let req = test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "orderStatus": "COMPLETION" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "ORDER_STATUS_ALREADY_COMPLETED_ERROR");
    }

    #[actix_web::test]
    async fn put_unknown_status_is_bad_request() {
        let (service, seed) = seeded_service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/api/orders")
            .set_json(create_body(seed.table, seed.menu))
            .to_request();
        let created: OrderResponse = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/orders/{}/order-status", created.id))
            .set_json(json!({ "orderStatus": "SERVED" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "INVALID_ORDER_STATUS_ERROR");
    }

    #[actix_web::test]
    async fn put_on_unknown_order_is_not_found() {
        let (service, _) = seeded_service();
        let app = app!(service);

        let req = test::TestRequest::put()
            .uri(&format!("/api/orders/{}/order-status", Uuid::new_v4()))
            .set_json(json!({ "orderStatus": "MEAL" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "ORDER_NOT_FOUND_ERROR");
    }
}
