//! End-to-end routing: registration, ordering, hooks and parameter binding

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use trellis_http::testing::{respond_with, ResponseAssertions, TestContext};
use trellis_http::*;

fn list_orders(ctx: &mut HttpContext) -> HttpResult<()> {
    ctx.response.send_text("orders");
    Ok(())
}

fn show_order(ctx: &mut HttpContext) -> HttpResult<()> {
    let id: u64 = ctx.request.params.get_typed("id")?;
    ctx.response.send_json(&serde_json::json!({ "id": id, "status": "open" }))
}

fn order_item(ctx: &mut HttpContext) -> HttpResult<()> {
    let order = ctx.request.params.get("order").unwrap_or_default().to_string();
    let item = ctx.request.params.get("item").unwrap_or_default().to_string();
    ctx.response.send_text(format!("{}:{}", order, item));
    Ok(())
}

fn stamp(ctx: &mut HttpContext) -> HttpResult<()> {
    ctx.response.set_header("x-stamp", "1");
    Ok(())
}

fn orders_router() -> Router {
    let mut router = Router::new();
    router
        .register_fn_at(list_orders, HttpMethod::GET, "/orders")
        .unwrap()
        .register_fn_at(order_item, HttpMethod::GET, "/orders/[order]/items/[item]")
        .unwrap()
        .register_fn_at(show_order, HttpMethod::GET, "/orders/[id]")
        .unwrap();
    router
}

#[test]
fn test_path_parameters_reach_handlers() {
    let router = orders_router();

    let mut ctx = TestContext::get("/orders/42").build();
    assert!(router.route(&mut ctx).unwrap());
    ctx.response.assert_ok();
    ctx.response.assert_json_contains("id", serde_json::json!(42));

    let mut nested = TestContext::get("/Orders/7/Items/lamp").build();
    router.route(&mut nested).unwrap();
    nested.response.assert_body("7:lamp");
}

#[test]
fn test_unmatched_requests_are_not_found() {
    let router = orders_router();

    let mut wrong_method = TestContext::post("/orders").build();
    let error = router.route(&mut wrong_method).unwrap_err();
    assert!(error.is_not_found());

    let mut wrong_path = TestContext::get("/customers").build();
    assert!(matches!(
        router.route(&mut wrong_path),
        Err(RoutingError::RouteNotFound { .. })
    ));
}

#[test]
fn test_first_responder_wins_unless_continuing() {
    let mut router = Router::new();
    router
        .register_fn_at(list_orders, HttpMethod::GET, "/orders")
        .unwrap()
        .register_fn_at(stamp, HttpMethod::ALL, "/orders")
        .unwrap();

    let mut stopped = TestContext::get("/orders").build();
    router.route(&mut stopped).unwrap();
    assert_eq!(stopped.response.header("x-stamp"), None);

    let mut continuing = Router::new().continue_routing_after_response_sent(true);
    continuing.import(&router);
    let mut ctx = TestContext::get("/orders").build();
    continuing.route(&mut ctx).unwrap();
    ctx.response.assert_body("orders");
    assert_eq!(ctx.response.header("x-stamp"), Some("1"));
}

#[test]
fn test_hooks_wrap_every_dispatch_once() {
    let trail = Arc::new(Mutex::new(Vec::new()));
    let before_trail = Arc::clone(&trail);
    let after_trail = Arc::clone(&trail);

    let mut router = Router::new()
        .continue_routing_after_response_sent(true)
        .before(move |ctx| {
            before_trail
                .lock()
                .unwrap()
                .push(format!("before {}", ctx.request.path_info()));
            Ok(())
        })
        .after(move |ctx| {
            after_trail
                .lock()
                .unwrap()
                .push(format!("after {}", ctx.response.status()));
            Ok(())
        });
    router
        .register_fn_at(list_orders, HttpMethod::GET, "/orders")
        .unwrap()
        .register_fn_at(stamp, HttpMethod::GET, "/orders")
        .unwrap();

    let mut ctx = TestContext::get("/orders").build();
    router.route(&mut ctx).unwrap();

    let trail = trail.lock().unwrap();
    assert_eq!(trail.len(), 2);
    assert_eq!(trail[0], "before /orders");
    assert!(trail[1].starts_with("after 200"));
}

#[test]
fn test_handler_error_skips_after_hook() {
    let after_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&after_calls);

    let mut router = Router::new().after(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    router
        .register_fn_at(testing::failing_handler, HttpMethod::ALL, "/broken")
        .unwrap();

    let mut ctx = TestContext::put("/broken").build();
    match router.route(&mut ctx) {
        Err(RoutingError::Handler(error)) => assert_eq!(error.status(), HttpStatus::BAD_REQUEST),
        other => panic!("expected handler error, got {:?}", other),
    }
    assert_eq!(after_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_duplicate_registrations_are_ignored() {
    let mut router = orders_router();
    router
        .register_fn_at(list_orders, HttpMethod::GET, "/elsewhere")
        .unwrap()
        .register_fn_at(list_orders, HttpMethod::POST, "/orders")
        .unwrap();

    // same function and method as an existing route, whatever the path
    assert_eq!(router.len(), 4);
    assert_eq!(router.routing_table()[3].http_method(), HttpMethod::POST);
}

#[test]
fn test_closures_from_one_factory_are_kept_apart() {
    let mut router = Router::new();
    router
        .register_fn_at(respond_with("a"), HttpMethod::GET, "/a")
        .unwrap()
        .register_fn_at(respond_with("b"), HttpMethod::GET, "/b")
        .unwrap();
    assert_eq!(router.len(), 2);

    let mut ctx = TestContext::get("/b").build();
    router.route(&mut ctx).unwrap();
    ctx.response.assert_body("b");

    let mut looped = Router::new();
    for path in ["/users", "/orders", "/items"] {
        let owned = path.to_string();
        looped
            .register_fn_at(
                move |ctx: &mut HttpContext| {
                    ctx.response.send_text(owned.clone());
                    Ok(())
                },
                HttpMethod::GET,
                path,
            )
            .unwrap();
    }
    assert_eq!(looped.len(), 3);

    let mut ctx = TestContext::get("/items").build();
    looped.route(&mut ctx).unwrap();
    ctx.response.assert_body("/items");
}

#[test]
fn test_free_methods_with_one_name_are_kept_apart() {
    fn accept(ctx: &mut HttpContext) -> HttpResult<()> {
        ctx.response.send_text("accepted");
        Ok(())
    }
    fn reject(ctx: &mut HttpContext) -> HttpResult<()> {
        ctx.response.send_text("rejected");
        Ok(())
    }

    let mut router = Router::new();
    router
        .register_method_at(
            Arc::new(MethodDescriptor::function("handle", accept)),
            HttpMethod::GET,
            "/a",
        )
        .unwrap()
        .register_method_at(
            Arc::new(MethodDescriptor::function("handle", reject)),
            HttpMethod::GET,
            "/b",
        )
        .unwrap();
    assert_eq!(router.len(), 2);

    let mut ctx = TestContext::get("/b").build();
    router.route(&mut ctx).unwrap();
    ctx.response.assert_body("rejected");
}

#[test]
fn test_disabled_routes_stop_matching() {
    let router = orders_router();
    let list = Arc::clone(&router.routing_table()[0]);

    list.disable();
    let mut ctx = TestContext::get("/orders").build();
    assert!(router.route(&mut ctx).unwrap_err().is_not_found());

    list.enable();
    let mut ctx = TestContext::get("/orders").build();
    router.route(&mut ctx).unwrap();
    ctx.response.assert_body("orders");
}

#[test]
fn test_invalid_templates_are_rejected() {
    let mut router = Router::new();
    let error = router
        .register_fn_at(list_orders, HttpMethod::GET, "/orders/[id")
        .unwrap_err();
    assert!(matches!(error, RoutingError::Pattern(_)));
    assert!(router.is_empty());
}

#[test]
fn test_route_infos_serialize() {
    let router = orders_router();
    let infos = router.route_infos();
    assert_eq!(infos.len(), 3);
    assert_eq!(infos[1].params, vec!["order".to_string(), "item".to_string()]);

    let json = serde_json::to_value(&infos[2]).unwrap();
    assert_eq!(json["method"], "GET");
    assert_eq!(json["path"], "/orders/[id]");
    assert_eq!(json["enabled"], true);
}
