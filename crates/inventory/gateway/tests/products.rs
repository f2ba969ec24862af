use std::time::Duration;

use actix_web::{
    body::BoxBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::{header, StatusCode},
    test,
    web::Data,
    App,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Algorithm, Argon2, Params, Version,
};
use chrono::Utc;
use inventory_api::{
    auth::{LoginRequest, LoginResponse},
    error::{ErrorCode, ErrorResponse},
    product::{PriceUpdate, Product, ProductSpec, ProductUpdate},
};
use inventory_gateway::{
    auth::{AuthArgs, Authenticator},
    db::{Database, DatabaseArgs},
    routes,
};
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

const USERNAME: &str = "admin";
const PASSWORD: &str = "correct horse";

struct Fixture {
    auth: Data<Authenticator>,
    db: Data<Database>,
    token: String,
}

impl Fixture {
    async fn new() -> Self {
        let params = Params::new(8, 1, 1, None).unwrap();
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(PASSWORD.as_bytes(), &salt)
            .unwrap()
            .to_string();

        let auth = Authenticator::try_new(AuthArgs {
            auth_username: USERNAME.into(),
            auth_password_hash: Some(hash),
            auth_secret: Some("integration-secret".into()),
            ..Default::default()
        })
        .unwrap();
        let db = Database::try_new(DatabaseArgs::default()).await.unwrap();
        let token = auth.issue(USERNAME, Utc::now());

        Self {
            auth: Data::new(auth),
            db: Data::new(db),
            token,
        }
    }

    fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<BoxBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(Data::clone(&self.auth))
            .app_data(Data::clone(&self.db))
            .configure(routes::configure)
    }

    fn bearer(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.token))
    }
}

fn widget() -> ProductSpec {
    ProductSpec {
        name: "Widget".into(),
        description: String::new(),
        retail_price: Decimal::new(1000, 2),
        wholesale_price: Decimal::new(500, 2),
        location: "A1".into(),
        stock: 3,
    }
}

#[::actix_web::test]
async fn product_lifecycle() {
    let fixture = Fixture::new().await;
    let app = test::init_service(fixture.app()).await;

    // create
    let request = test::TestRequest::post()
        .uri("/api/products")
        .insert_header(fixture.bearer())
        .set_json(widget())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let created: Product = test::read_body_json(response).await;
    assert_eq!(location, format!("/api/products/{}", created.id));
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(created.spec(), widget());

    // get
    let request = test::TestRequest::get()
        .uri(&location)
        .insert_header(fixture.bearer())
        .to_request();
    let fetched: Product = test::call_and_read_body_json(&app, request).await;
    assert_eq!(fetched, created);

    // stock
    ::tokio::time::sleep(Duration::from_millis(10)).await;
    let request = test::TestRequest::patch()
        .uri(&format!("{location}/stock"))
        .insert_header(fixture.bearer())
        .set_json(0)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = test::TestRequest::get()
        .uri(&location)
        .insert_header(fixture.bearer())
        .to_request();
    let restocked: Product = test::call_and_read_body_json(&app, request).await;
    assert_eq!(restocked.stock, 0);
    assert_eq!(restocked.created_at, created.created_at);
    assert!(restocked.updated_at > created.updated_at);

    // list
    let request = test::TestRequest::get()
        .uri("/api/products")
        .insert_header(fixture.bearer())
        .to_request();
    let products: Vec<Product> = test::call_and_read_body_json(&app, request).await;
    assert_eq!(products, vec![restocked]);

    // delete
    let request = test::TestRequest::delete()
        .uri(&location)
        .insert_header(fixture.bearer())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = test::TestRequest::get()
        .uri(&location)
        .insert_header(fixture.bearer())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = test::read_body_json(response).await;
    assert_eq!(error.code, ErrorCode::NotFound);
}

#[::actix_web::test]
async fn full_update_and_price_update() {
    let fixture = Fixture::new().await;
    let app = test::init_service(fixture.app()).await;
    let created = fixture.db.insert_product(widget()).await.unwrap();
    let location = format!("/api/products/{}", created.id);

    let spec = ProductSpec {
        name: "Widget Pro".into(),
        description: "Now with more widget".into(),
        stock: 12,
        ..widget()
    };
    let request = test::TestRequest::put()
        .uri(&location)
        .insert_header(fixture.bearer())
        .set_json(ProductUpdate::new(created.id, spec.clone()))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let prices = PriceUpdate {
        retail_price: Decimal::new(1999, 2),
        wholesale_price: Decimal::new(1250, 2),
    };
    let request = test::TestRequest::patch()
        .uri(&format!("{location}/prices"))
        .insert_header(fixture.bearer())
        .set_json(prices)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let updated = fixture.db.get_product(created.id).await.unwrap().unwrap();
    assert_eq!(
        updated.spec(),
        ProductSpec {
            retail_price: prices.retail_price,
            wholesale_price: prices.wholesale_price,
            ..spec
        },
    );
}

#[::actix_web::test]
async fn full_update_with_mismatched_id_is_rejected() {
    let fixture = Fixture::new().await;
    let app = test::init_service(fixture.app()).await;
    let created = fixture.db.insert_product(widget()).await.unwrap();

    let other_id = Uuid::new_v4();
    let spec = ProductSpec {
        name: "Hijacked".into(),
        ..widget()
    };
    let request = test::TestRequest::put()
        .uri(&format!("/api/products/{}", created.id))
        .insert_header(fixture.bearer())
        .set_json(ProductUpdate::new(other_id, spec))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = test::read_body_json(response).await;
    assert_eq!(error.code, ErrorCode::BadRequest);

    let unchanged = fixture.db.get_product(created.id).await.unwrap().unwrap();
    assert_eq!(unchanged, created);
}

#[::actix_web::test]
async fn mutations_on_missing_products_are_not_found() {
    let fixture = Fixture::new().await;
    let app = test::init_service(fixture.app()).await;
    let missing = Uuid::new_v4();
    let location = format!("/api/products/{missing}");

    let requests = vec![
        test::TestRequest::put()
            .uri(&location)
            .set_json(ProductUpdate::new(missing, widget())),
        test::TestRequest::patch()
            .uri(&format!("{location}/stock"))
            .set_json(5),
        test::TestRequest::patch()
            .uri(&format!("{location}/prices"))
            .set_json(PriceUpdate {
                retail_price: Decimal::new(2, 0),
                wholesale_price: Decimal::new(1, 0),
            }),
        test::TestRequest::delete().uri(&location),
        test::TestRequest::get().uri(&location),
    ];

    for request in requests {
        let request = request.insert_header(fixture.bearer()).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[::actix_web::test]
async fn invalid_products_are_rejected() {
    let fixture = Fixture::new().await;
    let app = test::init_service(fixture.app()).await;
    let created = fixture.db.insert_product(widget()).await.unwrap();

    let invalid_specs = vec![
        ProductSpec {
            name: "   ".into(),
            ..widget()
        },
        ProductSpec {
            location: String::new(),
            ..widget()
        },
        ProductSpec {
            retail_price: Decimal::new(400, 2),
            ..widget()
        },
        ProductSpec {
            wholesale_price: Decimal::ZERO,
            ..widget()
        },
        ProductSpec {
            stock: -1,
            ..widget()
        },
        ProductSpec {
            name: "x".repeat(201),
            ..widget()
        },
        ProductSpec {
            retail_price: Decimal::new(10001, 3),
            ..widget()
        },
    ];

    for spec in invalid_specs {
        let request = test::TestRequest::post()
            .uri("/api/products")
            .insert_header(fixture.bearer())
            .set_json(spec)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = test::read_body_json(response).await;
        assert_eq!(error.code, ErrorCode::Invalid);
        assert!(!error.message.is_empty());
    }

    let request = test::TestRequest::patch()
        .uri(&format!("/api/products/{}/stock", created.id))
        .insert_header(fixture.bearer())
        .set_json(-5)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(fixture.db.list_products().await.unwrap(), vec![created]);
}

#[::actix_web::test]
async fn oversized_prices_are_rejected() {
    let fixture = Fixture::new().await;
    let app = test::init_service(fixture.app()).await;
    let created = fixture.db.insert_product(widget()).await.unwrap();

    for retail_price in [json!(1e20), json!(7e28)] {
        let request = test::TestRequest::post()
            .uri("/api/products")
            .insert_header(fixture.bearer())
            .set_json(json!({
                "name": "Widget",
                "retailPrice": retail_price,
                "wholesalePrice": 5,
                "location": "A1",
                "stock": 1,
            }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = test::read_body_json(response).await;
        assert_eq!(error.code, ErrorCode::Invalid);
    }

    let request = test::TestRequest::patch()
        .uri(&format!("/api/products/{}/prices", created.id))
        .insert_header(fixture.bearer())
        .set_json(PriceUpdate {
            retail_price: Decimal::from_i128_with_scale(10i128.pow(20), 0),
            wholesale_price: Decimal::from_i128_with_scale(10i128.pow(19), 0),
        })
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = test::read_body_json(response).await;
    assert_eq!(error.code, ErrorCode::Invalid);

    assert_eq!(fixture.db.list_products().await.unwrap(), vec![created]);
}

#[::actix_web::test]
async fn malformed_requests_are_bad_requests() {
    let fixture = Fixture::new().await;
    let app = test::init_service(fixture.app()).await;

    let request = test::TestRequest::get()
        .uri("/api/products/not-a-uuid")
        .insert_header(fixture.bearer())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = test::TestRequest::post()
        .uri("/api/products")
        .insert_header(fixture.bearer())
        .set_json(json!({ "name": "Widget" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = test::read_body_json(response).await;
    assert_eq!(error.code, ErrorCode::BadRequest);
}

#[::actix_web::test]
async fn product_routes_require_a_valid_token() {
    let fixture = Fixture::new().await;
    let app = test::init_service(fixture.app()).await;

    let request = test::TestRequest::get().uri("/api/products").to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let error: ErrorResponse = test::read_body_json(response).await;
    assert_eq!(error.code, ErrorCode::Unauthorized);

    let expired = fixture
        .auth
        .issue(USERNAME, Utc::now() - chrono::Duration::try_days(1).unwrap());
    let tampered = format!("{}x", fixture.token);
    for token in [expired, tampered, "garbage".to_string()] {
        let request = test::TestRequest::post()
            .uri("/api/products")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .set_json(widget())
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    assert!(fixture.db.list_products().await.unwrap().is_empty());
}

#[::actix_web::test]
async fn login_issues_a_working_token() {
    let fixture = Fixture::new().await;
    let app = test::init_service(fixture.app()).await;

    let request = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(LoginRequest {
            username: USERNAME.into(),
            password: "wrong".into(),
        })
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(LoginRequest {
            username: USERNAME.into(),
            password: PASSWORD.into(),
        })
        .to_request();
    let LoginResponse { token } = test::call_and_read_body_json(&app, request).await;

    let request = test::TestRequest::get()
        .uri("/api/products")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
}
