use actix_web::{web::Data, App, HttpServer};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Algorithm, Argon2, Params, Version,
};
use inventory_api::product::{PriceUpdate, ProductSpec, ProductUpdate};
use inventory_client::{ClientError, ProductClient, ProductClientArgs, TokenStore};
use inventory_gateway::{
    auth::{AuthArgs, Authenticator},
    db::{Database, DatabaseArgs},
    routes,
};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use uuid::Uuid;

const USERNAME: &str = "admin";
const PASSWORD: &str = "hunter2";

/// Serves the gateway routes on an ephemeral local port.
async fn serve() -> ProductClientArgs {
    let params = Params::new(8, 1, 1, None).unwrap();
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(PASSWORD.as_bytes(), &salt)
        .unwrap()
        .to_string();

    let auth = Data::new(
        Authenticator::try_new(AuthArgs {
            auth_username: USERNAME.into(),
            auth_password_hash: Some(hash),
            ..Default::default()
        })
        .unwrap(),
    );
    let db = Data::new(Database::try_new(DatabaseArgs::default()).await.unwrap());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(Data::clone(&auth))
            .app_data(Data::clone(&db))
            .configure(routes::configure)
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    ::actix_web::rt::spawn(server.run());

    ProductClientArgs {
        endpoint: format!("http://{addr}/").parse().unwrap(),
        token_file: None,
    }
}

async fn logged_in_client() -> ProductClient {
    let client = ProductClient::try_with_tokens(serve().await, TokenStore::memory()).unwrap();
    client.login(USERNAME, PASSWORD).await.unwrap();
    client
}

fn widget() -> ProductSpec {
    ProductSpec {
        name: "Widget".into(),
        description: "Blue".into(),
        retail_price: Decimal::new(1000, 2),
        wholesale_price: Decimal::new(500, 2),
        location: "A1".into(),
        stock: 3,
    }
}

#[::actix_web::test]
async fn client_drives_the_product_lifecycle() {
    let client = logged_in_client().await;
    assert!(client.is_logged_in());

    let created = client.create_product(&widget()).await.unwrap();
    assert_eq!(created.spec(), widget());
    assert_eq!(client.get_product(created.id).await.unwrap(), created);

    client.update_stock(created.id, 0).await.unwrap();
    client
        .update_prices(
            created.id,
            &PriceUpdate {
                retail_price: Decimal::new(1200, 2),
                wholesale_price: Decimal::new(600, 2),
            },
        )
        .await
        .unwrap();
    let spec = ProductSpec {
        name: "Widget v2".into(),
        stock: 7,
        retail_price: Decimal::new(1200, 2),
        wholesale_price: Decimal::new(600, 2),
        ..widget()
    };
    client
        .update_product(&ProductUpdate::new(created.id, spec.clone()))
        .await
        .unwrap();

    let products = client.list_products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].spec(), spec);

    client.delete_product(created.id).await.unwrap();
    assert!(client.list_products().await.unwrap().is_empty());
}

#[::actix_web::test]
async fn unauthorized_response_clears_the_credential() {
    let tokens = TokenStore::memory();
    tokens.set("stale.token".into()).unwrap();
    let client = ProductClient::try_with_tokens(serve().await, tokens.clone()).unwrap();

    let result = client.list_products().await;
    assert!(matches!(result, Err(ClientError::Unauthorized)));
    assert_eq!(tokens.get(), None);
    assert!(!client.is_logged_in());
}

#[::actix_web::test]
async fn failed_login_stores_nothing() {
    let client = ProductClient::try_with_tokens(serve().await, TokenStore::memory()).unwrap();

    let result = client.login(USERNAME, "wrong").await;
    assert!(matches!(result, Err(ClientError::Unauthorized)));
    assert!(!client.is_logged_in());
}

#[::actix_web::test]
async fn logout_forgets_the_token() {
    let client = logged_in_client().await;

    client.logout().unwrap();
    assert!(!client.is_logged_in());
    assert!(matches!(
        client.list_products().await,
        Err(ClientError::Unauthorized),
    ));
}

#[::actix_web::test]
async fn other_failures_keep_status_and_message() {
    let client = logged_in_client().await;

    match client.get_product(Uuid::new_v4()).await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert!(message.contains("not found"));
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let invalid = ProductSpec {
        stock: -1,
        ..widget()
    };
    match client.create_product(&invalid).await {
        Err(ClientError::Status { status, .. }) => assert_eq!(status, StatusCode::BAD_REQUEST),
        other => panic!("unexpected result: {other:?}"),
    }

    // a failure other than 401 keeps the session
    assert!(client.is_logged_in());
}
