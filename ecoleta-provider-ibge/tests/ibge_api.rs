//! Exercises the IBGE port against an in-process HTTP server.

use axum::{Json, Router, extract::Path, http::StatusCode, routing::get};
use ecoleta_core::{GeographyPort, PortError, RegionCode, SubRegionName};
use ecoleta_provider_ibge::IbgeGeographyPort;
use reqwest::Client;
use tokio::net::TcpListener;

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{addr}")
}

fn localities() -> Router {
    Router::new()
        .route(
            "/estados",
            get(|| async {
                Json(serde_json::json!([
                    {"id": 35, "sigla": "SP", "nome": "São Paulo", "regiao": {"id": 3, "sigla": "SE", "nome": "Sudeste"}},
                    {"id": 33, "sigla": "RJ", "nome": "Rio de Janeiro", "regiao": {"id": 3, "sigla": "SE", "nome": "Sudeste"}}
                ]))
            }),
        )
        .route(
            "/estados/{uf}/municipios",
            get(|Path(uf): Path<String>| async move {
                match uf.as_str() {
                    "SP" => Ok(Json(serde_json::json!([
                        {"id": 3509502, "nome": "Campinas"},
                        {"id": 3550308, "nome": "São Paulo"}
                    ]))),
                    _ => Err(StatusCode::NOT_FOUND),
                }
            }),
        )
}

#[tokio::test]
async fn states_map_to_their_abbreviations() {
    let base = serve(localities()).await;
    let port = IbgeGeographyPort::new(Client::new(), base);

    let regions = port.regions().await.expect("states load");

    assert_eq!(regions, vec![RegionCode::from("SP"), RegionCode::from("RJ")]);
}

#[tokio::test]
async fn cities_are_scoped_to_the_state() {
    let base = serve(localities()).await;
    let port = IbgeGeographyPort::new(Client::new(), base);

    let cities = port
        .sub_regions(&RegionCode::from("SP"))
        .await
        .expect("cities load");

    assert_eq!(
        cities,
        vec![SubRegionName::from("Campinas"), SubRegionName::from("São Paulo")]
    );
}

#[tokio::test]
async fn unknown_state_reports_the_status() {
    let base = serve(localities()).await;
    let port = IbgeGeographyPort::new(Client::new(), base);

    let err = port
        .sub_regions(&RegionCode::from("XX"))
        .await
        .expect_err("unknown state must fail");

    assert!(matches!(err, PortError::UnexpectedStatus(404)), "got {err:?}");
}

#[tokio::test]
async fn sentinel_state_issues_no_request() {
    // Nothing listens here; a request would fail.
    let port = IbgeGeographyPort::new(Client::new(), "http://127.0.0.1:9");

    let cities = port
        .sub_regions(&RegionCode::unselected())
        .await
        .expect("sentinel short-circuits");

    assert!(cities.is_empty());
}
