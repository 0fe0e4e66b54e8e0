//! Integration tests for the ViaCEP and Nominatim clients against a mock server

use cepgeo::adapters::nominatim::NominatimClient;
use cepgeo::adapters::traits::{GeocodingService, PostalRegistry};
use cepgeo::adapters::viacep::ViaCepClient;
use cepgeo::config::{GeocoderConfig, PostalRegistryConfig};
use cepgeo::domain::{Cep, GeoPoint, LookupError};
use mockito::Matcher;

fn viacep(base_url: String) -> ViaCepClient {
    ViaCepClient::new(&PostalRegistryConfig {
        base_url,
        timeout_seconds: 5,
    })
    .unwrap()
}

fn nominatim(base_url: String) -> NominatimClient {
    NominatimClient::new(&GeocoderConfig {
        base_url,
        user_agent: "cepgeo-tests/0.1".to_string(),
        timeout_seconds: 5,
    })
    .unwrap()
}

fn cep(raw: &str) -> Cep {
    Cep::parse(raw).unwrap()
}

#[tokio::test]
async fn test_viacep_address() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/64000020/json/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
  "cep": "64000-020",
  "logradouro": "Rua Areolino de Abreu",
  "complemento": "",
  "bairro": "Centro",
  "localidade": "Teresina",
  "uf": "PI",
  "ibge": "2211001"
}"#,
        )
        .create_async()
        .await;

    let address = viacep(server.url())
        .lookup(&cep("64000-020"))
        .await
        .unwrap();

    assert_eq!(
        address.to_query(),
        "Rua Areolino de Abreu, Centro, Teresina, PI"
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_viacep_unknown_cep() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/99999000/json/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"erro": true}"#)
        .create_async()
        .await;

    let result = viacep(server.url()).lookup(&cep("99999000")).await;
    assert_eq!(result, Err(LookupError::NotFound("99999000".to_string())));
}

#[tokio::test]
async fn test_viacep_without_street() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/64001000/json/")
        .with_status(200)
        .with_body(r#"{"cep": "64001-000", "logradouro": "", "localidade": "Teresina", "uf": "PI"}"#)
        .create_async()
        .await;

    let result = viacep(server.url()).lookup(&cep("64001000")).await;
    assert!(matches!(result, Err(LookupError::IncompleteAddress(_))));
}

#[tokio::test]
async fn test_viacep_bad_request() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/00000123/json/")
        .with_status(400)
        .with_body("<html>Bad Request</html>")
        .create_async()
        .await;

    let result = viacep(server.url()).lookup(&cep("123")).await;
    assert_eq!(
        result,
        Err(LookupError::Status {
            service: "viacep",
            status: 400
        })
    );
}

#[tokio::test]
async fn test_viacep_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/64000020/json/")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let result = viacep(server.url()).lookup(&cep("64000020")).await;
    assert!(matches!(result, Err(LookupError::Malformed { .. })));
}

#[tokio::test]
async fn test_viacep_unreachable() {
    let result = viacep("http://127.0.0.1:1".to_string())
        .lookup(&cep("64000020"))
        .await;
    assert!(matches!(
        result,
        Err(LookupError::Transport { .. }) | Err(LookupError::Timeout { .. })
    ));
}

#[tokio::test]
async fn test_nominatim_best_match() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "q".into(),
                "Rua Areolino de Abreu, Centro, Teresina, PI".into(),
            ),
            Matcher::UrlEncoded("format".into(), "json".into()),
            Matcher::UrlEncoded("limit".into(), "1".into()),
        ]))
        .match_header("user-agent", "cepgeo-tests/0.1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"place_id": 1, "lat": "-5.0919", "lon": "-42.8034", "display_name": "Rua Areolino de Abreu, Centro, Teresina"}]"#,
        )
        .create_async()
        .await;

    let point = nominatim(server.url())
        .search("Rua Areolino de Abreu, Centro, Teresina, PI")
        .await
        .unwrap();

    assert_eq!(point, GeoPoint::new(-5.0919, -42.8034));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_nominatim_no_candidates() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let result = nominatim(server.url())
        .search("Teresina, PI, Brasil, CEP 99999000")
        .await;
    assert_eq!(
        result,
        Err(LookupError::NoCandidates(
            "Teresina, PI, Brasil, CEP 99999000".to_string()
        ))
    );
}

#[tokio::test]
async fn test_nominatim_rate_limited() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(429)
        .create_async()
        .await;

    let result = nominatim(server.url()).search("Teresina").await;
    assert_eq!(
        result,
        Err(LookupError::Status {
            service: "nominatim",
            status: 429
        })
    );
}

#[tokio::test]
async fn test_nominatim_unparseable_coordinates() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"[{"lat": "", "lon": "-42.8"}]"#)
        .create_async()
        .await;

    let result = nominatim(server.url()).search("Teresina").await;
    assert!(matches!(result, Err(LookupError::Malformed { .. })));
}
