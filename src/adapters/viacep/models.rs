//! ViaCEP response model

use crate::adapters::traits::PostalAddress;
use crate::domain::{Cep, LookupError};
use serde::Deserialize;

/// Body of `GET /ws/{cep}/json/`
///
/// Unknown CEPs come back with HTTP 200 and `{"erro": true}` (older
/// deployments send the string `"true"`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViaCepResponse {
    #[serde(default)]
    pub cep: Option<String>,

    #[serde(default)]
    pub logradouro: String,

    #[serde(default)]
    pub complemento: String,

    #[serde(default)]
    pub bairro: String,

    #[serde(default)]
    pub localidade: String,

    #[serde(default)]
    pub uf: String,

    #[serde(default)]
    pub erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn is_error(&self) -> bool {
        match &self.erro {
            None => false,
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag != "false",
            Some(_) => true,
        }
    }

    /// Converts the response into an address usable for geocoding
    ///
    /// # Errors
    ///
    /// [`LookupError::NotFound`] when the registry flagged the CEP as unknown,
    /// [`LookupError::IncompleteAddress`] when there is no street to geocode.
    pub fn into_address(self, cep: &Cep) -> Result<PostalAddress, LookupError> {
        if self.is_error() {
            return Err(LookupError::NotFound(cep.to_string()));
        }
        if self.logradouro.trim().is_empty() {
            return Err(LookupError::IncompleteAddress(cep.to_string()));
        }

        Ok(PostalAddress {
            street: self.logradouro,
            neighborhood: self.bairro,
            city: self.localidade,
            state: self.uf,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cep() -> Cep {
        Cep::parse("64000020").unwrap()
    }

    #[test]
    fn test_full_response_converts() {
        let body = r#"{
            "cep": "64000-020",
            "logradouro": "Rua Areolino de Abreu",
            "complemento": "",
            "bairro": "Centro",
            "localidade": "Teresina",
            "uf": "PI",
            "ibge": "2211001"
        }"#;
        let response: ViaCepResponse = serde_json::from_str(body).unwrap();
        let address = response.into_address(&cep()).unwrap();
        assert_eq!(address.street, "Rua Areolino de Abreu");
        assert_eq!(address.city, "Teresina");
    }

    #[test]
    fn test_erro_flag_is_not_found() {
        let response: ViaCepResponse = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert_eq!(
            response.into_address(&cep()),
            Err(LookupError::NotFound("64000020".to_string()))
        );

        let response: ViaCepResponse = serde_json::from_str(r#"{"erro": "true"}"#).unwrap();
        assert!(matches!(
            response.into_address(&cep()),
            Err(LookupError::NotFound(_))
        ));
    }

    #[test]
    fn test_missing_street_is_incomplete() {
        let body = r#"{"cep": "64000-000", "logradouro": "", "bairro": "", "localidade": "Teresina", "uf": "PI"}"#;
        let response: ViaCepResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(
            response.into_address(&cep()),
            Err(LookupError::IncompleteAddress(_))
        ));
    }
}
