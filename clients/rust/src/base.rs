use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug)]
pub enum APIErrorVariant {
    Network,
    MalformedResponse,
    UnexpectedStatusCode {
        expected: StatusCode,
        actual: StatusCode,
    },
}

#[derive(Debug)]
pub struct APIError {
    pub variant: APIErrorVariant,
}

pub type APIResponse<T> = Result<T, APIError>;

pub(crate) struct BaseClient {
    client: Client,
    address: String,
}

impl BaseClient {
    pub fn new(address: String) -> Self {
        Self {
            client: Client::new(),
            address,
        }
    }

    fn url(&self, path: String) -> String {
        format!("{}/api/v1/{}", self.address, path)
    }

    async fn handle_response<T: DeserializeOwned>(
        res: reqwest::Response,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let status = res.status();
        if status != expected_status_code {
            return Err(APIError {
                variant: APIErrorVariant::UnexpectedStatusCode {
                    expected: expected_status_code,
                    actual: status,
                },
            });
        }

        res.json::<T>().await.map_err(|_| APIError {
            variant: APIErrorVariant::MalformedResponse,
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|_| APIError {
                variant: APIErrorVariant::Network,
            })?;
        Self::handle_response(res, expected_status_code).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .map_err(|_| APIError {
                variant: APIErrorVariant::Network,
            })?;
        Self::handle_response(res, expected_status_code).await
    }

    pub async fn post<T: DeserializeOwned, S: Serialize>(
        &self,
        body: S,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .map_err(|_| APIError {
                variant: APIErrorVariant::Network,
            })?;
        Self::handle_response(res, expected_status_code).await
    }
}
