// region:    --- Imports
use super::{AuctionApi, BidReceipt, BidRequest, Envelope, LoginRequest};
use crate::auction::ProductSnapshot;
use crate::config::Config;
use crate::error::ClientError;
use crate::session::{Session, UserProfile};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

// endregion: --- Imports

// region:    --- Http Auction Api
/// reqwest 기반 경매 서버 클라이언트
#[derive(Clone)]
pub struct HttpAuctionApi {
    client: Client,
    base_url: String,
}

impl HttpAuctionApi {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let response = check_status(response).await?;
        let body = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&body)?;
        Ok(envelope.into_inner())
    }
}

#[async_trait]
impl AuctionApi for HttpAuctionApi {
    async fn fetch_product(&self, product_id: i64) -> Result<ProductSnapshot, ClientError> {
        debug!("{:<12} --> 상품 조회 id: {}", "Api", product_id);
        self.send(self.client.get(self.url(&format!("/products/{}", product_id))))
            .await
    }

    async fn place_bid(
        &self,
        token: &str,
        auction_id: i64,
        amount: Decimal,
    ) -> Result<BidReceipt, ClientError> {
        debug!("{:<12} --> 입찰 요청 id: {}, 금액: {}", "Api", auction_id, amount);
        let request = self
            .client
            .post(self.url(&format!("/auctions/{}/bid", auction_id)))
            .bearer_auth(token)
            .json(&BidRequest { amount });
        let receipt: BidReceipt = self.send(request).await?;
        if !receipt.success {
            return Err(ClientError::Domain(receipt.message));
        }
        Ok(receipt)
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile, ClientError> {
        debug!("{:<12} --> 사용자 확인", "Api");
        self.send(self.client.get(self.url("/auth/me")).bearer_auth(token))
            .await
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        debug!("{:<12} --> 로그인 요청: {}", "Api", email);
        let request = self.client.post(self.url("/auth/login")).json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        });
        self.send(request).await
    }
}
// endregion: --- Http Auction Api

// region:    --- Error Mapping
/// 응답 상태 코드를 오류 분류로 변환
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: Value = response.json().await.unwrap_or(Value::Null);
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("요청 실패 ({})", status));
    warn!("{:<12} --> 요청 실패 status: {}, message: {}", "Api", status, message);

    let err = match status {
        StatusCode::UNAUTHORIZED => ClientError::Auth {
            token_expired: is_token_expired(&body),
            message,
        },
        StatusCode::UNPROCESSABLE_ENTITY => {
            ClientError::Validation(first_field_error(&body).unwrap_or(message))
        }
        _ => ClientError::Domain(message),
    };
    Err(err)
}

/// 서버가 토큰 만료를 명시적으로 알렸는지
fn is_token_expired(body: &Value) -> bool {
    ["code", "error"].iter().any(|key| {
        body.get(key)
            .and_then(Value::as_str)
            .map(|v| v.eq_ignore_ascii_case("token_expired"))
            .unwrap_or(false)
    })
}

/// `{ "errors": { "field": ["msg", ...] } }` 의 첫 메시지
fn first_field_error(body: &Value) -> Option<String> {
    body.get("errors")?
        .as_object()?
        .values()
        .find_map(|messages| match messages {
            Value::Array(list) => list.iter().find_map(|m| m.as_str().map(str::to_string)),
            Value::String(m) => Some(m.clone()),
            _ => None,
        })
}
// endregion: --- Error Mapping
